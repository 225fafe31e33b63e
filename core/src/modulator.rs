//! RTTY tone generation: the transmit direction.
//!
//! Produces phase-continuous Mark/Space audio with standard asynchronous
//! framing: one Space start bit, five data bits LSB first, then Mark for
//! the stop interval. LTRS/FIGS shift codes are inserted automatically
//! from the Baudot tables.

use std::f32::consts::PI;

use log::debug;

use crate::baudot::{self, ShiftState, FIGS_CODE, LTRS_CODE};
use crate::error::{Result, RttyError};
use crate::framing::DATA_BITS;

/// Output amplitude, kept below full scale to survive later conversion to
/// 16-bit PCM without clipping.
const AMPLITUDE: f32 = 0.7;

/// Mark bits of idle line before the first character; gives a decoder
/// time to settle its sign reference.
const LEADING_IDLE_BITS: f64 = 8.0;

/// Mark bits of idle line after the last character.
const TRAILING_IDLE_BITS: f64 = 4.0;

/// RTTY modulator.
///
/// Bit boundaries are derived from a cumulative bit position rather than
/// per-bit rounded sample counts, so long transmissions do not drift from
/// the nominal baud rate. The oscillator phase carries across bit
/// boundaries: a tone switch moves the frequency, not the phase.
pub struct RttyModulator {
    sample_rate: f64,
    baud: f64,
    mark_freq: f32,
    space_freq: f32,
    shift: ShiftState,
    phase: f32,
}

impl RttyModulator {
    /// Modulator with the crate's default signaling convention.
    pub fn new(sample_rate: usize) -> Result<Self> {
        Self::with_params(
            sample_rate,
            crate::DEFAULT_BAUD_RATE,
            crate::MARK_FREQ,
            crate::SPACE_FREQ,
        )
    }

    pub fn with_params(
        sample_rate: usize,
        baud: f64,
        mark_freq: f32,
        space_freq: f32,
    ) -> Result<Self> {
        if sample_rate == 0 {
            return Err(RttyError::InvalidConfig(
                "sample rate must be positive".into(),
            ));
        }
        if baud <= 0.0 {
            return Err(RttyError::InvalidConfig(format!(
                "baud rate must be positive, got {}",
                baud
            )));
        }
        if mark_freq <= 0.0 || space_freq <= 0.0 {
            return Err(RttyError::InvalidConfig(
                "tone frequencies must be positive".into(),
            ));
        }
        Ok(Self {
            sample_rate: sample_rate as f64,
            baud,
            mark_freq,
            space_freq,
            shift: ShiftState::Letters,
            phase: 0.0,
        })
    }

    /// Modulate a text into audio samples, idle Mark on both ends.
    ///
    /// Lower-case letters are sent as upper case. Characters ITA2 cannot
    /// express are skipped.
    pub fn modulate(&mut self, text: &str) -> Vec<f32> {
        let mut out = Vec::new();
        let mut bit_pos = 0.0f64;

        self.emit_tone(&mut out, &mut bit_pos, true, LEADING_IDLE_BITS);
        for ch in text.chars() {
            let ch = ch.to_ascii_uppercase();
            let Some((code, shift)) = baudot::encode(ch, self.shift) else {
                debug!("skipping character {:?}: no ITA2 encoding", ch);
                continue;
            };
            if shift != self.shift {
                let shift_code = match shift {
                    ShiftState::Figures => FIGS_CODE,
                    ShiftState::Letters => LTRS_CODE,
                };
                self.emit_character(&mut out, &mut bit_pos, shift_code);
                self.shift = shift;
            }
            self.emit_character(&mut out, &mut bit_pos, code);
        }
        self.emit_tone(&mut out, &mut bit_pos, true, TRAILING_IDLE_BITS);

        out
    }

    /// One framed character: start bit, five data bits LSB first, stop
    /// interval of Mark.
    fn emit_character(&mut self, out: &mut Vec<f32>, bit_pos: &mut f64, code: u8) {
        self.emit_tone(out, bit_pos, false, 1.0);
        for bit in 0..DATA_BITS {
            let mark = (code >> bit) & 1 == 1;
            self.emit_tone(out, bit_pos, mark, 1.0);
        }
        self.emit_tone(out, bit_pos, true, crate::STOP_BIT_LEN);
    }

    /// Extend the output with `bits` bit periods of one tone, up to the
    /// cumulative bit boundary.
    fn emit_tone(&mut self, out: &mut Vec<f32>, bit_pos: &mut f64, mark: bool, bits: f64) {
        *bit_pos += bits;
        let target = (*bit_pos * self.sample_rate / self.baud).round() as usize;
        let freq = if mark { self.mark_freq } else { self.space_freq };
        let step = 2.0 * PI * freq / self.sample_rate as f32;
        while out.len() < target {
            out.push(AMPLITUDE * self.phase.sin());
            self.phase = (self.phase + step) % (2.0 * PI);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count_matches_framing_length() {
        // "E" from Letters shift: no shift code, one framed character of
        // 1 + 5 + 1.5 bits plus the idle padding.
        let mut modulator = RttyModulator::new(8000).unwrap();
        let samples = modulator.modulate("E");
        let bits = LEADING_IDLE_BITS + 7.5 + TRAILING_IDLE_BITS;
        let expected = (bits * 8000.0 / crate::DEFAULT_BAUD_RATE).round() as usize;
        assert_eq!(samples.len(), expected);
    }

    #[test]
    fn test_shift_code_inserted_for_figures() {
        // "5" needs a FIGS code first: two framed characters.
        let mut modulator = RttyModulator::new(8000).unwrap();
        let samples = modulator.modulate("5");
        let bits = LEADING_IDLE_BITS + 2.0 * 7.5 + TRAILING_IDLE_BITS;
        let expected = (bits * 8000.0 / crate::DEFAULT_BAUD_RATE).round() as usize;
        assert_eq!(samples.len(), expected);
    }

    #[test]
    fn test_shift_state_persists_between_calls() {
        let mut modulator = RttyModulator::new(8000).unwrap();
        modulator.modulate("5");
        // Still in Figures: another figure needs no extra shift code.
        let samples = modulator.modulate("7");
        let bits = LEADING_IDLE_BITS + 7.5 + TRAILING_IDLE_BITS;
        let expected = (bits * 8000.0 / crate::DEFAULT_BAUD_RATE).round() as usize;
        assert_eq!(samples.len(), expected);
    }

    #[test]
    fn test_unencodable_characters_skipped() {
        let mut modulator = RttyModulator::new(8000).unwrap();
        let with = modulator.modulate("{}~");
        let mut modulator = RttyModulator::new(8000).unwrap();
        let without = modulator.modulate("");
        assert_eq!(with.len(), without.len());
    }

    #[test]
    fn test_amplitude_bounded() {
        let mut modulator = RttyModulator::new(8000).unwrap();
        let samples = modulator.modulate("RY");
        assert!(samples.iter().all(|s| s.abs() <= AMPLITUDE + 1e-6));
        assert!(samples.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(RttyModulator::with_params(0, 45.45, 2125.0, 2975.0).is_err());
        assert!(RttyModulator::with_params(8000, 0.0, 2125.0, 2975.0).is_err());
        assert!(RttyModulator::with_params(8000, 45.45, -1.0, 2975.0).is_err());
    }
}

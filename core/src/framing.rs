//! Asynchronous start/data/stop bit framing.
//!
//! A four-state machine advanced by frequent calls to [`advance`]: each
//! call takes the current tone classification and the current time and may
//! fire one transition. The machine is a plain value and the transition
//! function is pure, so every path is testable with synthetic timestamps.
//!
//! There are no timeouts beyond the scheduled sampling instants: a state
//! that never observes its qualifying tone parks there indefinitely. That
//! free-running behavior is intentional; Idle simply waits for the next
//! Space, however long that takes.

use crate::discriminator::ToneState;

/// Data bits per Baudot character.
pub const DATA_BITS: u8 = 5;

/// Derived bit timing, recomputed whenever the baud rate changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitTiming {
    bit_period_us: u64,
    half_bit_us: u64,
}

impl BitTiming {
    /// `bit_period = round(1_000_000 / baud)` microseconds; the half-bit
    /// period is its integer half.
    pub fn from_baud(baud: f64) -> Self {
        let bit_period_us = (1_000_000.0 / baud).round() as u64;
        Self {
            bit_period_us,
            half_bit_us: bit_period_us / 2,
        }
    }

    pub fn bit_period_us(&self) -> u64 {
        self.bit_period_us
    }

    pub fn half_bit_us(&self) -> u64 {
        self.half_bit_us
    }
}

/// Up to five received bits, least-significant-bit first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitAccumulator {
    value: u8,
    count: u8,
}

impl BitAccumulator {
    pub fn push(&mut self, bit: bool) {
        if bit {
            self.value |= 1 << self.count;
        }
        self.count += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.count >= DATA_BITS
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}

/// Framing machine state. Timing anchors live inside the variants, so the
/// whole machine is one copyable value owned by the decoder and mutated
/// only through [`advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingState {
    /// Line idling at Mark; waiting for the Space edge of a start bit.
    Idle,
    /// Space observed at `candidate_at`; confirming half a bit later.
    StartConfirm { candidate_at: u64 },
    /// Sampling one data bit at each scheduled `sample_at`.
    DataBits {
        sample_at: u64,
        bits: BitAccumulator,
    },
    /// All data bits in; checking the stop bit at `check_at`.
    StopBits { check_at: u64, code: u8 },
}

impl Default for FramingState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Advance the machine by one observation.
///
/// Returns the successor state and, when a stop bit validates, the
/// completed 5-bit code. A Space stop bit is a framing error: the
/// accumulated bits are discarded silently and the machine returns to
/// Idle, immediately ready for a new start bit.
pub fn advance(
    state: FramingState,
    tone: ToneState,
    now_us: u64,
    timing: &BitTiming,
) -> (FramingState, Option<u8>) {
    match state {
        FramingState::Idle => {
            if tone == ToneState::Space {
                (
                    FramingState::StartConfirm {
                        candidate_at: now_us,
                    },
                    None,
                )
            } else {
                (FramingState::Idle, None)
            }
        }

        FramingState::StartConfirm { candidate_at } => {
            if now_us < candidate_at + timing.half_bit_us {
                return (FramingState::StartConfirm { candidate_at }, None);
            }
            if tone == ToneState::Space {
                // Still Space half a bit in: a genuine start bit. The
                // first data bit midpoint is 1.5 bit periods past the
                // start edge.
                (
                    FramingState::DataBits {
                        sample_at: candidate_at + timing.bit_period_us + timing.half_bit_us,
                        bits: BitAccumulator::default(),
                    },
                    None,
                )
            } else {
                // Reverted to Mark: a transient glitch, not a start bit.
                (FramingState::Idle, None)
            }
        }

        FramingState::DataBits {
            sample_at,
            mut bits,
        } => {
            if now_us < sample_at {
                return (FramingState::DataBits { sample_at, bits }, None);
            }
            bits.push(tone == ToneState::Mark);
            if bits.is_complete() {
                (
                    FramingState::StopBits {
                        check_at: sample_at + timing.bit_period_us,
                        code: bits.value(),
                    },
                    None,
                )
            } else {
                // Sampling instants stay anchored to the schedule, not to
                // the observation time, so call jitter does not accumulate
                // across the character.
                (
                    FramingState::DataBits {
                        sample_at: sample_at + timing.bit_period_us,
                        bits,
                    },
                    None,
                )
            }
        }

        FramingState::StopBits { check_at, code } => {
            if now_us < check_at {
                return (FramingState::StopBits { check_at, code }, None);
            }
            if tone == ToneState::Mark {
                (FramingState::Idle, Some(code))
            } else {
                (FramingState::Idle, None)
            }
        }
    }
}

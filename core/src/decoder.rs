//! Decoder facade binding discriminator, framing machine, codec and
//! output ring.

use std::sync::Arc;

use log::debug;

use crate::baudot::BaudotCodec;
use crate::discriminator::{DiscriminatorConfig, ZeroCrossingDiscriminator};
use crate::error::{Result, RttyError};
use crate::framing::{self, BitTiming, FramingState};
use crate::ring::OutputRing;
use crate::source::{MonotonicClock, SampleSource, SystemClock};

/// Real-time RTTY decoder.
///
/// One execution context calls [`step`](Self::step) repeatedly, many
/// times per bit period, while an independent consumer drains decoded
/// text through [`drain_text`](Self::drain_text) or a shared
/// [`output`](Self::output) handle. The output ring is the only state the
/// two contexts share; nothing in `step` blocks or suspends.
///
/// Bit synchronization is only as good as the invocation rate: the
/// machine samples tones at scheduled instants and cannot detect calls
/// arriving too sparsely to hit them.
pub struct RttyDecoder<S: SampleSource, C: MonotonicClock = SystemClock> {
    source: S,
    clock: C,
    discriminator: ZeroCrossingDiscriminator,
    timing: BitTiming,
    state: FramingState,
    codec: BaudotCodec,
    output: Arc<OutputRing>,
    debug: bool,
}

impl<S: SampleSource> RttyDecoder<S, SystemClock> {
    /// Bind to a sample source under wall time. No samples are drawn until
    /// [`init`](Self::init).
    pub fn new(source: S) -> Self {
        Self::with_clock(source, SystemClock::new())
    }
}

impl<S: SampleSource, C: MonotonicClock> RttyDecoder<S, C> {
    /// Bind to a sample source with an explicit clock (offline decoding,
    /// tests).
    pub fn with_clock(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            discriminator: ZeroCrossingDiscriminator::new(DiscriminatorConfig::default()),
            timing: BitTiming::from_baud(crate::DEFAULT_BAUD_RATE),
            state: FramingState::Idle,
            codec: BaudotCodec::new(),
            output: Arc::new(OutputRing::new(crate::OUTPUT_RING_CAPACITY)),
            debug: false,
        }
    }

    /// Capture the initial zero-crossing sign reference and reset framing
    /// to Idle. The Letters/Figures shift is decoder-lifetime state and is
    /// not touched.
    pub fn init(&mut self) {
        self.discriminator.prime(&mut self.source);
        self.state = FramingState::Idle;
    }

    /// One evaluation: classify a window, read the clock, advance the
    /// framing machine, and push any completed character into the ring.
    /// The ring lock is taken only for the push, after the transition has
    /// already fired.
    pub fn step(&mut self) {
        let tone = self.discriminator.classify(&mut self.source);
        let now_us = self.clock.now_us();
        let (next, completed) = framing::advance(self.state, tone, now_us, &self.timing);
        if self.debug && next != self.state {
            debug!("framing {:?} -> {:?} ({:?} at {} us)", self.state, next, tone, now_us);
        }
        self.state = next;

        if let Some(code) = completed {
            match self.codec.decode(code) {
                Some(ch) => {
                    if self.debug {
                        debug!("code {:#07b} -> {:?}", code, ch);
                    }
                    self.output.push(ch);
                }
                None => {
                    if self.debug {
                        debug!(
                            "code {:#07b} has no character (shift now {:?})",
                            code,
                            self.codec.shift()
                        );
                    }
                }
            }
        }
    }

    /// Copy up to `max_len - 1` decoded characters out in FIFO order,
    /// leaving the remainder for the next call. One slot is reserved so
    /// the result always fits a `max_len`-byte NUL-terminated buffer;
    /// [`OutputRing::drain`] takes the plain count.
    pub fn drain_text(&self, max_len: usize) -> String {
        self.output.drain(max_len.saturating_sub(1))
    }

    /// Shared handle to the output ring for an independent consumer
    /// context.
    pub fn output(&self) -> Arc<OutputRing> {
        Arc::clone(&self.output)
    }

    /// Recompute bit timing from a new baud rate. Effective immediately;
    /// an in-flight character keeps its already-scheduled instants, so one
    /// character may straddle the change (accepted inconsistency).
    pub fn set_baud_rate(&mut self, baud: f64) -> Result<()> {
        if baud <= 0.0 {
            return Err(RttyError::InvalidConfig(format!(
                "baud rate must be positive, got {}",
                baud
            )));
        }
        self.timing = BitTiming::from_baud(baud);
        Ok(())
    }

    /// Takes effect on the next window read; framing progress is kept.
    pub fn set_window_size(&mut self, window_size: usize) -> Result<()> {
        if window_size == 0 {
            return Err(RttyError::InvalidConfig(
                "window size must be positive".into(),
            ));
        }
        self.discriminator.config_mut().window_size = window_size;
        Ok(())
    }

    /// No validation beyond the `[0, usize::MAX]` domain: a threshold
    /// above the window size simply classifies every window as Mark.
    pub fn set_threshold(&mut self, threshold: usize) {
        self.discriminator.config_mut().threshold = threshold;
    }

    /// Toggle verbose `log::debug!` tracing of transitions and emissions.
    /// No behavioral effect on decoding.
    pub fn set_debug_output(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    pub fn timing(&self) -> BitTiming {
        self.timing
    }

    pub fn framing_state(&self) -> FramingState {
        self.state
    }

    pub fn discriminator_config(&self) -> DiscriminatorConfig {
        self.discriminator.config()
    }
}

//! Mark/Space tone classification by zero-crossing counting.
//!
//! The two RTTY tones differ only in frequency, so counting how often the
//! DC-centered waveform changes sign over a fixed window separates them
//! without any spectral math: the higher Space tone crosses zero more often.

use crate::error::{Result, RttyError};
use crate::source::SampleSource;

/// Window configuration for the zero-crossing discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscriminatorConfig {
    /// Samples drawn per classification window.
    pub window_size: usize,
    /// Transition count at or above which a window classifies as Space.
    pub threshold: usize,
}

impl DiscriminatorConfig {
    /// Window size must be positive and the threshold within
    /// `[0, window_size]`.
    pub fn new(window_size: usize, threshold: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(RttyError::InvalidConfig(
                "window size must be positive".into(),
            ));
        }
        if threshold > window_size {
            return Err(RttyError::InvalidConfig(format!(
                "threshold {} exceeds window size {}",
                threshold, window_size
            )));
        }
        Ok(Self {
            window_size,
            threshold,
        })
    }
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self {
            window_size: crate::DEFAULT_WINDOW_SIZE,
            threshold: crate::DEFAULT_ZC_THRESHOLD,
        }
    }
}

/// Binary tone classification of one sampling window. Derived per window,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneState {
    Mark,
    Space,
}

/// Zero-crossing frequency discriminator.
///
/// The previous-sample sign reference persists across windows, so a
/// crossing that straddles two windows is still counted exactly once.
pub struct ZeroCrossingDiscriminator {
    config: DiscriminatorConfig,
    last_positive: bool,
}

impl ZeroCrossingDiscriminator {
    pub fn new(config: DiscriminatorConfig) -> Self {
        Self {
            config,
            last_positive: true,
        }
    }

    /// Capture the sign reference from one centered sample. Decoder init
    /// calls this before the first window is classified.
    pub fn prime<S: SampleSource>(&mut self, source: &mut S) {
        let centered = source.next_sample() - source.dc_offset();
        self.last_positive = centered >= 0.0;
    }

    /// Draw one window and count sign transitions of the centered
    /// waveform. A sample at exactly zero counts as positive. The count is
    /// always in `[0, window_size]`.
    pub fn count_transitions<S: SampleSource>(&mut self, source: &mut S) -> usize {
        let dc = source.dc_offset();
        let mut count = 0;
        for _ in 0..self.config.window_size {
            let positive = source.next_sample() - dc >= 0.0;
            if positive != self.last_positive {
                count += 1;
            }
            self.last_positive = positive;
        }
        count
    }

    /// Classify one window: `count >= threshold` is Space, below is Mark.
    /// The boundary count itself goes to Space.
    pub fn classify<S: SampleSource>(&mut self, source: &mut S) -> ToneState {
        if self.count_transitions(source) >= self.config.threshold {
            ToneState::Space
        } else {
            ToneState::Mark
        }
    }

    pub fn config(&self) -> DiscriminatorConfig {
        self.config
    }

    /// Reconfiguration takes effect on the next window read.
    pub fn config_mut(&mut self) -> &mut DiscriminatorConfig {
        &mut self.config
    }
}

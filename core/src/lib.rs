//! Real-time RTTY (radioteletype) demodulator/decoder
//!
//! Turns a stream of audio samples into Baudot text: a zero-crossing
//! discriminator classifies each sampling window as Mark or Space, a
//! timing-driven state machine locks onto asynchronous start/data/stop
//! framing, and the resulting 5-bit codes are decoded against the ITA2
//! Letters/Figures tables into a ring buffer a separate consumer drains.

pub mod baudot;
pub mod decoder;
pub mod discriminator;
pub mod error;
pub mod framing;
pub mod modulator;
pub mod ring;
pub mod source;

pub use baudot::{BaudotCodec, ShiftState};
pub use decoder::RttyDecoder;
pub use discriminator::{DiscriminatorConfig, ToneState, ZeroCrossingDiscriminator};
pub use error::{Result, RttyError};
pub use framing::{BitTiming, FramingState};
pub use modulator::RttyModulator;
pub use ring::OutputRing;
pub use source::{MonotonicClock, SampleClock, SampleSource, SliceSource, SystemClock};

// Configuration constants
pub const SAMPLE_RATE: usize = 8000;

// RTTY signaling convention (wide 850 Hz shift)
pub const MARK_FREQ: f32 = 2125.0; // Hz
pub const SPACE_FREQ: f32 = 2975.0; // Hz

/// Standard amateur RTTY baud rate (60 wpm)
pub const DEFAULT_BAUD_RATE: f64 = 45.45;

// Discriminator configuration
//
// The window must stay well under one bit period so the framing machine
// can land its sampling instants near bit midpoints. At 8 kHz and 45.45
// baud one bit spans 176 samples; a 22-sample window is an eighth of that.
pub const DEFAULT_WINDOW_SIZE: usize = 22;

/// Zero-crossing count separating the tones: 22 samples of the 2125 Hz
/// Mark tone cross about 12 times, the 2975 Hz Space tone about 16.
pub const DEFAULT_ZC_THRESHOLD: usize = 14;

// Framing configuration (data bits per character live in [`framing::DATA_BITS`])
pub const STOP_BIT_LEN: f64 = 1.5; // bit periods of Mark after the data bits

/// Decoded-character ring cells; one cell stays unused to distinguish
/// empty from full.
pub const OUTPUT_RING_CAPACITY: usize = 64;

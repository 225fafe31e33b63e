use thiserror::Error;

/// Decoding itself never fails: a bad stop bit, an unmapped code or a full
/// output ring all degrade to "no character" or "oldest character lost".
/// Only rejected configuration surfaces as an error.
#[derive(Debug, Error)]
pub enum RttyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RttyError>;

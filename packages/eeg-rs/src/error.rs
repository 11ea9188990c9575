use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Invalid filter cutoff: {0}")]
    InvalidCutoff(String),

    #[error("Frame contains non-finite samples")]
    NonFiniteData,

    #[error("Channel count mismatch: expected {expected}, got {got}")]
    ChannelMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, ProcessingError>;

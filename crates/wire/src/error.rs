//! Wire-level error types.

use crate::frame::MAX_FRAME_SIZE;

/// Result type alias for the wire crate.
pub type Result<T> = std::result::Result<T, WireError>;

/// Errors produced while framing or (de)serializing a message.
///
/// Parse failures (`Truncated`, `Malformed`, `FrameTooLarge`) are kept apart
/// from transport failures (`Io`); see [`WireError::is_malformed`].
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The stream ended before a whole frame arrived.
    #[error("truncated frame: need {needed} bytes, have {have}")]
    Truncated { needed: usize, have: usize },

    /// The bytes do not describe a value of the expected shape.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// Declared or encoded length exceeds the frame limit.
    #[error("frame too large: {size} bytes (max {MAX_FRAME_SIZE})")]
    FrameTooLarge { size: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl WireError {
    /// True for failures caused by the bytes themselves rather than the
    /// network.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, WireError::Io(_))
    }
}

impl From<bincode::Error> for WireError {
    fn from(err: bincode::Error) -> Self {
        WireError::Malformed(err.to_string())
    }
}

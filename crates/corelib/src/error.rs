//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling a node's identity and addressing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A peer or listen address could not be parsed.
    #[error("Invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },
    /// Node configuration is inconsistent.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn invalid_address(input: &str, reason: impl Into<String>) -> Self {
        Error::InvalidAddress {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

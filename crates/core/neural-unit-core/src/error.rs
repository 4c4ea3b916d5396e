//! Error types for the neural unit host codec

use thiserror::Error;

/// Main error type for neural unit operations
#[derive(Debug, Error)]
pub enum UnitError {
    /// Out-of-range numeric input or unrecognized vocabulary entry.
    /// Always raised before any transport I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Identifier could not be represented in the wire encoding
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Reply bytes could not be decoded
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Failure reported by the transport (link down, no reply)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value fell outside the range its wire field can carry
    #[error("Value {value} for '{field}' is outside [{min}, {max}]")]
    OutOfRange {
        /// Field or identifier the value was meant for
        field: String,
        /// Rejected value
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },

    /// Reply shorter than the field being decoded
    #[error("Short reply for {context}: expected at least {expected} bytes, got {actual}")]
    ShortReply {
        /// What was being decoded
        context: String,
        /// Minimum number of bytes required
        expected: usize,
        /// Bytes actually received
        actual: usize,
    },
}

/// Convenient Result type using UnitError
pub type Result<T> = std::result::Result<T, UnitError>;

impl UnitError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        UnitError::Validation(msg.into())
    }

    /// Create an encoding error
    pub fn encoding(msg: impl Into<String>) -> Self {
        UnitError::Encoding(msg.into())
    }

    /// Create a decoding error
    pub fn decoding(msg: impl Into<String>) -> Self {
        UnitError::Decoding(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        UnitError::Transport(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        UnitError::Config(msg.into())
    }

    /// Create an out-of-range error
    pub fn out_of_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        UnitError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    /// Create a short reply error
    pub fn short_reply(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        UnitError::ShortReply {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Whether the caller can recover by correcting its input
    pub fn is_validation(&self) -> bool {
        matches!(self, UnitError::Validation(_) | UnitError::OutOfRange { .. })
    }

    /// Whether the error came from reading a reply
    pub fn is_decoding(&self) -> bool {
        matches!(self, UnitError::Decoding(_) | UnitError::ShortReply { .. })
    }
}

//! Error types for conditioning and unconditioning operations.

use thiserror::Error;

/// Errors that can occur while conditioning or unconditioning a sequence.
///
/// Every error is fatal to the call that produced it: a partially decoded
/// stream cannot be resumed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConditionerError {
    /// The byte source ended before the expected number of bytes was read.
    #[error("premature end of stream: expected {expected} bytes, only {actual} available")]
    PrematureEndOfStream {
        /// The number of bytes the reader needed.
        expected: usize,
        /// The number of bytes the source actually produced.
        actual: usize,
    },

    /// A codec partition is empty, has a zero entry, or does not sum to the field width.
    #[error("invalid codec: {0}")]
    InvalidCodec(String),

    /// A buffer does not have the length implied by the requested count.
    #[error("length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch {
        /// The length implied by the caller's count.
        expected: usize,
        /// The length actually supplied or produced.
        actual: usize,
    },

    /// A textual parameter description could not be parsed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other failure reported by the underlying byte sink or source.
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConditionerError {
    fn from(err: std::io::Error) -> Self {
        ConditionerError::Io(err.to_string())
    }
}

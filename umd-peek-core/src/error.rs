use thiserror::Error;

/// Errors that can occur while reading a game image.
///
/// Readers use this internally; the public extraction entry points turn any
/// of these into an empty [`GameMetadata`](crate::GameMetadata) instead of
/// propagating them.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// I/O error while reading the image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not recognized or is invalid
    #[error("Invalid image format: {0}")]
    InvalidFormat(String),

    /// A header or table is corrupted or points outside the image
    #[error("Corrupted header: {0}")]
    CorruptedHeader(String),

    /// The data is too small to contain the expected structure
    #[error("Image too small: expected at least {expected} bytes, got {actual}")]
    TooSmall { expected: u64, actual: u64 },
}

impl AnalysisError {
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub fn corrupted_header(msg: impl Into<String>) -> Self {
        Self::CorruptedHeader(msg.into())
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while populating the asset cache or loading settings.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to create cache directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No cache key for {}", .0.display())]
    NoCacheKey(PathBuf),

    #[error("Invalid settings: {0}")]
    Settings(String),
}

impl CacheError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

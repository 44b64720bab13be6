//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for code-context operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the I/O-facing layers (config, ingestion, server).
pub type Result<T> = anyhow::Result<T>;

/// Errors raised by the raw inverted index API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// A read was attempted before the index was built at least once.
    #[error("index must be built before it can be queried")]
    InvalidState,
}

/// Error returned when loading a corpus analysis file fails.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    /// The analysis file does not exist.
    #[error("Corpus file not found at {}", path.display())]
    NotFound { path: PathBuf },
    /// The analysis file exists but is not valid analysis JSON.
    #[error("Failed to parse corpus file {}: {error}", path.display())]
    Parse { path: PathBuf, error: String },
}

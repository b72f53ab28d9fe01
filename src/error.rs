//! Error types for histlog
//!
//! Provides a unified error type for all fallible operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using HistoryError
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Unified error type for histlog operations
#[derive(Debug, Error)]
pub enum HistoryError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Log File Errors
    // -------------------------------------------------------------------------
    /// The backing file exists but could not be read
    #[error("Failed to load history from {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing pending entries failed; pending entries are kept for a retry
    #[error("Failed to flush history to {}: {source}", path.display())]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to compute checksum of {}: {source}", path.display())]
    Checksum {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

//! Error types for snippet extraction and synchronization

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole synchronization pass.
///
/// Existing snippet/ledger state is always preserved when one of these is
/// returned. A stale table beats a silently emptied one.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The configured snippet root is neither a file nor a directory
    #[error("snippet path not found: {path}")]
    PathNotFound { path: PathBuf },
}

/// Errors local to a single document during extraction.
///
/// These never abort a synchronization pass; the document simply
/// contributes nothing and the error is surfaced as a warning.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Headings within one document must all share one level
    #[error("inconsistent heading levels in {path}: expected H{expected}, found H{found}")]
    InconsistentHeadingLevel {
        path: PathBuf,
        expected: u32,
        found: u32,
    },

    /// Reading the document failed
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the export sink.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write export file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize export list: {0}")]
    Serialize(#[from] serde_json::Error),
}

//! SnipSync - Markdown snippet extraction and incremental synchronization
//!
//! This library maintains a fast, always-current lookup table of named text
//! snippets sourced from heading-delimited markdown documents, re-extracting
//! only the documents that changed since the last sync, and optionally
//! mirroring the table to an Alfred-compatible JSON list.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod sync;

/// Re-export commonly used types
pub use config::Config;
pub use error::{ExportError, ExtractError, SyncError};
pub use extract::{Heading, HeadingProvider, MarkdownHeadingProvider, SnippetExtractor};
pub use sync::{SyncEngine, SyncReport};

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "snipsync";

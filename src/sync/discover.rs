//! Snippet document discovery and prefix derivation

use crate::error::SyncError;
use std::path::{Path, PathBuf};

/// File extension recognized as a snippet document
pub const SNIPPET_EXTENSION: &str = "md";

/// Resolve a configured root to the ordered list of snippet documents.
///
/// A file root yields itself; a directory root is walked depth-first with
/// children in sorted order (deterministic across platforms), collecting
/// every `.md` file beneath it and skipping dot-directories. A missing root
/// is an error and must not disturb any existing state.
pub fn find_documents(root: &Path) -> Result<Vec<PathBuf>, SyncError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    if !root.is_dir() {
        return Err(SyncError::PathNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut documents = Vec::new();

    for entry in walkdir::WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_str().unwrap_or("");
            e.depth() == 0 || !name.starts_with('.')
        })
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(SNIPPET_EXTENSION))
        {
            documents.push(entry.path().to_path_buf());
        }
    }

    Ok(documents)
}

/// Derive the disambiguating key prefix for a document.
///
/// The prefix is the document's path relative to the configured root with
/// the extension removed and directory separators normalized to `/`.
pub fn snippet_prefix(root: &Path, document: &Path) -> String {
    let relative = document.strip_prefix(root).unwrap_or(document);
    let stemmed = relative.with_extension("");

    stemmed
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

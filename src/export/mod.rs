//! Alfred JSON export sink
//!
//! Serializes the global snippet table into the list-of-records format that
//! Alfred's "List Filter" input consumes, so the same snippets can be
//! searched from outside the tool. Invoked only when export is enabled and
//! the last sync actually changed something.

use crate::error::ExportError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// One exported snippet record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlfredItem {
    /// Strictly increasing identifier, starting at 1 in table order
    pub uid: u64,
    /// Human-readable label (the snippet key)
    pub title: String,
    /// Short-form value shown under the title
    pub subtitle: String,
    /// Long-form value passed to the consumer
    pub arg: String,
    /// Machine trigger (the snippet key again)
    pub key: String,
}

/// The exported document: `{ "items": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlfredList {
    pub items: Vec<AlfredItem>,
}

impl AlfredList {
    /// Build the record list from a snippet table, in table-iteration order.
    pub fn from_table(table: &BTreeMap<String, String>) -> Self {
        let items = table
            .iter()
            .enumerate()
            .map(|(i, (key, value))| AlfredItem {
                uid: (i + 1) as u64,
                title: key.clone(),
                subtitle: value.clone(),
                arg: value.clone(),
                key: key.clone(),
            })
            .collect();

        Self { items }
    }
}

/// Serialize the snippet table to `path` as an Alfred list.
///
/// The parent directory is created if missing. Failures never affect the
/// table itself.
pub fn write_alfred_list(table: &BTreeMap<String, String>, path: &Path) -> Result<(), ExportError> {
    let list = AlfredList::from_table(table);
    let json = serde_json::to_string_pretty(&list)?;

    let write_err = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, json).map_err(write_err)?;

    info!(path = %path.display(), items = list.items.len(), "exported snippet list");
    Ok(())
}

/// Default export location under the user data directory.
pub fn default_export_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snipsync")
        .join("alfred-snippets.json")
}

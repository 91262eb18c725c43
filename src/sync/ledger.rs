//! Per-source modification-time tracking

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Process-lifetime map from source path to last-observed mtime.
///
/// Entries are only ever removed by [`ChangeLedger::clear`]; a full reset
/// must also clear the snippet table so the two stay consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLedger {
    entries: HashMap<PathBuf, u64>,
}

impl ChangeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source is stale when its observed mtime is strictly greater than
    /// the recorded one, or when it has never been recorded.
    pub fn is_stale(&self, path: &Path, modified_ms: u64) -> bool {
        match self.entries.get(path) {
            Some(&recorded) => modified_ms > recorded,
            None => true,
        }
    }

    /// Record the newly observed mtime for a source.
    pub fn record(&mut self, path: &Path, modified_ms: u64) {
        self.entries.insert(path.to_path_buf(), modified_ms);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

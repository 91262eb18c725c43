//! Incremental snippet synchronization
//!
//! The [`SyncEngine`] owns the two pieces of process-lifetime state: the
//! global snippet table and the change ledger. A sync pass enumerates the
//! documents under the configured root, re-extracts only the ones whose
//! modification time moved past their ledger entry, and merges the results
//! key-by-key so snippets from untouched documents survive a partial sync.

mod discover;
mod ledger;

pub use discover::{find_documents, snippet_prefix, SNIPPET_EXTENSION};
pub use ledger::ChangeLedger;

use crate::error::{ExtractError, SyncError};
use crate::extract::{HeadingProvider, MarkdownHeadingProvider, SnippetExtractor};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};

/// Outcome of one synchronization pass
#[derive(Debug)]
pub struct SyncReport {
    /// Whether any document was re-extracted; export can be skipped when false
    pub any_changed: bool,
    /// Documents re-extracted this pass
    pub extracted: usize,
    /// Documents skipped because their mtime had not moved
    pub skipped: usize,
    /// Per-document failures; each forfeits only that document's contribution
    pub warnings: Vec<ExtractError>,
    /// When the pass completed
    pub finished_at: DateTime<Utc>,
}

/// Owns the snippet table and change ledger and is their sole mutator.
pub struct SyncEngine {
    table: BTreeMap<String, String>,
    ledger: ChangeLedger,
    root: Option<PathBuf>,
    prefixed: Option<bool>,
    provider: Box<dyn HeadingProvider>,
    extractor: SnippetExtractor,
}

impl SyncEngine {
    /// Create an engine with the default markdown heading parser.
    pub fn new() -> Self {
        Self::with_provider(Box::new(MarkdownHeadingProvider::new()))
    }

    /// Create an engine with an injected heading parser.
    pub fn with_provider(provider: Box<dyn HeadingProvider>) -> Self {
        Self {
            table: BTreeMap::new(),
            ledger: ChangeLedger::new(),
            root: None,
            prefixed: None,
            provider,
            extractor: SnippetExtractor::new(),
        }
    }

    /// Run one synchronization pass over `root`.
    ///
    /// A root different from the previous pass triggers a full [`reset`]
    /// first, so stale keys from the old location never linger. The same
    /// happens when the document count crosses the one-to-many boundary,
    /// which changes how every key is prefixed. A missing root aborts the
    /// pass and leaves all existing state untouched.
    ///
    /// [`reset`]: SyncEngine::reset
    pub fn sync(&mut self, root: &Path) -> Result<SyncReport, SyncError> {
        if self.root.as_deref() != Some(root) {
            if self.root.is_some() {
                debug!(?root, "snippet root changed, resetting state");
                self.reset();
            }
            self.root = Some(root.to_path_buf());
        }

        let documents = find_documents(root)?;
        let prefixing = documents.len() > 1;

        // Crossing the one-to-many document boundary re-keys every snippet,
        // so state extracted under the old decision cannot be patched in
        // place; unchanged documents must be re-extracted too.
        if self.prefixed.is_some_and(|was| was != prefixing) {
            debug!(prefixing, "prefixing decision flipped, resetting state");
            self.reset();
        }
        self.prefixed = Some(prefixing);

        let mut report = SyncReport {
            any_changed: false,
            extracted: 0,
            skipped: 0,
            warnings: Vec::new(),
            finished_at: Utc::now(),
        };

        for document in &documents {
            let modified_ms = match modified_millis(document) {
                Ok(ms) => ms,
                Err(e) => {
                    warn!(path = %document.display(), error = %e, "failed to stat document");
                    report.warnings.push(e);
                    continue;
                }
            };

            if !self.ledger.is_stale(document, modified_ms) {
                debug!(path = %document.display(), "unchanged, skipping");
                report.skipped += 1;
                continue;
            }

            let content = match std::fs::read_to_string(document) {
                Ok(content) => content,
                Err(source) => {
                    let e = ExtractError::Read {
                        path: document.clone(),
                        source,
                    };
                    warn!(path = %document.display(), error = %e, "failed to read document");
                    report.warnings.push(e);
                    continue;
                }
            };

            let headings = self.provider.headings(&content);
            let prefix = prefixing.then(|| snippet_prefix(root, document));

            match self
                .extractor
                .extract(document, &content, &headings, prefix.as_deref())
            {
                Ok(snippets) => {
                    debug!(
                        path = %document.display(),
                        snippets = snippets.len(),
                        "re-extracted"
                    );
                    self.table.extend(snippets);
                    // Only successful extractions advance the ledger, so a
                    // failing document is retried on the next pass even if
                    // its mtime does not move again.
                    self.ledger.record(document, modified_ms);
                    report.extracted += 1;
                    report.any_changed = true;
                }
                Err(e) => {
                    warn!(path = %document.display(), error = %e, "document skipped");
                    report.warnings.push(e);
                }
            }
        }

        report.finished_at = Utc::now();
        info!(
            extracted = report.extracted,
            skipped = report.skipped,
            warnings = report.warnings.len(),
            total_snippets = self.table.len(),
            "sync pass complete"
        );

        Ok(report)
    }

    /// Clear both the snippet table and the change ledger.
    ///
    /// The next sync behaves as a full cold synchronization.
    pub fn reset(&mut self) {
        self.table.clear();
        self.ledger.clear();
        self.prefixed = None;
    }

    /// Snippet keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Look up one snippet value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.table.get(key).map(String::as_str)
    }

    /// The full snippet table, in table order.
    pub fn table(&self) -> &BTreeMap<String, String> {
        &self.table
    }

    /// The change ledger gating re-extraction.
    pub fn ledger(&self) -> &ChangeLedger {
        &self.ledger
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Observed modification time of a document, in epoch milliseconds.
fn modified_millis(path: &Path) -> Result<u64, ExtractError> {
    let read_err = |source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    };

    let modified = std::fs::metadata(path)
        .map_err(read_err)?
        .modified()
        .map_err(read_err)?;

    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn bump_mtime(path: &Path) {
        // Force a strictly greater mtime without sleeping past filesystem
        // timestamp granularity.
        let later = std::time::SystemTime::now() + std::time::Duration::from_secs(5);
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(later).unwrap();
    }

    #[test]
    fn test_single_file_no_prefix() {
        let dir = TempDir::new().unwrap();
        let file = write(
            &dir,
            "Snippets.md",
            "### Greeting\nHello\n\n### Farewell\n```text\nBye\n```\n",
        );

        let mut engine = SyncEngine::new();
        let report = engine.sync(&file).unwrap();

        assert!(report.any_changed);
        assert_eq!(report.extracted, 1);
        assert_eq!(engine.get("Greeting"), Some("Hello"));
        assert_eq!(engine.get("Farewell"), Some("Bye"));
    }

    #[test]
    fn test_directory_with_two_files_prefixes_keys() {
        let dir = TempDir::new().unwrap();
        write(&dir, "A.md", "### X\nfrom a\n");
        write(&dir, "B.md", "### X\nfrom b\n");

        let mut engine = SyncEngine::new();
        engine.sync(dir.path()).unwrap();

        let keys: Vec<_> = engine.keys().collect();
        assert_eq!(keys, vec!["A: X", "B: X"]);
        assert_eq!(engine.get("A: X"), Some("from a"));
        assert_eq!(engine.get("B: X"), Some("from b"));
    }

    #[test]
    fn test_nested_file_prefix_uses_relative_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "top.md", "### X\nt\n");
        write(&dir, "sub/inner.md", "### X\ni\n");

        let mut engine = SyncEngine::new();
        engine.sync(dir.path()).unwrap();

        assert_eq!(engine.get("sub/inner: X"), Some("i"));
    }

    #[test]
    fn test_second_document_prefixes_existing_keys() {
        let dir = TempDir::new().unwrap();
        write(&dir, "A.md", "### X\nfrom a\n");

        let mut engine = SyncEngine::new();
        engine.sync(dir.path()).unwrap();
        assert_eq!(engine.keys().collect::<Vec<_>>(), vec!["X"]);

        // A second document flips the prefixing decision, so A's key must
        // be re-extracted under its prefix even though A did not change.
        write(&dir, "B.md", "### X\nfrom b\n");
        engine.sync(dir.path()).unwrap();

        let keys: Vec<_> = engine.keys().collect();
        assert_eq!(keys, vec!["A: X", "B: X"]);
        assert_eq!(engine.get("A: X"), Some("from a"));
    }

    #[test]
    fn test_dropping_to_one_document_removes_prefixes() {
        let dir = TempDir::new().unwrap();
        write(&dir, "A.md", "### X\nfrom a\n");
        let b = write(&dir, "B.md", "### X\nfrom b\n");

        let mut engine = SyncEngine::new();
        engine.sync(dir.path()).unwrap();
        assert_eq!(engine.keys().collect::<Vec<_>>(), vec!["A: X", "B: X"]);

        fs::remove_file(&b).unwrap();
        engine.sync(dir.path()).unwrap();

        let keys: Vec<_> = engine.keys().collect();
        assert_eq!(keys, vec!["X"]);
        assert_eq!(engine.get("X"), Some("from a"));
    }

    #[test]
    fn test_unchanged_resync_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "Snippets.md", "### K\nv\n");

        let mut engine = SyncEngine::new();
        let first = engine.sync(&file).unwrap();
        let table_before = engine.table().clone();
        let ledger_before = engine.ledger().clone();

        let second = engine.sync(&file).unwrap();

        assert!(first.any_changed);
        assert!(!second.any_changed);
        assert_eq!(second.extracted, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(engine.table(), &table_before);
        assert_eq!(engine.ledger(), &ledger_before);
    }

    #[test]
    fn test_modified_document_is_reextracted() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "Snippets.md", "### K\nold\n");

        let mut engine = SyncEngine::new();
        engine.sync(&file).unwrap();
        assert_eq!(engine.get("K"), Some("old"));

        fs::write(&file, "### K\nnew\n").unwrap();
        bump_mtime(&file);

        let report = engine.sync(&file).unwrap();
        assert!(report.any_changed);
        assert_eq!(engine.get("K"), Some("new"));
    }

    #[test]
    fn test_inconsistent_document_contributes_nothing_but_pass_continues() {
        let dir = TempDir::new().unwrap();
        write(&dir, "bad.md", "## Chapter\nx\n\n### Detail\ny\n");
        write(&dir, "good.md", "### K\nv\n");

        let mut engine = SyncEngine::new();
        let report = engine.sync(dir.path()).unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            report.warnings[0],
            ExtractError::InconsistentHeadingLevel { .. }
        ));
        assert_eq!(engine.get("good: K"), Some("v"));
        assert!(engine.keys().all(|k| !k.starts_with("bad")));
    }

    #[test]
    fn test_failed_document_retried_without_mtime_change() {
        let dir = TempDir::new().unwrap();
        let bad = write(&dir, "bad.md", "## A\nx\n\n### B\ny\n");

        let mut engine = SyncEngine::new();
        let first = engine.sync(&bad).unwrap();
        assert_eq!(first.warnings.len(), 1);

        // Ledger was not advanced, so the next pass repeats the attempt.
        let second = engine.sync(&bad).unwrap();
        assert_eq!(second.warnings.len(), 1);
        assert_eq!(second.skipped, 0);
    }

    #[test]
    fn test_missing_root_preserves_state() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "Snippets.md", "### K\nv\n");

        let mut engine = SyncEngine::new();
        engine.sync(&file).unwrap();

        let missing = dir.path().join("gone");
        // Same engine, but pointed at a path that does not exist. The root
        // change resets the engine before discovery fails, matching a host
        // whose configured path was edited to something invalid.
        let mut cold = SyncEngine::new();
        assert!(matches!(
            cold.sync(&missing),
            Err(SyncError::PathNotFound { .. })
        ));

        // A transiently missing root under the same engine root.
        fs::remove_file(&file).unwrap();
        let err = engine.sync(&file).unwrap_err();
        assert!(matches!(err, SyncError::PathNotFound { .. }));
        assert_eq!(engine.get("K"), Some("v"));
    }

    #[test]
    fn test_root_change_resets_state() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        let a = write(&dir_a, "A.md", "### FromA\nv\n");
        let b = write(&dir_b, "B.md", "### FromB\nv\n");

        let mut engine = SyncEngine::new();
        engine.sync(&a).unwrap();
        assert!(engine.get("FromA").is_some());

        engine.sync(&b).unwrap();
        assert!(engine.get("FromA").is_none());
        assert!(engine.get("FromB").is_some());
    }

    #[test]
    fn test_reset_forces_cold_sync() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "Snippets.md", "### K\nv\n");

        let mut engine = SyncEngine::new();
        engine.sync(&file).unwrap();
        engine.reset();

        assert!(engine.is_empty());
        let report = engine.sync(&file).unwrap();
        assert!(report.any_changed);
        assert_eq!(engine.get("K"), Some("v"));
    }

    #[test]
    fn test_document_without_headings_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "plain.md", "just prose, no headings\n");

        let mut engine = SyncEngine::new();
        let report = engine.sync(&file).unwrap();

        assert!(report.warnings.is_empty());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_synthetic_heading_provider() {
        use crate::extract::Heading;

        struct Fixed;
        impl HeadingProvider for Fixed {
            fn headings(&self, _content: &str) -> Vec<Heading> {
                vec![Heading {
                    text: "Only".to_string(),
                    level: 1,
                    start_offset: 0,
                    end_offset: 5,
                }]
            }
        }

        let dir = TempDir::new().unwrap();
        let file = write(&dir, "any.md", "= Only\nbody\n");

        let mut engine = SyncEngine::with_provider(Box::new(Fixed));
        engine.sync(&file).unwrap();
        assert_eq!(engine.get("Only"), Some("body"));
    }
}

//! Turning one document into a key→value snippet mapping

use super::{split_sections, FenceNormalizer, Heading};
use crate::error::ExtractError;
use std::collections::BTreeMap;
use std::path::Path;

/// Extracts snippets from a single document.
///
/// All headings used for extraction must share one level; otherwise the
/// document contributes nothing. This keeps chapter headers and sub-bullets
/// of unrelated granularities from being mixed into one flat namespace.
pub struct SnippetExtractor {
    normalizer: FenceNormalizer,
}

impl SnippetExtractor {
    pub fn new() -> Self {
        Self {
            normalizer: FenceNormalizer::new(),
        }
    }

    /// Extract a snippet table from one document.
    ///
    /// An empty heading list is not an error and yields an empty table.
    /// When a non-empty `prefix` is supplied, every key becomes
    /// `"{prefix}: {heading}"`. Duplicate headings within the document
    /// overwrite earlier entries in heading order.
    pub fn extract(
        &self,
        path: &Path,
        content: &str,
        headings: &[Heading],
        prefix: Option<&str>,
    ) -> Result<BTreeMap<String, String>, ExtractError> {
        let mut snippets = BTreeMap::new();

        let Some(first) = headings.first() else {
            return Ok(snippets);
        };

        let level = first.level;
        if let Some(odd) = headings.iter().find(|h| h.level != level) {
            return Err(ExtractError::InconsistentHeadingLevel {
                path: path.to_path_buf(),
                expected: level,
                found: odd.level,
            });
        }

        for (heading_text, span) in split_sections(content, headings) {
            let value = self.normalizer.normalize(span).trim().to_string();
            let key = match prefix {
                Some(p) if !p.is_empty() => format!("{}: {}", p, heading_text),
                _ => heading_text.to_string(),
            };
            snippets.insert(key, value);
        }

        Ok(snippets)
    }
}

impl Default for SnippetExtractor {
    fn default() -> Self {
        Self::new()
    }
}

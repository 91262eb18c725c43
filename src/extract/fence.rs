//! Code-fence normalization
//!
//! Snippet bodies often wrap their payload in a fenced code block so the
//! source document renders nicely. The stored snippet value should be the
//! payload itself, so both delimiter lines are stripped and the interior is
//! kept verbatim.

use regex::Regex;

/// Strips balanced triple-backtick fences from a text span.
///
/// Each balanced fenced block (opening marker with an optional language tag,
/// matching closing marker) is replaced by its interior content; text outside
/// fences is untouched. Normalizing already-normalized text is a no-op.
///
/// Unbalanced fences do not match and are left as-is; a nested fence
/// terminates at the first closing marker. Both are undefined input.
pub struct FenceNormalizer {
    fence: Regex,
}

impl FenceNormalizer {
    pub fn new() -> Self {
        // Single-pass replace: opening line, lazily captured interior,
        // closing line. The interior's trailing newline belongs to the
        // closing delimiter.
        let fence = Regex::new(r"(?m)^```[^\n]*\n(?s:(.*?))\n?^```[ \t]*$\n?")
            .expect("fence pattern is valid");
        Self { fence }
    }

    /// Replace every balanced fenced block with its interior content.
    pub fn normalize(&self, span: &str) -> String {
        self.fence.replace_all(span, "${1}\n").into_owned()
    }
}

impl Default for FenceNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

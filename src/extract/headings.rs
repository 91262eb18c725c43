//! Heading model and the heading-parse capability
//!
//! The extraction engine consumes an already-parsed heading list, not raw
//! markup, so extraction is testable with synthetic headings. The default
//! provider parses markdown with pulldown-cmark, which keeps headings inside
//! code fences from being misread as section delimiters.

use pulldown_cmark::{Event, HeadingLevel as CmarkHeadingLevel, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// A section delimiter within a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// The heading text, without markers
    pub text: String,
    /// Structural depth (1 = H1 .. 6 = H6)
    pub level: u32,
    /// Byte offset of the first character of the heading line
    pub start_offset: usize,
    /// Byte offset of the last character of the heading line (inclusive)
    pub end_offset: usize,
}

/// Capability that turns raw document text into an ordered heading list
pub trait HeadingProvider {
    /// Parse all headings in `content`, in document order
    fn headings(&self, content: &str) -> Vec<Heading>;
}

/// Default provider backed by pulldown-cmark
pub struct MarkdownHeadingProvider;

impl MarkdownHeadingProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownHeadingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingProvider for MarkdownHeadingProvider {
    fn headings(&self, content: &str) -> Vec<Heading> {
        let mut headings = Vec::new();

        let mut in_heading = false;
        let mut heading_text = String::new();
        let mut heading_level = 1;
        let mut heading_span = 0..0;

        for (event, range) in Parser::new(content).into_offset_iter() {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    in_heading = true;
                    heading_level = heading_depth(level);
                    heading_text.clear();
                    heading_span = range;
                }
                Event::End(TagEnd::Heading(_)) => {
                    in_heading = false;

                    // The element range includes the trailing newline;
                    // end_offset points at the last visible character.
                    let raw = content.get(heading_span.clone()).unwrap_or("");
                    let trimmed = raw.trim_end();
                    if trimmed.is_empty() {
                        continue;
                    }

                    headings.push(Heading {
                        text: heading_text.trim().to_string(),
                        level: heading_level,
                        start_offset: heading_span.start,
                        end_offset: heading_span.start + trimmed.len() - 1,
                    });
                }
                Event::Text(text) if in_heading => {
                    heading_text.push_str(&text);
                }
                Event::Code(code) if in_heading => {
                    heading_text.push_str(&code);
                }
                _ => {}
            }
        }

        headings
    }
}

fn heading_depth(level: CmarkHeadingLevel) -> u32 {
    match level {
        CmarkHeadingLevel::H1 => 1,
        CmarkHeadingLevel::H2 => 2,
        CmarkHeadingLevel::H3 => 3,
        CmarkHeadingLevel::H4 => 4,
        CmarkHeadingLevel::H5 => 5,
        CmarkHeadingLevel::H6 => 6,
    }
}

//! Snippet extraction from heading-delimited markdown
//!
//! This module turns one document into a flat key→value snippet mapping:
//! - Headings are parsed (or injected) with byte offsets
//! - Each heading owns the text span up to the next heading of the document
//! - Code-fence delimiters are stripped from each span

pub mod fence;
pub mod headings;
pub mod section;
pub mod snippet;

pub use fence::FenceNormalizer;
pub use headings::{Heading, HeadingProvider, MarkdownHeadingProvider};
pub use section::split_sections;
pub use snippet::SnippetExtractor;

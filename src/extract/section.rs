//! Splitting a document into per-heading text spans

use super::Heading;

/// Produce the raw text span owned by each heading.
///
/// The span for heading `i` runs from one character past that heading's own
/// end offset to one character before the next heading's start offset, or to
/// end of document for the last heading. The heading line itself is never
/// part of its own body. No trimming or normalization happens here.
///
/// Offsets are clamped to the content length so a misbehaving provider
/// cannot cause out-of-range slicing.
pub fn split_sections<'c>(content: &'c str, headings: &'c [Heading]) -> Vec<(&'c str, &'c str)> {
    let mut sections = Vec::with_capacity(headings.len());

    for (i, heading) in headings.iter().enumerate() {
        let start = (heading.end_offset + 1).min(content.len());
        let end = match headings.get(i + 1) {
            Some(next) => next.start_offset.saturating_sub(1).clamp(start, content.len()),
            None => content.len(),
        };

        let span = content.get(start..end).unwrap_or("");
        sections.push((heading.text.as_str(), span));
    }

    sections
}

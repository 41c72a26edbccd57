use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;

pub const START_MARKER: &str = "From Wikipedia, the free encyclopedia";

/// Trailing sections that end the article body, in priority order.
const END_MARKERS: &[&str] = &[
    r#"id="See_also"#,
    r#"id="References"#,
    r#"id="Notes_and_references"#,
    r#"id="Further_reading"#,
    r#"id="Bibliography"#,
    r#"id="External_links"#,
];

const LEAD_END: &str = "<h2>";

static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<p>(.*?)</p>").unwrap());

/// Content between the boilerplate notice and the first trailing section.
/// Markers are looked up across the whole page; one that precedes the notice
/// leaves the region empty.
pub fn extract_region(markup: &str) -> Result<&str, ExtractError> {
    let start = markup
        .find(START_MARKER)
        .map(|i| i + START_MARKER.len())
        .ok_or(ExtractError::MissingStartMarker(START_MARKER))?;

    let end = END_MARKERS
        .iter()
        .filter_map(|marker| markup.find(marker))
        .fold(markup.len(), usize::min);

    Ok(&markup[start..end.max(start)])
}

/// The lead section: region up to the first `<h2>`, or the whole region when
/// the article has no sections.
pub fn lead_section(region: &str) -> &str {
    match region.find(LEAD_END) {
        Some(end) => &region[..end],
        None => region,
    }
}

/// Inner markup of every `<p>…</p>` fragment, joined by single spaces.
pub fn collect_paragraphs(markup: &str) -> String {
    PARAGRAPH_RE
        .captures_iter(markup)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

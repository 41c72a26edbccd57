use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// href must precede title; anchors written the other way round are skipped.
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a href="/wiki/(.*?)".*?title="(.*?)".*?>(.*?)</a>"#).unwrap()
});

/// Separator of non-article namespaces (`Category:`, `File:`, `Help:` ...).
const NAMESPACE_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    pub title: String,
    pub text: String,
}

/// Article links in document order. Repeated links are all kept.
pub fn extract_links(markup: &str, site_root: &str) -> Vec<LinkRecord> {
    ANCHOR_RE
        .captures_iter(markup)
        .filter(|caps| !caps[1].contains(NAMESPACE_SEPARATOR))
        .map(|caps| LinkRecord {
            url: format!("{}{}", site_root, &caps[1]),
            title: caps[2].to_string(),
            text: caps[3].to_string(),
        })
        .collect()
}

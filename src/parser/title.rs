use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<h1 id="firstHeading" class="firstHeading" lang="en">(.*?)</h1>"#).unwrap()
});

pub fn extract_title(markup: &str) -> Result<String, ExtractError> {
    TITLE_RE
        .captures(markup)
        .map(|caps| caps[1].to_string())
        .ok_or(ExtractError::TitleNotFound)
}

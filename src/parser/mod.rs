pub mod clean;
pub mod links;
pub mod region;
pub mod title;
pub mod tokenize;

use serde::Serialize;
use tracing::debug;

use crate::error::ExtractError;
use clean::clean_text;
use links::LinkRecord;

#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub body: String,
    pub links: Vec<LinkRecord>,
    /// `None` when tokens were not requested; an empty list means the body
    /// has no terminated sentence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentences: Option<Vec<Vec<String>>>,
}

impl Article {
    /// Drop the token lists, keeping the text artifacts.
    pub fn without_tokens(mut self) -> Self {
        self.sentences = None;
        self
    }
}

/// Markup → article: title, summary, body, links, sentence/word tokens.
pub fn process_page(markup: &str, site_root: &str) -> Result<Article, ExtractError> {
    let title = title::extract_title(markup)?;
    let region = region::extract_region(markup)?;
    let summary = summary_text(region);
    let body = body_text(region);
    let links = links::extract_links(markup, site_root);
    let sentences = tokenize::split_text(&body);

    debug!(
        title = %title,
        summary_chars = summary.len(),
        body_chars = body.len(),
        links = links.len(),
        sentences = sentences.len(),
        "processed page"
    );

    Ok(Article {
        title,
        summary,
        body,
        links,
        sentences: Some(sentences),
    })
}

/// Plain text of the lead section of a region.
pub fn summary_text(region: &str) -> String {
    clean_text(&region::collect_paragraphs(region::lead_section(region)))
}

/// Plain text of a whole region.
pub fn body_text(region: &str) -> String {
    clean_text(&region::collect_paragraphs(region))
}

// ── Tests ──

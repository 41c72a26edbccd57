use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tracing::{info, warn};

use crate::fetcher;
use crate::parser::{self, Article};
use crate::settings::Settings;

/// Outcome of fetching one title. Failures are kept so they can be reported.
pub struct FetchedPage {
    pub title: String,
    pub url: String,
    pub markup: Option<String>,
    pub error: Option<String>,
    pub latency_ms: u64,
    pub fetched_at: DateTime<Utc>,
}

/// One line of batch output.
#[derive(Debug, Serialize)]
pub struct ArticleRecord {
    pub requested: String,
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<Article>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ArticleRecord {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Batch stats returned after completion.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScrapeStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

/// Fetch and extract all titles, writing one JSON line per title to `out` as
/// soon as it and every earlier title are done. At most `settings.concurrency`
/// pages are fetched or held as raw markup at once.
pub async fn scrape_to_writer<W: Write>(
    client: &Client,
    settings: &Settings,
    titles: Vec<String>,
    with_tokens: bool,
    out: &mut W,
) -> Result<ScrapeStats> {
    let semaphore = Arc::new(Semaphore::new(settings.concurrency));
    let total = titles.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Channel: workers send finished records, main loop writes them
    let (tx, rx) = mpsc::channel::<(usize, ArticleRecord)>(settings.concurrency * 2);

    for (index, title) in titles.into_iter().enumerate() {
        let client = client.clone();
        let settings = settings.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            // Held until extraction finishes so raw markup stays bounded.
            let Ok(_permit) = sem.acquire_owned().await else {
                return;
            };
            let page = fetch_one(&client, &settings, title).await;
            let record = extract_on_pool(page, settings.site_root, with_tokens).await;
            let _ = tx.send((index, record)).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let stats = write_in_order(rx, out, &pb).await?;

    pb.finish_and_clear();
    info!("Scraped {} pages ({} ok, {} errors)", stats.total, stats.ok, stats.errors);
    Ok(stats)
}

async fn fetch_one(client: &Client, settings: &Settings, title: String) -> FetchedPage {
    let url = fetcher::make_url(&settings.site_root, &title);
    let start = Instant::now();
    let result = fetcher::fetch_page(client, settings, &title).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (markup, error) = match result {
        Ok(markup) => (Some(markup), None),
        Err(e) => {
            warn!("Fetch failed for {}: {:#}", title, e);
            (None, Some(format!("{:#}", e)))
        }
    };

    FetchedPage {
        title,
        url,
        markup,
        error,
        latency_ms,
        fetched_at: Utc::now(),
    }
}

/// Run extraction on the rayon pool so the async workers only wait on I/O.
async fn extract_on_pool(page: FetchedPage, site_root: String, with_tokens: bool) -> ArticleRecord {
    let (done_tx, done_rx) = oneshot::channel();
    let requested = page.title.clone();
    let url = page.url.clone();
    let fetched_at = page.fetched_at;
    let latency_ms = page.latency_ms;

    rayon::spawn(move || {
        let _ = done_tx.send(to_record(page, &site_root, with_tokens));
    });

    done_rx.await.unwrap_or_else(|_| ArticleRecord {
        requested,
        url,
        fetched_at,
        latency_ms,
        article: None,
        error: Some("extraction worker panicked".to_string()),
    })
}

/// Consumes the page; its markup is dropped once the article is built.
fn to_record(page: FetchedPage, site_root: &str, with_tokens: bool) -> ArticleRecord {
    let (article, error) = match (&page.markup, page.error) {
        (Some(markup), _) => match parser::process_page(markup, site_root) {
            Ok(article) if with_tokens => (Some(article), None),
            Ok(article) => (Some(article.without_tokens()), None),
            Err(e) => {
                warn!("Extraction failed for {}: {}", page.title, e);
                (None, Some(e.to_string()))
            }
        },
        (None, Some(e)) => (None, Some(e)),
        (None, None) => (None, Some("no markup fetched".to_string())),
    };

    ArticleRecord {
        requested: page.title,
        url: page.url,
        fetched_at: page.fetched_at,
        latency_ms: page.latency_ms,
        article,
        error,
    }
}

/// Records that finished ahead of an earlier index wait here until the gap
/// closes.
struct Reorder<T> {
    next: usize,
    pending: BTreeMap<usize, T>,
}

impl<T> Reorder<T> {
    fn new() -> Self {
        Reorder {
            next: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Returns every item that is now in sequence.
    fn push(&mut self, index: usize, item: T) -> Vec<T> {
        self.pending.insert(index, item);
        let mut ready = Vec::new();
        while let Some(item) = self.pending.remove(&self.next) {
            ready.push(item);
            self.next += 1;
        }
        ready
    }

    fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

async fn write_in_order<W: Write>(
    mut rx: mpsc::Receiver<(usize, ArticleRecord)>,
    out: &mut W,
    pb: &ProgressBar,
) -> Result<ScrapeStats> {
    let mut stats = ScrapeStats::default();
    let mut reorder = Reorder::new();

    while let Some((index, record)) = rx.recv().await {
        for record in reorder.push(index, record) {
            stats.total += 1;
            if record.is_ok() {
                stats.ok += 1;
            } else {
                stats.errors += 1;
            }
            serde_json::to_writer(&mut *out, &record)?;
            writeln!(out)?;
            pb.inc(1);
        }
        out.flush()?;
    }

    if !reorder.is_empty() {
        warn!("{} records never got their predecessors", reorder.pending.len());
    }
    Ok(stats)
}

/// Titles file: one per line; blank lines and `#` comments are skipped.
pub fn parse_titles(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::settings::Settings;

/// Address of an article. The title is appended as-is; reserved characters
/// are the caller's problem.
pub fn make_url(site_root: &str, title: &str) -> String {
    format!("{}{}", site_root, title)
}

pub fn build_client(settings: &Settings) -> Result<Client> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch the raw markup of one article, backing off on rate limits and
/// server errors.
pub async fn fetch_page(client: &Client, settings: &Settings, title: &str) -> Result<String> {
    let url = make_url(&settings.site_root, title);

    for attempt in 0..settings.max_retries {
        match fetch_once(client, &url).await? {
            Fetched::Page(markup) => return Ok(markup),
            Fetched::Retryable(status) => {
                let backoff = backoff_for(settings.base_backoff_ms, attempt);
                warn!(
                    "{} returned {} (attempt {}/{}), backing off {:.1}s",
                    url,
                    status,
                    attempt + 1,
                    settings.max_retries,
                    backoff.as_secs_f64()
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }

    match fetch_once(client, &url).await? {
        Fetched::Page(markup) => Ok(markup),
        Fetched::Retryable(status) => bail!("{} still failing with {} after retries", url, status),
    }
}

enum Fetched {
    Page(String),
    Retryable(StatusCode),
}

async fn fetch_once(client: &Client, url: &str) -> Result<Fetched> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    let status = response.status();
    if should_retry(status) {
        return Ok(Fetched::Retryable(status));
    }
    if !status.is_success() {
        bail!("{} returned {}", url, status);
    }

    let markup = response
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))?;
    debug!(url, bytes = markup.len(), "fetched page");
    Ok(Fetched::Page(markup))
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn backoff_for(base_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(2u64.saturating_pow(attempt)))
}

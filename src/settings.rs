use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_SITE_ROOT: &str = "http://en.wikipedia.org/wiki/";

/// Runtime settings. Defaults below, overridden by `WIKI_*` env vars
/// (`WIKI_SITE_ROOT`, `WIKI_CONCURRENCY`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub site_root: String,
    pub concurrency: usize,
    pub max_retries: u32,
    pub base_backoff_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(Config::builder().add_source(Environment::with_prefix("WIKI")))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let settings: Settings = builder
            .set_default("site_root", DEFAULT_SITE_ROOT)?
            .set_default("concurrency", 4_i64)?
            .set_default("max_retries", 3_i64)?
            .set_default("base_backoff_ms", 2000_i64)?
            .set_default("timeout_secs", 30_i64)?
            .set_default("user_agent", concat!("wiki_scraper/", env!("CARGO_PKG_VERSION")))?
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        Ok(settings.normalized())
    }

    /// Titles are appended verbatim, so the root must end with a slash.
    fn normalized(mut self) -> Self {
        if !self.site_root.ends_with('/') {
            self.site_root.push('/');
        }
        self.concurrency = self.concurrency.max(1);
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            site_root: DEFAULT_SITE_ROOT.to_string(),
            concurrency: 4,
            max_retries: 3,
            base_backoff_ms: 2000,
            timeout_secs: 30,
            user_agent: concat!("wiki_scraper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

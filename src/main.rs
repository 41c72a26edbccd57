mod error;
mod fetcher;
mod parser;
mod scraper;
mod settings;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use settings::Settings;

#[derive(Parser)]
#[command(name = "wiki_scraper", about = "Encyclopedia article text and link extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one article and print its extracted text and links as JSON
    Fetch {
        /// Article title as it appears in the URL (e.g. "Web_scraping")
        title: String,
        /// Include sentence/word tokens
        #[arg(long)]
        tokens: bool,
    },
    /// Run extraction on a saved article page
    Parse {
        file: PathBuf,
        /// Include sentence/word tokens
        #[arg(long)]
        tokens: bool,
    },
    /// Print the article links of a saved page
    Links { file: PathBuf },
    /// Split plain text into sentences and tokens
    Split {
        /// Read text from a file instead of the argument
        #[arg(short, long)]
        file: Option<PathBuf>,
        text: Option<String>,
    },
    /// Fetch and extract many articles, writing JSON Lines
    Batch {
        /// File with one title per line
        titles: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Max titles to process
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Include sentence/word tokens
        #[arg(long)]
        tokens: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(site_root = %settings.site_root, concurrency = settings.concurrency, "settings loaded");

    match cli.command {
        Commands::Fetch { title, tokens } => {
            let client = fetcher::build_client(&settings)?;
            let markup = fetcher::fetch_page(&client, &settings, &title).await?;
            let article = parser::process_page(&markup, &settings.site_root)
                .with_context(|| format!("Failed to extract {}", title))?;
            print_json(&select_tokens(article, tokens))?;
        }
        Commands::Parse { file, tokens } => {
            let markup = read_file(&file)?;
            let article = parser::process_page(&markup, &settings.site_root)
                .with_context(|| format!("Failed to extract {}", file.display()))?;
            print_json(&select_tokens(article, tokens))?;
        }
        Commands::Links { file } => {
            let markup = read_file(&file)?;
            let links = parser::links::extract_links(&markup, &settings.site_root);
            print_json(&links)?;
        }
        Commands::Split { file, text } => {
            let text = match (file, text) {
                (Some(path), _) => read_file(&path)?,
                (None, Some(text)) => text,
                (None, None) => anyhow::bail!("Pass TEXT or --file"),
            };
            for sentence in parser::tokenize::split_text(&text) {
                println!("{}", sentence.join(" | "));
            }
        }
        Commands::Batch { titles, out, limit, tokens } => {
            let mut titles = scraper::parse_titles(&read_file(&titles)?);
            if let Some(n) = limit {
                titles.truncate(n);
            }
            if titles.is_empty() {
                eprintln!("No titles to fetch.");
                return Ok(());
            }

            let client = fetcher::build_client(&settings)?;
            let mut writer: Box<dyn Write> = match &out {
                Some(path) => Box::new(std::io::BufWriter::new(
                    std::fs::File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(std::io::stdout().lock()),
            };

            eprintln!("Fetching {} articles...", titles.len());
            let stats =
                scraper::scrape_to_writer(&client, &settings, titles, tokens, &mut writer).await?;
            writer.flush()?;

            eprintln!("Done: {} articles ({} ok, {} errors).", stats.total, stats.ok, stats.errors);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn select_tokens(article: parser::Article, tokens: bool) -> parser::Article {
    if tokens {
        article
    } else {
        article.without_tokens()
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

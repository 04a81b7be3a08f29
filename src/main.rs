//! # IJGIS Feed
//!
//! Harvests the latest articles from the table of contents of the
//! *International Journal of Geographical Information Science* on Taylor &
//! Francis Online and publishes them as an RSS 2.0 feed with full abstracts.
//!
//! ## Usage
//!
//! ```sh
//! ijgis_feed -o ./feed.xml
//! ```
//!
//! ## Architecture
//!
//! One run is a sequential pipeline:
//! 1. **Listing**: Fetch the table of contents and extract up to 20 entries
//! 2. **Enrichment**: Fetch each article page and extract its abstract
//! 3. **Normalization**: Parse publication dates, defaulting to the harvest time
//! 4. **Output**: Render the RSS document and write it, replacing the previous file
//!
//! Failures inside the pipeline degrade to skipped entries or placeholder
//! text. Only invalid configuration stops the process.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dates;
mod error;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::FeedConfig;
use fetch::HttpFetcher;
use outputs::rss;
use scrapers::listing::Harvester;
use utils::{ensure_writable_parent, truncate_for_log};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let harvest_time = Utc::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = FeedConfig::load(args.config.as_deref())?.with_cli_overrides(&args);
    debug!(?config, "Resolved configuration");

    // Early check: fail before any network I/O if the feed cannot be written
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(
            path = %args.output,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = HttpFetcher::new(
        &config.source.user_agent,
        Duration::from_secs(config.source.timeout_secs),
    )?;
    let harvester = Harvester::new(fetcher, &config)?;

    info!(listing_url = %config.source.listing_url, "Fetching IJGIS articles...");
    let articles = harvester.harvest(harvest_time).await;

    if articles.is_empty() {
        info!("No articles found");
    } else {
        info!(count = articles.len(), "Found articles");
        publish(&config, &articles, &args.output).await;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Render and write the feed. Failures are logged, not returned.
#[instrument(level = "info", skip_all, fields(path = %output))]
async fn publish(config: &FeedConfig, articles: &[models::Article], output: &str) {
    let xml = match rss::render_feed(&config.channel, articles) {
        Ok(xml) => xml,
        Err(e) => {
            error!(error = %e, "Failed to render RSS feed");
            return;
        }
    };
    debug!(preview = %truncate_for_log(&xml, 300), "Rendered RSS feed");

    match rss::write_feed(output, &xml).await {
        Ok(()) => info!(
            count = articles.len(),
            "RSS feed generated successfully"
        ),
        Err(e) => error!(error = %e, "Failed to write RSS feed"),
    }
}

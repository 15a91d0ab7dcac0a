//! # orbitwire
//!
//! A batch RSS/Atom aggregator that refreshes a static space and defense
//! news dashboard in place.
//!
//! ## Features
//!
//! - Fetches a declarative table of space and defense feeds (RSS or Atom)
//! - Normalizes entries against a single reference time: UTC timestamps,
//!   bucketed age strings, recency flags, best-effort images
//! - Ranks by freshness, surfaces one breaking headline, and groups the rest
//!   by source with a per-source cap
//! - Splices rendered fragments into the page between sentinel markers,
//!   leaving every byte outside the markers untouched
//! - Optionally writes a JSON snapshot of the ranked result
//!
//! ## Usage
//!
//! ```sh
//! orbitwire --page index.html --json-out headlines.json
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetch**: pull every registry feed (8 at a time, registry order kept)
//! 2. **Normalize**: flatten raw entries into articles, dropping the unusable
//! 3. **Rank**: freshness window, global sort, breaking pick, capped groups
//! 4. **Render**: build HTML fragments and splice them into the page

use chrono::Utc;
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod feed;
mod models;
mod normalize;
mod outputs;
mod rank;

use cli::Cli;
use feed::FeedClient;
use outputs::{html, json, page};

/// Feeds fetched concurrently. Output order still follows the registry.
const PARALLEL_FETCHES: usize = 8;

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
    info!("orbitwire starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.page, ?args.sources, ?args.json_out, dry_run = args.dry_run, "Parsed CLI arguments");

    // ---- Load configuration ----
    let config = config::load(args.sources.as_deref())?;
    info!(
        sources = config.registry.len(),
        window_hours = config.run.freshness_window_hours,
        group_cap = config.run.group_cap,
        "Configuration loaded"
    );

    // Early check: read the page template before spending time on the
    // network. An unreadable template is the one failure worth dying for.
    let template = if args.dry_run {
        None
    } else {
        match page::read_page(&args.page).await {
            Ok(t) => Some(t),
            Err(e) => {
                error!(
                    path = %args.page,
                    error = %e,
                    "Cannot read the page template (fix the path or pass --page)"
                );
                return Err(e);
            }
        }
    };

    // Single reference time for the whole run. Every age string and recency
    // flag downstream is computed against this instant.
    let now = Utc::now();

    // ---- Fetch feeds ----
    let client = FeedClient::new();
    info!(parallel_fetches = PARALLEL_FETCHES, "Starting feed fetching");

    // buffered (not buffer_unordered) keeps results in registry order, which
    // the ranking tie-break depends on.
    let fetched: Vec<_> = stream::iter(config.registry.sources())
        .map(|source| {
            let client = &client;
            async move { (source, client.fetch(&source.endpoint).await) }
        })
        .buffered(PARALLEL_FETCHES)
        .collect()
        .await;

    // ---- Normalize ----
    let mut articles = Vec::new();
    let mut failed_sources = 0usize;
    let mut skipped_entries = 0usize;
    for (source, outcome) in fetched {
        match outcome {
            Ok(entries) => {
                let fetched_count = entries.len();
                let mut kept = 0usize;
                for entry in &entries {
                    match normalize::normalize(entry, source, now, &config.run) {
                        Some(article) => {
                            articles.push(article);
                            kept += 1;
                        }
                        None => skipped_entries += 1,
                    }
                }
                debug!(source = %source.name, fetched = fetched_count, kept, "Normalized feed entries");
            }
            Err(e) => {
                failed_sources += 1;
                warn!(source = %source.name, error = %e, "Feed fetch failed; continuing without this source");
            }
        }
    }
    info!(
        count = articles.len(),
        skipped = skipped_entries,
        failed_sources,
        "Normalization complete"
    );

    // ---- Rank ----
    let result = rank::rank(articles, &config.registry, now, &config.run);
    if result.is_empty() {
        info!("No headlines survived the freshness window; page will show the empty state");
    } else {
        info!(
            top = result.top.as_ref().map(|a| a.title.as_str()).unwrap_or(""),
            groups = result.groups.iter().filter(|g| !g.articles.is_empty()).count(),
            "Ranking complete"
        );
    }

    // ---- Render and splice ----
    let fragments = html::page_fragments(&result);

    if let Some(template) = template {
        let updated = page::apply_fragments(&template, &fragments);
        if let Err(e) = page::write_page(&args.page, &updated).await {
            error!(path = %args.page, error = %e, "Failed to write the page");
            return Err(e);
        }
    } else {
        info!("Dry run; leaving the page untouched");
    }

    // ---- JSON snapshot ----
    if let Some(ref json_path) = args.json_out {
        if args.dry_run {
            info!(path = %json_path, "Dry run; skipping JSON snapshot");
        } else if let Err(e) = json::write_snapshot(&result, json_path).await {
            error!(path = %json_path, error = %e, "Failed to write JSON snapshot");
        }
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

//! Command-line interface definitions for orbitwire.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every run is batch-shaped: fetch, rank, splice, exit.

use clap::Parser;

/// Command-line arguments for the orbitwire aggregator.
///
/// # Examples
///
/// ```sh
/// # Update index.html in place using the built-in source table
/// orbitwire
///
/// # Update a different page and keep a JSON snapshot of the run
/// orbitwire --page site/index.html --json-out site/headlines.json
///
/// # Check what a run would produce without touching the page
/// orbitwire --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the HTML page containing the splice markers
    #[arg(short, long, default_value = "index.html")]
    pub page: String,

    /// Optional YAML file replacing the built-in source table
    #[arg(short, long)]
    pub sources: Option<String>,

    /// Optional path for a JSON snapshot of the ranked result
    #[arg(short, long)]
    pub json_out: Option<String>,

    /// Fetch and rank but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

//! # News Snapshot
//!
//! Archives a news site's editorial RSS feed together with the "hot stories"
//! highlighted on its homepage as one dated JSON file.
//!
//! ## Usage
//!
//! ```sh
//! news_snapshot --date 2025-05-06
//! ```
//!
//! ## Architecture
//!
//! Each run is strictly sequential:
//! 1. **Feed**: fetch the editors' pick feed and extract article records
//! 2. **Homepage**: fetch the homepage and extract hot stories
//! 3. **Output**: write `data/<prefix>_<YYYY-MM-DD>.json`, replacing any
//!    earlier snapshot for that date
//!
//! Fetch and parse failures only empty the affected list. The process exits
//! non-zero only when the snapshot cannot be written or the configuration is
//! unusable.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod error;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::AppConfig;
use pipeline::Pipeline;
use utils::ensure_writable_dir;

#[tokio::main]
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
    info!("news_snapshot starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => {
            let config = AppConfig::load(path)?;
            info!(config_path = %path.display(), "Loaded configuration");
            config
        }
        None => AppConfig::default(),
    };
    args.apply_overrides(&mut config);

    let pipeline = Pipeline::from_config(&config)?;

    // Early check so an unusable output location fails before any fetch
    let output_dir = pipeline.writer().output_dir();
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let summary = match pipeline.run(args.date.as_deref()).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Failed to write snapshot");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        editors_pick = summary.editors_pick_count,
        hot_stories = summary.hot_stories_count,
        fetch_date = %summary.fetch_date,
        path = %summary.path.display(),
        ?elapsed,
        "Successfully saved {} editor picks and {} hot stories to {}",
        summary.editors_pick_count,
        summary.hot_stories_count,
        summary.path.display()
    );

    Ok(())
}

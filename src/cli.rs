//! Command-line interface definitions.
//!
//! Flags override the matching fields of the YAML configuration, which in
//! turn overrides the built-in defaults.

use crate::config::{AppConfig, HotStoryStrategy};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for a snapshot run.
///
/// # Examples
///
/// ```sh
/// # Snapshot for today into ./data
/// news_snapshot
///
/// # Re-file a run under an explicit date
/// news_snapshot --date 2025-05-06
///
/// # Custom config, heuristic hot-story scraping only
/// news_snapshot -c snapshot.yaml --hot-stories-strategy heuristic
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Override date (YYYY-MM-DD format); invalid values fall back to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Directory the snapshot JSON is written to
    #[arg(short, long, env = "SNAPSHOT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// How hot stories are scraped from the homepage
    #[arg(long, value_enum)]
    pub hot_stories_strategy: Option<HotStoryStrategy>,

    /// Per-request HTTP timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Apply flag values on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(strategy) = self.hot_stories_strategy {
            config.hot_stories.strategy = strategy;
        }
        if let Some(secs) = self.timeout_secs {
            config.fetch.timeout_secs = secs;
        }
    }
}

//! Run orchestration: fetch, extract, write.
//!
//! The feed and the homepage are handled one after the other and
//! independently. A fetch or parse failure in either only empties that
//! source's list; the snapshot is written regardless. Only a
//! [`WriteError`] ends the run early.

use crate::config::AppConfig;
use crate::error::{SetupError, WriteError};
use crate::fetcher::Fetcher;
use crate::models::{ArticleRecord, HotStoryRecord};
use crate::outputs::json::SnapshotWriter;
use crate::scrapers::feed::{FeedExtractor, SyndicationFeedExtractor};
use crate::scrapers::hot_stories::{self, HotStoryExtractor};
use crate::utils::{resolve_fetch_date, truncate_for_log};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub fetch_date: String,
    pub path: PathBuf,
    pub editors_pick_count: usize,
    pub hot_stories_count: usize,
}

/// Sequences the fetcher, both extractors and the snapshot writer.
pub struct Pipeline {
    fetcher: Fetcher,
    feed_url: String,
    homepage_url: String,
    feed: Box<dyn FeedExtractor>,
    hot_stories: Box<dyn HotStoryExtractor>,
    writer: SnapshotWriter,
}

impl Pipeline {
    /// Assemble the pipeline described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, SetupError> {
        Ok(Self {
            fetcher: Fetcher::new(&config.fetch)?,
            feed_url: config.feed_url.clone(),
            homepage_url: config.homepage_url.clone(),
            feed: Box::new(SyndicationFeedExtractor::new(&config.feed_source_tag)),
            hot_stories: hot_stories::from_config(&config.hot_stories, &config.base_url)?,
            writer: SnapshotWriter::new(&config.output_dir, &config.file_prefix),
        })
    }

    #[cfg(test)]
    fn with_feed_extractor(mut self, feed: Box<dyn FeedExtractor>) -> Self {
        self.feed = feed;
        self
    }

    pub fn writer(&self) -> &SnapshotWriter {
        &self.writer
    }

    /// Produce one snapshot.
    ///
    /// `date_override` must be `YYYY-MM-DD`; anything else is logged and the
    /// current local date is used instead.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, date_override: Option<&str>) -> Result<RunSummary, WriteError> {
        let fetch_date = resolve_fetch_date(date_override);

        let articles = self.collect_articles().await;
        let hot_stories = self.collect_hot_stories().await;
        let editors_pick_count = articles.len();
        let hot_stories_count = hot_stories.len();

        let path = self.writer.write(&fetch_date, articles, hot_stories).await?;
        info!(
            editors_pick = editors_pick_count,
            hot_stories = hot_stories_count,
            path = %path.display(),
            "Saved snapshot"
        );

        Ok(RunSummary {
            fetch_date,
            path,
            editors_pick_count,
            hot_stories_count,
        })
    }

    #[instrument(level = "info", skip(self), fields(url = %self.feed_url))]
    async fn collect_articles(&self) -> Vec<ArticleRecord> {
        let body = match self.fetcher.fetch(&self.feed_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Error fetching editors' pick feed; continuing without articles");
                return Vec::new();
            }
        };

        match self.feed.parse(&body) {
            Ok(articles) => {
                info!(count = articles.len(), "Collected editors' pick articles");
                articles
            }
            Err(e) => {
                warn!(
                    error = %e,
                    body_preview = %truncate_for_log(&body, 200),
                    "Could not parse editors' pick feed; continuing without articles"
                );
                Vec::new()
            }
        }
    }

    #[instrument(level = "info", skip(self), fields(url = %self.homepage_url))]
    async fn collect_hot_stories(&self) -> Vec<HotStoryRecord> {
        let body = match self.fetcher.fetch(&self.homepage_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Error fetching hot stories; continuing without them");
                return Vec::new();
            }
        };

        match self.hot_stories.parse(&body) {
            Ok(stories) => {
                info!(
                    count = stories.len(),
                    strategy = self.hot_stories.name(),
                    "Collected hot stories"
                );
                stories
            }
            Err(e) => {
                warn!(error = %e, "Could not parse homepage; continuing without hot stories");
                Vec::new()
            }
        }
    }
}

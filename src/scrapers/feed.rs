//! Editorial feed extraction.
//!
//! The feed is always retrieved by the shared [`Fetcher`](crate::fetcher::Fetcher)
//! and handed over as text; this module only turns that text into
//! [`ArticleRecord`]s. Format detection (RSS 0.9x/1.0/2.0, Atom, JSON Feed)
//! and namespaced extensions such as `media:` or `dc:` are left to `feed-rs`.
//!
//! Entries without a usable title or link are skipped. A document that cannot
//! be read at all is reported as a [`ParseError`]; the caller decides what to
//! do with it.

use crate::error::ParseError;
use crate::models::{ArticleRecord, EDITORS_PICK_SOURCE};
use feed_rs::model::Entry;
use tracing::{debug, instrument};

/// Turns raw feed content into article records.
pub trait FeedExtractor: Send + Sync {
    fn parse(&self, raw: &str) -> Result<Vec<ArticleRecord>, ParseError>;
}

/// Syndication feed extractor backed by `feed-rs`.
#[derive(Debug, Clone)]
pub struct SyndicationFeedExtractor {
    source_tag: String,
}

impl Default for SyndicationFeedExtractor {
    fn default() -> Self {
        Self::new(EDITORS_PICK_SOURCE)
    }
}

impl SyndicationFeedExtractor {
    /// Create an extractor that stamps `source_tag` on every record.
    pub fn new(source_tag: &str) -> Self {
        Self {
            source_tag: source_tag.to_string(),
        }
    }
}

impl FeedExtractor for SyndicationFeedExtractor {
    #[instrument(level = "info", skip_all, fields(bytes = raw.len()))]
    fn parse(&self, raw: &str) -> Result<Vec<ArticleRecord>, ParseError> {
        let raw = raw.trim_start_matches('\u{feff}').trim();
        if raw.is_empty() {
            return Err(ParseError::EmptyDocument);
        }

        let feed = feed_rs::parser::parse(raw.as_bytes())?;
        let total = feed.entries.len();
        let articles: Vec<ArticleRecord> = feed
            .entries
            .iter()
            .filter_map(|entry| record_from_entry(entry, &self.source_tag))
            .collect();
        debug!(
            total,
            kept = articles.len(),
            skipped = total - articles.len(),
            "Parsed feed entries"
        );
        Ok(articles)
    }
}

fn record_from_entry(entry: &Entry, source_tag: &str) -> Option<ArticleRecord> {
    let title = non_empty(entry.title.as_ref().map(|text| text.content.as_str()))?;
    // rel defaults to "alternate" in Atom; RSS links carry no rel
    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
        .or_else(|| entry.links.first())
        .and_then(|l| non_empty(Some(l.href.as_str())))?;

    Some(ArticleRecord {
        title,
        link,
        published: entry
            .published
            .or(entry.updated)
            .map(|timestamp| timestamp.to_rfc3339()),
        summary: non_empty(entry.summary.as_ref().map(|text| text.content.as_str())),
        tags: entry
            .categories
            .iter()
            .filter_map(|category| non_empty(Some(category.term.as_str())))
            .collect(),
        source: source_tag.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

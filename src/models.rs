//! Data models for extracted records and the dated snapshot.
//!
//! - [`ArticleRecord`]: one entry of the editors' pick feed
//! - [`HotStoryRecord`]: one highlighted story scraped from the homepage
//! - [`Snapshot`]: the combined, immutable result of a single run
//!
//! Field order is the serialized key order, so it must not be shuffled.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Source tag written on every feed article.
pub const EDITORS_PICK_SOURCE: &str = "editors_pick_rss";

/// An article taken from the editorial feed.
///
/// `title` and `link` are never empty; entries lacking either are dropped
/// during extraction instead of producing a partial record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    /// Publication timestamp exactly as the feed states it.
    pub published: Option<String>,
    pub summary: Option<String>,
    /// Category terms, in feed order.
    pub tags: Vec<String>,
    pub source: String,
}

/// A story highlighted on the homepage.
///
/// `link` is always absolute, and unique within one extraction pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HotStoryRecord {
    pub title: String,
    pub link: String,
    /// Which extraction strategy produced the record.
    pub source: String,
}

/// Record counts stored alongside the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnapshotMetadata {
    pub editors_pick_count: usize,
    pub hot_stories_count: usize,
}

/// One dated archive entry.
///
/// Built once per run and serialized exactly once to a file named after
/// `fetch_date`. A later run for the same date overwrites it entirely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Snapshot {
    /// `YYYY-MM-DD`
    pub fetch_date: String,
    /// Local wall-clock time the snapshot was assembled, ISO-8601.
    pub fetch_timestamp: String,
    pub editors_pick_articles: Vec<ArticleRecord>,
    pub hot_stories: Vec<HotStoryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SnapshotMetadata>,
}

impl Snapshot {
    /// Assemble a snapshot stamped with the current local time.
    pub fn new(
        fetch_date: &str,
        editors_pick_articles: Vec<ArticleRecord>,
        hot_stories: Vec<HotStoryRecord>,
    ) -> Self {
        let metadata = SnapshotMetadata {
            editors_pick_count: editors_pick_articles.len(),
            hot_stories_count: hot_stories.len(),
        };
        Self {
            fetch_date: fetch_date.to_string(),
            fetch_timestamp: Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            editors_pick_articles,
            hot_stories,
            metadata: Some(metadata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn article(title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            link: format!("https://example.com/{title}"),
            published: None,
            summary: None,
            tags: vec![],
            source: EDITORS_PICK_SOURCE.to_string(),
        }
    }

    #[test]
    fn test_snapshot_counts_records() {
        let snapshot = Snapshot::new(
            "2025-05-06",
            vec![article("a"), article("b")],
            vec![HotStoryRecord {
                title: "Hot".to_string(),
                link: "https://example.com/news/hot".to_string(),
                source: "hot_stories".to_string(),
            }],
        );

        let metadata = snapshot.metadata.unwrap();
        assert_eq!(metadata.editors_pick_count, 2);
        assert_eq!(metadata.hot_stories_count, 1);
        assert_eq!(snapshot.fetch_date, "2025-05-06");
    }

    #[test]
    fn test_snapshot_timestamp_is_iso() {
        let snapshot = Snapshot::new("2025-05-06", vec![], vec![]);
        assert!(
            NaiveDateTime::parse_from_str(&snapshot.fetch_timestamp, "%Y-%m-%dT%H:%M:%S%.f")
                .is_ok(),
            "unexpected timestamp {}",
            snapshot.fetch_timestamp
        );
    }

    #[test]
    fn test_snapshot_key_order() {
        let snapshot = Snapshot::new("2025-05-06", vec![], vec![]);
        let json = serde_json::to_string(&snapshot).unwrap();

        let date = json.find("\"fetch_date\"").unwrap();
        let ts = json.find("\"fetch_timestamp\"").unwrap();
        let picks = json.find("\"editors_pick_articles\"").unwrap();
        let hot = json.find("\"hot_stories\"").unwrap();
        let meta = json.find("\"metadata\"").unwrap();
        assert!(date < ts && ts < picks && picks < hot && hot < meta);
    }

    #[test]
    fn test_article_null_optionals() {
        let json = serde_json::to_value(article("a")).unwrap();
        assert!(json["published"].is_null());
        assert!(json["summary"].is_null());
        assert_eq!(json["tags"], serde_json::json!([]));
        assert_eq!(json["source"], "editors_pick_rss");
    }

    #[test]
    fn test_snapshot_without_metadata_deserializes() {
        let json = r#"{
            "fetch_date": "2025-05-06",
            "fetch_timestamp": "2025-05-06T08:00:00.000000",
            "editors_pick_articles": [],
            "hot_stories": []
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.metadata, None);
        assert!(snapshot.hot_stories.is_empty());
    }
}

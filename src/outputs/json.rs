//! JSON snapshot output.
//!
//! # Output Structure
//!
//! One file per date, rewritten in full on every run for that date:
//! ```text
//! output_dir/
//! ├── cointelegraph_combined_2025-05-05.json
//! └── cointelegraph_combined_2025-05-06.json
//! ```

use crate::error::WriteError;
use crate::models::{ArticleRecord, HotStoryRecord, Snapshot};
use crate::utils::ensure_writable_dir;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Persists snapshots under a fixed directory and filename prefix.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    output_dir: PathBuf,
    file_prefix: String,
}

impl SnapshotWriter {
    /// Create a writer for one output location.
    ///
    /// # Arguments
    ///
    /// * `output_dir` - Directory the snapshot files live in
    /// * `file_prefix` - Leading part of every snapshot filename
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_prefix: file_prefix.to_string(),
        }
    }

    /// # Returns
    ///
    /// The directory snapshots are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the snapshot file for a date.
    ///
    /// # Arguments
    ///
    /// * `fetch_date` - The `YYYY-MM-DD` date the snapshot is filed under
    ///
    /// # Returns
    ///
    /// `{output_dir}/{file_prefix}_{fetch_date}.json`
    pub fn path_for(&self, fetch_date: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.json", self.file_prefix, fetch_date))
    }

    /// Build the [`Snapshot`] for `fetch_date` and write it, replacing any
    /// earlier file for the same date.
    ///
    /// The JSON is pretty-printed with two-space indentation and keeps
    /// non-ASCII characters as literal UTF-8.
    ///
    /// # Arguments
    ///
    /// * `fetch_date` - The `YYYY-MM-DD` date the snapshot is filed under
    /// * `articles` - Records extracted from the editors' pick feed
    /// * `hot_stories` - Records scraped from the homepage
    ///
    /// # Returns
    ///
    /// The path of the written file.
    ///
    /// # Errors
    ///
    /// Any [`WriteError`]: the directory cannot be created or written to, or
    /// the file write fails.
    #[instrument(level = "info", skip_all, fields(%fetch_date))]
    pub async fn write(
        &self,
        fetch_date: &str,
        articles: Vec<ArticleRecord>,
        hot_stories: Vec<HotStoryRecord>,
    ) -> Result<PathBuf, WriteError> {
        ensure_writable_dir(&self.output_dir).await?;

        let snapshot = Snapshot::new(fetch_date, articles, hot_stories);
        let json = serde_json::to_string_pretty(&snapshot)?;

        let path = self.path_for(fetch_date);
        info!(path = %path.display(), "Writing snapshot JSON");
        if let Err(source) = fs::write(&path, json).await {
            error!(path = %path.display(), error = %source, "Failed to write snapshot");
            return Err(WriteError::Write { path, source });
        }
        info!(path = %path.display(), "Wrote snapshot JSON");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> ArticleRecord {
        ArticleRecord {
            title: "Ethereum’s Pectra upgrade — what changes".to_string(),
            link: "https://cointelegraph.com/news/pectra".to_string(),
            published: Some("Tue, 06 May 2025 14:30:00 +0100".to_string()),
            summary: None,
            tags: vec!["Ethereum".to_string()],
            source: "editors_pick_rss".to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_creates_dir_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(tmp.path().join("data"), "cointelegraph_combined");

        let path = writer.write("2025-05-06", vec![article()], vec![]).await.unwrap();

        assert_eq!(
            path,
            tmp.path().join("data").join("cointelegraph_combined_2025-05-06.json")
        );
        let raw = std::fs::read_to_string(&path).unwrap();
        let snapshot: Snapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(snapshot.fetch_date, "2025-05-06");
        assert_eq!(snapshot.editors_pick_articles, vec![article()]);
        assert_eq!(snapshot.metadata.unwrap().editors_pick_count, 1);
    }

    #[tokio::test]
    async fn test_write_keeps_non_ascii_and_indents() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(tmp.path(), "snap");

        let path = writer.write("2025-05-06", vec![article()], vec![]).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();

        assert!(raw.contains("Ethereum’s Pectra upgrade — what changes"));
        assert!(!raw.contains("\\u"));
        assert!(raw.starts_with("{\n  \"fetch_date\": \"2025-05-06\""));
    }

    #[tokio::test]
    async fn test_write_overwrites_same_date() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(tmp.path(), "snap");

        writer.write("2025-05-06", vec![article()], vec![]).await.unwrap();
        let path = writer.write("2025-05-06", vec![], vec![]).await.unwrap();

        let snapshot: Snapshot =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(snapshot.editors_pick_articles.is_empty());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_write_fails_when_dir_cannot_be_created() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let writer = SnapshotWriter::new(blocker.join("data"), "snap");

        let err = writer.write("2025-05-06", vec![], vec![]).await.unwrap_err();
        assert!(matches!(err, WriteError::CreateDir { .. }));
    }
}

//! Runtime configuration.
//!
//! Every field has a default that targets the Cointelegraph editors' pick
//! feed and homepage, so the tool runs without a config file. A YAML file
//! passed with `--config` may override any subset of fields.

use crate::error::ConfigError;
use crate::models::EDITORS_PICK_SOURCE;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Top-level configuration for one snapshot run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// RSS/Atom feed providing the editors' pick articles.
    pub feed_url: String,
    /// Page scraped for hot stories.
    pub homepage_url: String,
    /// Base that relative story links are resolved against.
    pub base_url: String,
    pub output_dir: PathBuf,
    /// Snapshot files are named `{file_prefix}_{YYYY-MM-DD}.json`.
    pub file_prefix: String,
    /// `source` stamped on every feed article.
    pub feed_source_tag: String,
    pub fetch: FetchConfig,
    pub hot_stories: HotStoriesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: "https://cointelegraph.com/editors_pick_rss".to_string(),
            homepage_url: "https://cointelegraph.com/".to_string(),
            base_url: "https://cointelegraph.com".to_string(),
            output_dir: PathBuf::from("data"),
            file_prefix: "cointelegraph_combined".to_string(),
            feed_source_tag: EDITORS_PICK_SOURCE.to_string(),
            fetch: FetchConfig::default(),
            hot_stories: HotStoriesConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a YAML config file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Settings shared by every HTTP request the [`Fetcher`](crate::fetcher::Fetcher) makes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let headers = BTreeMap::from([
            (
                "Accept".to_string(),
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            ),
            ("Accept-Language".to_string(), "en-US,en;q=0.9".to_string()),
        ]);
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            headers,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which hot-story extraction strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum HotStoryStrategy {
    /// Anchors inside the named hot-stories section only.
    Structural,
    /// Article-looking links anywhere in the page.
    Heuristic,
    /// Structural first, heuristic when the section yields nothing.
    #[default]
    StructuralWithFallback,
}

/// Selectors and limits for the hot-story extractors.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HotStoriesConfig {
    pub strategy: HotStoryStrategy,
    pub section_selector: String,
    pub link_selector: String,
    /// Regex the path of a resolved on-site link must match to count as an
    /// article link.
    pub link_pattern: String,
    /// Maximum number of matching anchors the heuristic scan looks at.
    pub heuristic_limit: usize,
}

impl Default for HotStoriesConfig {
    fn default() -> Self {
        Self {
            strategy: HotStoryStrategy::default(),
            section_selector: "section.hot-stories".to_string(),
            link_selector: "a.post-card-inline__title-link".to_string(),
            link_pattern: "/news/".to_string(),
            heuristic_limit: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_target_cointelegraph() {
        let config = AppConfig::default();
        assert_eq!(config.feed_url, "https://cointelegraph.com/editors_pick_rss");
        assert_eq!(config.output_dir, PathBuf::from("data"));
        assert_eq!(config.feed_source_tag, "editors_pick_rss");
        assert_eq!(config.fetch.timeout(), Duration::from_secs(10));
        assert!(config.fetch.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(
            config.hot_stories.strategy,
            HotStoryStrategy::StructuralWithFallback
        );
        assert_eq!(config.hot_stories.heuristic_limit, 10);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
file_prefix: decrypt_combined
feed_source_tag: decrypt_rss
fetch:
  timeout_secs: 3
hot_stories:
  strategy: heuristic
  link_pattern: "/articles/"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.file_prefix, "decrypt_combined");
        assert_eq!(config.feed_source_tag, "decrypt_rss");
        assert_eq!(config.fetch.timeout_secs, 3);
        assert!(config.fetch.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.hot_stories.strategy, HotStoryStrategy::Heuristic);
        assert_eq!(config.hot_stories.link_pattern, "/articles/");
        assert_eq!(config.hot_stories.section_selector, "section.hot-stories");
        assert_eq!(config.homepage_url, "https://cointelegraph.com/");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output_dir: /tmp/snapshots").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/snapshots"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hot_stories: [not, a, map]").unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}

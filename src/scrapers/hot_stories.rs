//! Homepage "hot stories" extraction.
//!
//! The homepage has no stable schema, so extraction is split into strategies
//! behind [`HotStoryExtractor`]:
//!
//! | Strategy | Source tag | Looks at |
//! |----------|------------|----------|
//! | [`StructuralExtractor`] | `hot_stories` | marked anchors inside the hot-stories section |
//! | [`HeuristicExtractor`] | `homepage_news_links` | the first N article-looking links anywhere |
//! | [`WithFallback`] | either | primary first, fallback when the primary finds nothing |
//!
//! Every strategy resolves links against the site's base URL and drops
//! duplicate links, keeping the first occurrence. A missing section or an
//! absence of matching links yields an empty list, never an error.

use crate::config::{HotStoriesConfig, HotStoryStrategy};
use crate::error::ParseError;
use crate::models::HotStoryRecord;
use crate::utils::resolve_link;
use itertools::Itertools;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

/// Source tag for records found inside the hot-stories section.
pub const STRUCTURAL_SOURCE: &str = "hot_stories";
/// Source tag for records found by scanning the whole page.
pub const HEURISTIC_SOURCE: &str = "homepage_news_links";

/// Turns a homepage into hot-story records.
pub trait HotStoryExtractor: Send + Sync {
    /// Short strategy name used in logs.
    fn name(&self) -> &'static str;

    /// Extract records from an already parsed document.
    fn extract(&self, document: &Html) -> Vec<HotStoryRecord>;

    /// Parse raw HTML and extract records from it.
    fn parse(&self, raw: &str) -> Result<Vec<HotStoryRecord>, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::EmptyDocument);
        }
        let document = Html::parse_document(raw);
        Ok(self.extract(&document))
    }
}

/// Build the extractor chosen in the configuration.
pub fn from_config(
    config: &HotStoriesConfig,
    base_url: &str,
) -> Result<Box<dyn HotStoryExtractor>, ParseError> {
    let base = parse_base(base_url)?;
    let extractor: Box<dyn HotStoryExtractor> = match config.strategy {
        HotStoryStrategy::Structural => Box::new(StructuralExtractor::new(
            &config.section_selector,
            &config.link_selector,
            base,
        )?),
        HotStoryStrategy::Heuristic => Box::new(HeuristicExtractor::new(
            &config.link_pattern,
            config.heuristic_limit,
            base,
        )?),
        HotStoryStrategy::StructuralWithFallback => Box::new(WithFallback::new(
            StructuralExtractor::new(&config.section_selector, &config.link_selector, base.clone())?,
            HeuristicExtractor::new(&config.link_pattern, config.heuristic_limit, base)?,
        )),
    };
    Ok(extractor)
}

fn parse_base(base_url: &str) -> Result<Url, ParseError> {
    Url::parse(base_url).map_err(|source| ParseError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })
}

fn parse_selector(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Anchor text with whitespace runs collapsed.
fn anchor_title(anchor: &ElementRef<'_>) -> String {
    anchor.text().collect::<String>().split_whitespace().join(" ")
}

fn anchor_record(anchor: &ElementRef<'_>, base: &Url, source: &str) -> Option<HotStoryRecord> {
    let title = anchor_title(anchor);
    if title.is_empty() {
        return None;
    }
    let link = resolve_link(base, anchor.value().attr("href")?)?;
    Some(HotStoryRecord {
        title,
        link,
        source: source.to_string(),
    })
}

/// Collects marked anchors inside the named hot-stories section.
#[derive(Debug)]
pub struct StructuralExtractor {
    section: Selector,
    link: Selector,
    base: Url,
}

impl StructuralExtractor {
    pub fn new(section_selector: &str, link_selector: &str, base: Url) -> Result<Self, ParseError> {
        Ok(Self {
            section: parse_selector(section_selector)?,
            link: parse_selector(link_selector)?,
            base,
        })
    }
}

impl HotStoryExtractor for StructuralExtractor {
    fn name(&self) -> &'static str {
        "structural"
    }

    #[instrument(level = "info", skip_all)]
    fn extract(&self, document: &Html) -> Vec<HotStoryRecord> {
        let Some(section) = document.select(&self.section).next() else {
            warn!("Could not find the hot stories section");
            return Vec::new();
        };

        let stories: Vec<HotStoryRecord> = section
            .select(&self.link)
            .filter_map(|anchor| anchor_record(&anchor, &self.base, STRUCTURAL_SOURCE))
            .unique_by(|story| story.link.clone())
            .collect();
        debug!(count = stories.len(), "Extracted hot stories from section");
        stories
    }
}

/// Scans the whole page for links that look like article pages.
///
/// A link qualifies when it stays on the base URL's host and its path matches
/// the pattern. Only the first `limit` matching anchors are considered, which
/// keeps navigation and footer links out of the result.
#[derive(Debug)]
pub struct HeuristicExtractor {
    anchors: Selector,
    pattern: Regex,
    limit: usize,
    base: Url,
}

impl HeuristicExtractor {
    pub fn new(link_pattern: &str, limit: usize, base: Url) -> Result<Self, ParseError> {
        let pattern = Regex::new(link_pattern).map_err(|source| ParseError::InvalidPattern {
            pattern: link_pattern.to_string(),
            source,
        })?;
        Ok(Self {
            anchors: parse_selector("a[href]")?,
            pattern,
            limit,
            base,
        })
    }

    fn is_article_link(&self, link: &str) -> bool {
        Url::parse(link).is_ok_and(|url| {
            url.host_str() == self.base.host_str() && self.pattern.is_match(url.path())
        })
    }
}

impl HotStoryExtractor for HeuristicExtractor {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    #[instrument(level = "info", skip_all, fields(limit = self.limit))]
    fn extract(&self, document: &Html) -> Vec<HotStoryRecord> {
        let stories: Vec<HotStoryRecord> = document
            .select(&self.anchors)
            .filter_map(|anchor| anchor_record(&anchor, &self.base, HEURISTIC_SOURCE))
            .filter(|story| self.is_article_link(&story.link))
            .take(self.limit)
            .unique_by(|story| story.link.clone())
            .collect();
        debug!(count = stories.len(), "Extracted article links from page");
        stories
    }
}

/// Runs `primary`, and `fallback` only when `primary` comes back empty.
#[derive(Debug)]
pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> WithFallback<P, F>
where
    P: HotStoryExtractor,
    F: HotStoryExtractor,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P, F> HotStoryExtractor for WithFallback<P, F>
where
    P: HotStoryExtractor,
    F: HotStoryExtractor,
{
    fn name(&self) -> &'static str {
        "with_fallback"
    }

    fn extract(&self, document: &Html) -> Vec<HotStoryRecord> {
        let stories = self.primary.extract(document);
        if !stories.is_empty() {
            return stories;
        }
        warn!(
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            "Primary hot story strategy found nothing; using fallback"
        );
        self.fallback.extract(document)
    }
}

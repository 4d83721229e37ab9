//! Extractors that turn fetched content into records.
//!
//! | Extractor | Module | Input | Output |
//! |-----------|--------|-------|--------|
//! | Editors' pick feed | [`feed`] | RSS 2.0 / Atom text | [`ArticleRecord`](crate::models::ArticleRecord) |
//! | Homepage hot stories | [`hot_stories`] | HTML text | [`HotStoryRecord`](crate::models::HotStoryRecord) |
//!
//! Extractors never touch the network; the
//! [`Pipeline`](crate::pipeline::Pipeline) fetches first and hands them text.
//! Failures come back as [`ParseError`](crate::error::ParseError) values.

pub mod feed;
pub mod hot_stories;

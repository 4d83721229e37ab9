//! Typed failures for every pipeline stage.
//!
//! Only [`WriteError`] is allowed to abort a run. Fetch and parse failures are
//! returned as values so the [`Pipeline`](crate::pipeline::Pipeline) can
//! degrade them to empty results and keep going.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Network or HTTP failure while retrieving a page or feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed from the configuration.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// A configured header name or value is not valid HTTP.
    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
    /// Connection, TLS, timeout or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Malformed or unusable feed/HTML content, or an unusable extractor setting.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document is empty")]
    EmptyDocument,
    /// Not a feed `feed-rs` can read (not XML, unknown root, broken JSON Feed).
    #[error("malformed feed: {0}")]
    MalformedFeed(#[from] feed_rs::parser::ParseFeedError),
    #[error("invalid CSS selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("invalid link pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// A date override that is not a real `YYYY-MM-DD` calendar date.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid date format: {0:?} (expected YYYY-MM-DD)")]
pub struct InvalidDateFormat(pub String);

/// Failure to persist the snapshot. The only error class that ends a run.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("output directory {path} is not writable: {source}")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A pipeline that cannot be assembled from its configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Fetcher(#[from] FetchError),
    #[error(transparent)]
    Extractor(#[from] ParseError),
}

/// Failure to load the optional YAML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

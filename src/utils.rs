//! Helpers for date resolution, link resolution, logging and the filesystem.
//!
//! - Date override validation with fallback to today's local date
//! - Resolving relative hrefs against the site's base URL
//! - String truncation for log previews
//! - Output directory validation

use crate::error::{InvalidDateFormat, WriteError};
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};
use url::Url;

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Validate a `YYYY-MM-DD` override.
///
/// The string must have the exact shape and name a real calendar day, so
/// `2024-13-40` and `2024-2-1` are both rejected.
///
/// # Arguments
///
/// * `raw` - The date string as given on the command line
///
/// # Returns
///
/// The parsed date, or [`InvalidDateFormat`] carrying the rejected input.
pub fn parse_date_override(raw: &str) -> Result<NaiveDate, InvalidDateFormat> {
    if !DATE_PATTERN.is_match(raw) {
        return Err(InvalidDateFormat(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| InvalidDateFormat(raw.to_string()))
}

/// Pick the date a snapshot is filed under.
///
/// An invalid override is logged and replaced by today's local date; it never
/// fails the run.
///
/// # Arguments
///
/// * `date_override` - Optional `YYYY-MM-DD` string from the command line
///
/// # Returns
///
/// The effective date formatted as `YYYY-MM-DD`.
#[instrument(level = "debug")]
pub fn resolve_fetch_date(date_override: Option<&str>) -> String {
    let today = || Local::now().date_naive().format("%Y-%m-%d").to_string();
    match date_override {
        None => today(),
        Some(raw) => match parse_date_override(raw) {
            Ok(date) => date.format("%Y-%m-%d").to_string(),
            Err(e) => {
                let fallback = today();
                warn!(error = %e, %fallback, "Invalid date override; using current date instead");
                fallback
            }
        },
    }
}

/// Resolve an anchor's href to an absolute URL.
///
/// # Arguments
///
/// * `base` - The site's base URL
/// * `href` - The raw `href` attribute, relative or absolute
///
/// # Returns
///
/// The absolute URL, or `None` for hrefs that cannot become an http(s) URL
/// (`javascript:`, `mailto:`, blank).
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let resolved = base.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes on a character boundary with
/// `"…(+N bytes)"` appended.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of bytes to keep
///
/// # Returns
///
/// The original string if it fits, otherwise the truncated preview.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a scratch file.
///
/// # Arguments
///
/// * `path` - The directory path to validate
///
/// # Returns
///
/// `Ok(())` if the directory exists and is writable.
///
/// # Errors
///
/// [`WriteError::CreateDir`] if the directory cannot be created and
/// [`WriteError::NotWritable`] if the scratch file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), WriteError> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| WriteError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
    let scratch = path.join(".__write_check__");
    match stdfs::File::create(&scratch) {
        Ok(_) => {
            let _ = stdfs::remove_file(&scratch);
            info!("Output directory is writable");
            Ok(())
        }
        Err(source) => Err(WriteError::NotWritable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

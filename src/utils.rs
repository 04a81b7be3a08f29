//! Utility functions for text cleanup, link resolution, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace normalization of scraped element text
//! - Abstract label stripping and truncation
//! - Resolution of listing links against the site origin
//! - Log-friendly string truncation
//! - File system validation for the output path

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Maximum number of characters kept from a structured abstract.
pub const ABSTRACT_MAX_CHARS: usize = 500;

/// Appended to abstracts cut at [`ABSTRACT_MAX_CHARS`].
pub const ELLIPSIS: &str = "...";

static ABSTRACT_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^abstract[:\s]*").expect("abstract label regex is valid")
});

/// Collect an element's text with runs of whitespace collapsed and trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a leading "Abstract" label, with any colon or whitespace after it.
pub fn strip_abstract_label(text: &str) -> String {
    ABSTRACT_LABEL.replace(text, "").into_owned()
}

/// Cut `text` to [`ABSTRACT_MAX_CHARS`] characters, appending [`ELLIPSIS`].
///
/// Text at or under the limit is returned unchanged. The limit counts
/// characters, not bytes.
pub fn truncate_abstract(text: &str) -> String {
    match text.char_indices().nth(ABSTRACT_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Turn a listing `href` into an absolute URL.
///
/// - Already absolute: kept as-is
/// - Root-relative (`/doi/...`): prefixed with the origin
/// - Empty: the origin itself
/// - Anything else: resolved against the origin
pub fn resolve_link(base: &Url, href: &str) -> String {
    let href = href.trim();
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    if href.starts_with('/') && !href.starts_with("//") {
        return format!("{}{}", base.as_str().trim_end_matches('/'), href);
    }
    if href.is_empty() {
        return base.as_str().trim_end_matches('/').to_string();
    }
    base.join(href)
        .map(|resolved| resolved.to_string())
        .unwrap_or_else(|_| format!("{}/{}", base.as_str().trim_end_matches('/'), href))
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
        None => s.to_string(),
    }
}

/// Ensure the directory that will hold `file_path` exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %file_path))]
pub async fn ensure_writable_parent(file_path: &str) -> Result<(), Box<dyn Error>> {
    let dir = match Path::new(file_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };

    fs::create_dir_all(&dir).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = dir.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}

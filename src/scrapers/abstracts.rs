//! Abstract enrichment from article detail pages.
//!
//! Sources are tried in order of reliability, first hit wins:
//!
//! | Attempt | Source | Post-processing |
//! |---------|--------|-----------------|
//! | 1 | `div.abstractSection` | label stripped, cut to 500 chars |
//! | 2 | `<meta name="description">` | none |
//! | 3 | [`NO_ABSTRACT`] placeholder | - |
//!
//! When the page itself cannot be fetched the result is [`ABSTRACT_UNAVAILABLE`]
//! instead, so readers can tell a network failure from a missing abstract.

use super::Selectors;
use crate::fetch::PageFetcher;
use crate::utils::{element_text, strip_abstract_label, truncate_abstract};
use scraper::Html;
use tracing::{debug, instrument, warn};

/// Returned when the detail page could not be retrieved.
pub const ABSTRACT_UNAVAILABLE: &str = "Abstract unavailable.";

/// Returned when the detail page has neither an abstract block nor a description.
pub const NO_ABSTRACT: &str = "No abstract available.";

/// Fetch `link` and extract its abstract. Never fails.
#[instrument(level = "info", skip_all, fields(%link))]
pub async fn fetch_abstract<F: PageFetcher>(
    fetcher: &F,
    link: &str,
    selectors: &Selectors,
) -> String {
    match fetcher.fetch(link).await {
        Ok(body) => extract_abstract(&Html::parse_document(&body), selectors),
        Err(e) => {
            warn!(error = %e, "Error fetching abstract");
            ABSTRACT_UNAVAILABLE.to_string()
        }
    }
}

/// Extract the abstract from a parsed detail page, falling back to placeholders.
pub fn extract_abstract(document: &Html, selectors: &Selectors) -> String {
    structured_abstract(document, selectors)
        .or_else(|| meta_description(document, selectors))
        .unwrap_or_else(|| {
            debug!("No abstract block or meta description");
            NO_ABSTRACT.to_string()
        })
}

fn structured_abstract(document: &Html, selectors: &Selectors) -> Option<String> {
    let block = document.select(&selectors.abstract_block).next()?;
    let text = strip_abstract_label(&element_text(block));
    if text.is_empty() {
        return None;
    }
    Some(truncate_abstract(&text))
}

fn meta_description(document: &Html, selectors: &Selectors) -> Option<String> {
    document
        .select(&selectors.meta_description)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .filter(|content| !content.trim().is_empty())
        .map(str::to_string)
}

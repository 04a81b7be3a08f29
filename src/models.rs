//! Data models for harvested journal articles.
//!
//! This module defines the records that flow through the pipeline:
//! - [`ArticleDraft`]: Fields pulled from one listing entry, before enrichment
//! - [`Article`]: A fully normalized article, ready for the feed
//!
//! Both are plain values. A draft is consumed to build exactly one article and
//! an article is never mutated after construction.

use chrono::{DateTime, Utc};
use itertools::Itertools;

/// Placeholder used when a listing entry names no authors.
pub const UNKNOWN_AUTHORS: &str = "Unknown";

/// The raw fields extracted from one listing entry.
///
/// Every field except `title` and `link` may be missing; the harvester
/// substitutes defaults when it turns the draft into an [`Article`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    /// The trimmed visible text of the entry's first hyperlink.
    pub title: String,
    /// The absolute URL of the article's detail page.
    pub link: String,
    /// Author display names in source order. Empty when none were found.
    pub authors: Vec<String>,
    /// The trimmed text of the entry's publication-date container, if any.
    pub raw_date: Option<String>,
}

/// A normalized article as it appears in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub link: String,
    /// Abstract text, or one of the enricher's placeholder strings.
    pub abstract_text: String,
    /// Comma-and-space joined author names, or [`UNKNOWN_AUTHORS`].
    pub authors: String,
    pub publication_date: DateTime<Utc>,
}

impl ArticleDraft {
    /// Finish the draft with its abstract and publication date.
    pub fn into_article(self, abstract_text: String, publication_date: DateTime<Utc>) -> Article {
        Article {
            title: self.title,
            link: self.link,
            abstract_text,
            authors: join_authors(&self.authors),
            publication_date,
        }
    }
}

/// Join author names with `", "`, falling back to [`UNKNOWN_AUTHORS`].
pub fn join_authors(authors: &[String]) -> String {
    if authors.is_empty() {
        UNKNOWN_AUTHORS.to_string()
    } else {
        authors.iter().join(", ")
    }
}

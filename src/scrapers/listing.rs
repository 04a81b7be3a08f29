//! Table-of-contents harvesting.
//!
//! [`Harvester::harvest`] fetches the listing page, walks at most
//! `max_items` entries in document order, and turns each into an [`Article`]:
//!
//! 1. Extract title, link, authors and raw date ([`extract_fields`])
//! 2. Fetch the abstract from the detail page ([`fetch_abstract`])
//! 3. Normalize the raw date ([`normalize_optional_date`])
//!
//! Entries are processed one at a time and keep their listing order. An entry
//! that cannot be extracted is logged and skipped; it never stops the batch.

use super::Selectors;
use super::abstracts::fetch_abstract;
use super::fields::{Skip, extract_fields};
use crate::config::FeedConfig;
use crate::dates::normalize_optional_date;
use crate::error::ConfigError;
use crate::fetch::PageFetcher;
use crate::models::{Article, ArticleDraft};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use scraper::Html;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Harvests articles from one listing page.
#[derive(Debug)]
pub struct Harvester<F> {
    fetcher: F,
    selectors: Selectors,
    base_url: Url,
    listing_url: String,
    max_items: usize,
    date_formats: Vec<String>,
}

impl<F: PageFetcher> Harvester<F> {
    /// Build a harvester from the configuration.
    ///
    /// Fails if a selector does not compile or the base URL does not parse.
    pub fn new(fetcher: F, config: &FeedConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.source.base_url).map_err(|source| ConfigError::Url {
            url: config.source.base_url.clone(),
            source,
        })?;
        Ok(Self {
            fetcher,
            selectors: Selectors::compile(&config.selectors)?,
            base_url,
            listing_url: config.source.listing_url.clone(),
            max_items: config.source.max_items,
            date_formats: config.date_formats.clone(),
        })
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Harvest the listing page. Returns an empty list if it cannot be fetched.
    ///
    /// `harvest_time` stands in for any publication date that is missing or
    /// unparseable.
    #[instrument(level = "info", skip_all, fields(listing_url = %self.listing_url))]
    pub async fn harvest(&self, harvest_time: DateTime<Utc>) -> Vec<Article> {
        let body = match self.fetcher.fetch(&self.listing_url).await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Error fetching articles");
                return Vec::new();
            }
        };

        let drafts = self.extract_drafts(&body);
        info!(count = drafts.len(), max = self.max_items, "Found listing entries");

        let articles: Vec<Article> = stream::iter(drafts.into_iter().enumerate())
            .then(|(index, draft)| async move {
                match draft {
                    Ok(draft) => Some(self.enrich(draft, harvest_time).await),
                    Err(skip) => {
                        warn!(index, reason = %skip, "Error processing article; skipping entry");
                        None
                    }
                }
            })
            .filter_map(std::future::ready)
            .collect()
            .await;

        info!(count = articles.len(), "Harvested articles");
        articles
    }

    /// Extract drafts for the first `max_items` entries of the listing page.
    fn extract_drafts(&self, body: &str) -> Vec<Result<ArticleDraft, Skip>> {
        let document = Html::parse_document(body);
        document
            .select(&self.selectors.entry)
            .take(self.max_items)
            .map(|entry| extract_fields(entry, &self.selectors, &self.base_url))
            .collect()
    }

    async fn enrich(&self, draft: ArticleDraft, harvest_time: DateTime<Utc>) -> Article {
        let abstract_text = fetch_abstract(&self.fetcher, &draft.link, &self.selectors).await;
        let publication_date =
            normalize_optional_date(draft.raw_date.as_deref(), &self.date_formats, harvest_time);
        debug!(title = %draft.title, link = %draft.link, %publication_date, "Built article");
        draft.into_article(abstract_text, publication_date)
    }
}

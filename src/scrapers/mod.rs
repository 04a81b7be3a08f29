//! Scrapers for the journal's listing and detail pages.
//!
//! The harvest runs in three steps, each in its own submodule:
//!
//! 1. **Listing**: [`listing`] fetches the table of contents and walks its entries
//! 2. **Fields**: [`fields`] pulls title, link, authors and raw date from one entry
//! 3. **Abstracts**: [`abstracts`] fetches each article page and extracts its abstract
//!
//! Every failure below the listing fetch degrades to a skipped entry or a
//! placeholder value. The harvest as a whole never fails.

pub mod abstracts;
pub mod fields;
pub mod listing;

use crate::config::SelectorConfig;
use crate::error::ConfigError;
use scraper::Selector;

/// CSS selectors compiled once per run from [`SelectorConfig`].
#[derive(Debug, Clone)]
pub struct Selectors {
    pub entry: Selector,
    pub authors: Selector,
    pub date: Selector,
    pub link: Selector,
    pub abstract_block: Selector,
    pub meta_description: Selector,
}

impl Selectors {
    /// Compile every selector, failing on the first invalid one.
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            entry: compile(&config.entry)?,
            authors: compile(&config.authors)?,
            date: compile(&config.date)?,
            link: compile("a")?,
            abstract_block: compile(&config.abstract_block)?,
            meta_description: compile(&config.meta_description)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::Selector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

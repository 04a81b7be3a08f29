//! Runtime configuration for the harvester and the feed channel.
//!
//! Every value has a built-in default matching the IJGIS table of contents on
//! Taylor & Francis Online, so the binary runs without any config file. An
//! optional YAML file can override any subset of fields, and CLI flags take
//! precedence over both.
//!
//! ```yaml
//! source:
//!   max_items: 10
//! date_formats:
//!   - "%d %b %Y"
//!   - "Published online: %d %b %Y"
//! channel:
//!   title: "My IJGIS feed"
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use tracing::{info, instrument};

/// Top-level configuration, as read from YAML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source: SourceConfig,
    pub selectors: SelectorConfig,
    /// `chrono` format strings, tried in order against each raw date.
    pub date_formats: Vec<String>,
    pub channel: ChannelConfig,
}

/// Where and how to fetch pages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// The table-of-contents page to harvest.
    pub listing_url: String,
    /// Origin prepended to root-relative article links.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Maximum number of listing entries processed per run.
    pub max_items: usize,
}

/// CSS selectors for the listing and detail pages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub entry: String,
    pub authors: String,
    pub date: String,
    pub abstract_block: String,
    pub meta_description: String,
}

/// Static channel-level metadata for the generated feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    /// Channel identifier. Derived from `link` when unset.
    pub id: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            selectors: SelectorConfig::default(),
            date_formats: default_date_formats(),
            channel: ChannelConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://www.tandfonline.com/toc/tgis20/current".to_string(),
            base_url: "https://www.tandfonline.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout_secs: 30,
            max_items: 20,
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            entry: "div.art_title".to_string(),
            authors: "div.art_authors".to_string(),
            date: "div.art-pub-date".to_string(),
            abstract_block: "div.abstractSection".to_string(),
            meta_description: r#"meta[name="description"]"#.to_string(),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            title: "International Journal of Geographical Information Science (IJGIS)".to_string(),
            link: "https://www.tandfonline.com/toc/tgis20/current".to_string(),
            description: "Latest articles from IJGIS with full abstracts".to_string(),
            language: "en".to_string(),
            id: None,
        }
    }
}

/// The date patterns tried when no config overrides them.
///
/// The first three are the formats the site has historically used. The last two
/// cover full month names, which appear on some issue pages.
pub fn default_date_formats() -> Vec<String> {
    [
        "%d %b %Y",
        "%B %d, %Y",
        "Published online: %d %b %Y",
        "Published online: %d %B %Y",
        "%d %B %Y",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl ChannelConfig {
    /// The channel identifier: `id` if set, else `link` without a trailing `/current`.
    pub fn identifier(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => {
                let link = self.link.trim_end_matches('/');
                link.strip_suffix("/current").unwrap_or(link).to_string()
            }
        }
    }
}

impl FeedConfig {
    /// Load the YAML file at `path`, or the defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })?;
        info!(%path, "Loaded config file");
        Ok(config)
    }

    /// Parse a YAML document. Missing fields keep their defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Apply CLI overrides on top of file/default values.
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(max_items) = cli.max_items {
            self.source.max_items = max_items;
        }
        if let Some(timeout_secs) = cli.timeout_secs {
            self.source.timeout_secs = timeout_secs;
        }
        if let Some(ref user_agent) = cli.user_agent {
            self.source.user_agent = user_agent.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_defaults_match_ijgis() {
        let config = FeedConfig::default();
        assert_eq!(config.source.max_items, 20);
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.selectors.entry, "div.art_title");
        assert_eq!(config.channel.language, "en");
        assert_eq!(config.date_formats[0], "%d %b %Y");
        assert_eq!(config.date_formats[1], "%B %d, %Y");
        assert_eq!(config.date_formats[2], "Published online: %d %b %Y");
    }

    #[test]
    fn test_identifier_strips_current() {
        let channel = ChannelConfig::default();
        assert_eq!(channel.identifier(), "https://www.tandfonline.com/toc/tgis20");
    }

    #[test]
    fn test_identifier_prefers_explicit_id() {
        let channel = ChannelConfig {
            id: Some("urn:ijgis".to_string()),
            ..ChannelConfig::default()
        };
        assert_eq!(channel.identifier(), "urn:ijgis");
    }

    #[test]
    fn test_identifier_without_current_suffix() {
        let channel = ChannelConfig {
            link: "https://example.org/toc/abc/".to_string(),
            ..ChannelConfig::default()
        };
        assert_eq!(channel.identifier(), "https://example.org/toc/abc");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
source:
  max_items: 5
channel:
  title: "Custom"
"#;
        let config = FeedConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.source.max_items, 5);
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.channel.title, "Custom");
        assert_eq!(config.channel.language, "en");
        assert_eq!(config.date_formats, default_date_formats());
    }

    #[test]
    fn test_yaml_replaces_date_formats() {
        let yaml = "date_formats:\n  - \"%Y-%m-%d\"\n";
        let config = FeedConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.date_formats, vec!["%Y-%m-%d".to_string()]);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(FeedConfig::from_yaml("  \n").unwrap(), FeedConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "source:\n  user_agent: test-agent").unwrap();

        let config = FeedConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.source.user_agent, "test-agent");
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = FeedConfig::load(Some("/nonexistent/ijgis.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["ijgis_feed", "--max-items", "3", "--timeout-secs", "5"]);
        let config = FeedConfig::default().with_cli_overrides(&cli);
        assert_eq!(config.source.max_items, 3);
        assert_eq!(config.source.timeout_secs, 5);
        assert_eq!(config.source.user_agent, SourceConfig::default().user_agent);
    }
}

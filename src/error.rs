//! Error types for retrieval, configuration and feed rendering.
//!
//! None of these escape the harvester during a run: fetch failures degrade to
//! placeholders or an empty article list. Only [`ConfigError`] can stop the
//! process, and only at startup.

use thiserror::Error;

/// A failed page retrieval.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure, timeout, or an unreadable body.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Invalid startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid CSS selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid base URL `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// A failure while serializing the RSS document.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error while writing feed: {0}")]
    Io(#[from] std::io::Error),

    #[error("feed is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

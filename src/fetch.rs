//! Page retrieval over HTTP.
//!
//! The pipeline never talks to `reqwest` directly. It goes through the
//! [`PageFetcher`] trait so that the harvester and the abstract enricher can
//! be driven by an in-memory page set in tests.
//!
//! # Policy
//!
//! - One request per call, no retries
//! - A per-request timeout (30 seconds by default)
//! - Any non-2xx status is a failure
//! - A browser-like `User-Agent` is sent with every request

use crate::error::{ConfigError, FetchError};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Retrieves the body of a page.
pub trait PageFetcher {
    /// Fetch `url` and return its body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher that sends `user_agent` and gives up after `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(ConfigError::Client)?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher(timeout: Duration) -> HttpFetcher {
        HttpFetcher::new("ijgis-test/0.1", timeout).expect("failed to build test fetcher")
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/toc/tgis20/current"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let url = format!("{}/toc/tgis20/current", server.uri());
        let body = test_fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "ijgis-test/0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("agent ok"))
            .expect(1)
            .mount(&server)
            .await;

        let body = test_fetcher(Duration::from_secs(5))
            .fetch(&server.uri())
            .await
            .unwrap();
        assert_eq!(body, "agent ok");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = test_fetcher(Duration::from_secs(5))
            .fetch(&server.uri())
            .await
            .unwrap_err();
        assert!(
            matches!(err, FetchError::Status { status: 503, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = test_fetcher(Duration::from_millis(200))
            .fetch(&server.uri())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "unexpected error: {err:?}");
    }
}

//! Page fetching
//!
//! [`PageFetcher`] is the seam between the harvest pipeline and the network.
//! [`HttpFetcher`] is the production implementation: plain GET requests with
//! a global in-flight limit, a politeness delay and bounded retries.

use crate::config::HarvestConfig;
use crate::error::{HarvestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

/// Fetches a document body by location
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// HTTP fetcher shared by every request of a run
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    permits: Arc<Semaphore>,
    delay: Duration,
    retries: u32,
}

impl HttpFetcher {
    pub fn new(config: &HarvestConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(config.concurrency)),
            delay: config.delay(),
            retries: config.retries,
        })
    }

    /// Single GET without retry
    async fn get(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.delay.max(Duration::from_millis(100)) * 2u32.saturating_pow(attempt.min(6))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| HarvestError::config("fetcher has been shut down"))?;

        let mut attempt = 0;
        loop {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            debug!(url = %url, attempt = attempt + 1, "Fetching");

            match self.get(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    let backoff = self.backoff(attempt);
                    warn!(
                        url = %url,
                        attempt,
                        retries = self.retries,
                        error = %e,
                        "Fetch failed, retrying in {:?}",
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                },
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer, retries: u32) -> HarvestConfig {
        HarvestConfig::default()
            .with_base_url(Url::parse(&server.uri()).unwrap())
            .with_delay_ms(0)
            .with_retries(retries)
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokedex/all"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>listing</html>"))
            .mount(&server)
            .await;

        let config = config(&server, 0);
        let fetcher = HttpFetcher::new(&config).unwrap();
        let body = fetcher.fetch(&config.listing_url().unwrap()).await.unwrap();
        assert_eq!(body, "<html>listing</html>");
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ability/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let config = config(&server, 3);
        let fetcher = HttpFetcher::new(&config).unwrap();
        let url = config.base_url.join("/ability/missing").unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, HarvestError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokedex/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pokedex/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let config = config(&server, 1);
        let fetcher = HttpFetcher::new(&config).unwrap();
        let url = config.base_url.join("/pokedex/flaky").unwrap();

        assert_eq!(fetcher.fetch(&url).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokedex/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let config = config(&server, 2);
        let fetcher = HttpFetcher::new(&config).unwrap();
        let url = config.base_url.join("/pokedex/down").unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, HarvestError::Status { status: 500, .. }));
    }
}

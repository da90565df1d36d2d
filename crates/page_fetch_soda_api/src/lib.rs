//! `soda_api`-backed implementation of the shared `page_fetch` contract.
//!
//! This adapter runs the async transport to completion for each request so a
//! paginated session can treat fetching as one blocking step.

use std::sync::Arc;
use std::time::Duration;

use page_fetch::{FetchError, PageFetcher};
use soda_api::{SodaApiClient, SodaApiConfig, SodaApiError};
use tracing::debug;

/// Stable fetcher identifier used by startup selection.
pub const SODA_API_FETCHER_ID: &str = "soda";

/// Runtime configuration for the resource fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SodaApiFetcherConfig {
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl SodaApiFetcherConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_soda_api_config(self) -> SodaApiConfig {
        let mut config = SodaApiConfig::default();

        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config
    }
}

trait BodyClient: Send + Sync {
    fn get(&self, url: &str) -> Result<String, SodaApiError>;
    fn resource_url(&self) -> String;
}

#[derive(Debug)]
struct DefaultBodyClient {
    client: SodaApiClient,
}

impl BodyClient for DefaultBodyClient {
    fn get(&self, url: &str) -> Result<String, SodaApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                SodaApiError::Runtime(format!("failed to initialize tokio runtime: {error}"))
            })?;

        runtime.block_on(self.client.get(url))
    }

    fn resource_url(&self) -> String {
        self.client.resource_url()
    }
}

/// `PageFetcher` adapter backed by `soda_api` transport primitives.
pub struct SodaApiFetcher {
    body_client: Arc<dyn BodyClient>,
}

impl SodaApiFetcher {
    /// Creates a fetcher using real HTTP transport.
    pub fn new(config: SodaApiFetcherConfig) -> Result<Self, FetchError> {
        let client = SodaApiClient::new(config.into_soda_api_config()).map_err(map_error)?;
        Ok(Self {
            body_client: Arc::new(DefaultBodyClient { client }),
        })
    }

    /// Normalized resource endpoint that sessions should page through.
    #[must_use]
    pub fn resource_url(&self) -> String {
        self.body_client.resource_url()
    }

    #[cfg(test)]
    fn with_body_client(body_client: Arc<dyn BodyClient>) -> Self {
        Self { body_client }
    }
}

impl PageFetcher for SodaApiFetcher {
    fn fetcher_id(&self) -> &str {
        SODA_API_FETCHER_ID
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "fetching resource page");
        self.body_client.get(url).map_err(map_error)
    }
}

fn map_error(error: SodaApiError) -> FetchError {
    match error {
        SodaApiError::Status(status, message) => FetchError::Status {
            status: status.as_u16(),
            message,
        },
        other => FetchError::transport(other.to_string()),
    }
}

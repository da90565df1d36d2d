use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use tracing::debug;

use crate::config::SodaApiConfig;
use crate::error::{parse_error_message, SodaApiError};
use crate::headers::build_headers;
use crate::url::{normalize_resource_url, with_query};

#[derive(Debug)]
pub struct SodaApiClient {
    http: Client,
    config: SodaApiConfig,
}

impl SodaApiClient {
    pub fn new(config: SodaApiConfig) -> Result<Self, SodaApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(SodaApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SodaApiConfig {
        &self.config
    }

    /// Normalized resource endpoint requests are issued against.
    pub fn resource_url(&self) -> String {
        normalize_resource_url(&self.config.base_url)
    }

    /// Full request URL for an already-serialized query string.
    pub fn request_url(&self, query: &str) -> String {
        with_query(&self.resource_url(), query)
    }

    pub fn build_headers(&self) -> Result<HeaderMap, SodaApiError> {
        let mut out = HeaderMap::new();
        for (key, value) in build_headers(&self.config) {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| SodaApiError::InvalidHeader(format!("invalid header key: {key}")))?,
                HeaderValue::from_str(&value).map_err(|_| {
                    SodaApiError::InvalidHeader(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_request(&self, url: &str) -> Result<RequestBuilder, SodaApiError> {
        let parsed = ::url::Url::parse(url)
            .map_err(|error| SodaApiError::InvalidUrl(format!("{url}: {error}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SodaApiError::InvalidUrl(format!(
                "{url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let headers = self.build_headers()?;
        Ok(self.http.get(parsed).headers(headers))
    }

    /// Issues one GET request and returns the response body.
    pub async fn get(&self, url: &str) -> Result<String, SodaApiError> {
        let response = self.build_request(url)?.send().await?;
        let status = response.status();
        debug!(%status, url, "resource response received");

        if status.is_success() {
            return response.text().await.map_err(SodaApiError::from);
        }

        let body = response.text().await.unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        Err(SodaApiError::Status(status, parse_error_message(status, &body)))
    }

    /// Issues one GET request for `query` against the configured resource.
    pub async fn query(&self, query: &str) -> Result<String, SodaApiError> {
        self.get(&self.request_url(query)).await
    }
}

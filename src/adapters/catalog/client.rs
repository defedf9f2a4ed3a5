//! HTTP catalog client
//!
//! Fetches pages from `<base_url>/poi`. Every attempt is bounded by the
//! configured timeout and wrapped in the configured [`RetryPolicy`].
//! Response bodies are never logged, and URLs are logged without their
//! query string.

use super::models::FetchPageParams;
use super::CatalogClient;
use crate::config::{CatalogConfig, SecretString};
use crate::core::retry::{RetryDecision, RetryEvent, RetryPolicy};
use crate::domain::errors::{CatalogError, SyncError};
use crate::domain::record::RawRecord;
use crate::domain::Result;
use crate::logging::events::{HttpGiveUp, HttpRetry};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Largest honored `Retry-After`, in seconds
pub const MAX_RETRY_AFTER_SECS: u64 = 3600;

const API_KEY_HEADER: &str = "X-API-Key";

/// reqwest-backed [`CatalogClient`]
///
/// # Example
///
/// ```no_run
/// use poi_sync::adapters::catalog::{CatalogClient, FetchPageParams, HttpCatalogClient};
/// use poi_sync::config::CatalogConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpCatalogClient::new(&CatalogConfig::default())?;
/// let page = client.fetch_page(&FetchPageParams::new(0, 100)).await?;
/// println!("fetched {} records", page.len());
/// # Ok(())
/// # }
/// ```
pub struct HttpCatalogClient {
    client: Client,
    endpoint: Url,
    api_key: SecretString,
    timeout: Duration,
    retry: RetryPolicy,
}

impl std::fmt::Debug for HttpCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl HttpCatalogClient {
    /// Creates a client from the catalog configuration
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] if the base URL is invalid or the
    /// HTTP client can't be built.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let endpoint = poi_endpoint(&config.base_url)?;

        let client = ClientBuilder::new()
            .connect_timeout(config.timeout())
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
            retry: config.retry.to_policy(),
        })
    }

    /// Replaces the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Endpoint requests are sent to, without query
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn page_url(&self, params: &FetchPageParams) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(params.query_pairs());
        url
    }

    async fn fetch_once(
        &self,
        url: Url,
        log_url: &str,
    ) -> std::result::Result<Vec<RawRecord>, CatalogError> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json");

        let api_key = self.api_key.expose_secret();
        if !api_key.is_empty() {
            request = request.header(API_KEY_HEADER, api_key.as_str());
        }

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| CatalogError::Connection(e.without_url().to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let retry_after = if status == StatusCode::TOO_MANY_REQUESTS {
                    response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(parse_retry_after)
                } else {
                    None
                };

                // Drain so the connection can be reused
                let _ = response.bytes().await;

                return Err(CatalogError::Http {
                    status: status.as_u16(),
                    retry_after,
                    url: log_url.to_string(),
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| CatalogError::Connection(e.without_url().to_string()))?;

            parse_page(&body)
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                url: log_url.to_string(),
            }),
        }
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_page(
        &self,
        params: &FetchPageParams,
    ) -> std::result::Result<Vec<RawRecord>, CatalogError> {
        let url = self.page_url(params);
        let log_url = sanitize_url(&url);

        tracing::debug!(
            url = %log_url,
            offset = params.offset,
            limit = params.limit,
            "Fetching catalog page"
        );

        self.retry
            .run_observed(
                || self.fetch_once(url.clone(), &log_url),
                catalog_retry_decision,
                |event| match event {
                    RetryEvent::Retry {
                        attempt,
                        max_attempts,
                        delay,
                        error,
                    } => HttpRetry {
                        event: HttpRetry::NAME,
                        status: error.status(),
                        url: log_url.clone(),
                        attempt,
                        max_attempts,
                        delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        reason: failure_reason(error),
                    }
                    .emit(),
                    RetryEvent::GiveUp {
                        attempt,
                        max_attempts,
                        error,
                    } => HttpGiveUp {
                        event: HttpGiveUp::NAME,
                        status: error.status(),
                        url: log_url.clone(),
                        attempt,
                        max_attempts,
                        reason: failure_reason(error),
                    }
                    .emit(),
                },
            )
            .await
    }
}

fn poi_endpoint(base_url: &str) -> Result<Url> {
    let endpoint = format!("{}/poi", base_url.trim_end_matches('/'));
    let url = Url::parse(&endpoint).map_err(|e| {
        SyncError::Configuration(format!("Invalid catalog base URL '{base_url}': {e}"))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(SyncError::Configuration(format!(
            "Catalog base URL must be http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(url)
}

fn parse_page(body: &[u8]) -> std::result::Result<Vec<RawRecord>, CatalogError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        CatalogError::InvalidResponse(format!("response body is not valid JSON: {e}"))
    })?;

    match value {
        Value::Array(records) => Ok(records),
        other => Err(CatalogError::InvalidResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses a `Retry-After` value given in whole seconds
///
/// Only plain digit strings up to one hour are honored; HTTP dates and
/// anything else yield `None`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    value
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs <= MAX_RETRY_AFTER_SECS)
        .map(Duration::from_secs)
}

/// Renders a URL for logging: no query, fragment or credentials
pub fn sanitize_url(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.set_fragment(None);
    let _ = clean.set_username("");
    let _ = clean.set_password(None);
    clean.to_string()
}

/// Retry decision for catalog failures
///
/// Timeouts, 429, 5xx and connection failures are retried. A 429 carrying
/// a valid `Retry-After` waits that long. Other statuses and malformed
/// payloads are final.
pub fn catalog_retry_decision(error: &CatalogError) -> RetryDecision {
    match error {
        CatalogError::Timeout { .. } | CatalogError::Connection(_) => RetryDecision::retry(),
        CatalogError::Http {
            status: 429,
            retry_after,
            ..
        } => match retry_after {
            Some(delay) => RetryDecision::retry_after(*delay),
            None => RetryDecision::retry(),
        },
        CatalogError::Http { status, .. } if *status >= 500 => RetryDecision::retry(),
        CatalogError::Http { .. } | CatalogError::InvalidResponse(_) => RetryDecision::stop(),
    }
}

fn failure_reason(error: &CatalogError) -> &'static str {
    match error {
        CatalogError::Timeout { .. } => "timeout",
        CatalogError::Connection(_) => "connection",
        CatalogError::Http { status: 429, .. } => "rate_limited",
        CatalogError::Http { status, .. } if *status >= 500 => "server_error",
        CatalogError::Http { .. } => "client_error",
        CatalogError::InvalidResponse(_) => "invalid_response",
    }
}

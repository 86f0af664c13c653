//! Shared HTTP Client - Bounded, Retrying GET-JSON Transport
//!
//! Wraps reqwest with a request timeout, a concurrency cap for the
//! per-symbol fan-out, and retries on transient errors. All provider
//! adapters issue their GETs through this client so the resolution
//! pipeline has one place where network calls are bounded.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::ports::quote_source::ProviderFailure;

/// Configuration for the shared quote HTTP client.
#[derive(Debug, Clone)]
pub struct QuoteHttpConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum concurrent in-flight requests.
    pub max_concurrent: usize,
    /// Maximum retries on transient errors (429, 5xx, transport).
    pub max_retries: u32,
    /// Base delay between retries (exponential backoff).
    pub retry_base_delay: Duration,
}

impl Default for QuoteHttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_concurrent: 8,
            max_retries: 2,
            retry_base_delay: Duration::from_millis(200),
        }
    }
}

/// Rate-bounded HTTP client shared by all quote sources.
pub struct QuoteHttpClient {
    /// Underlying HTTP client.
    http: Client,
    /// Client configuration.
    config: QuoteHttpConfig,
    /// Concurrency limiter for per-symbol fan-outs.
    semaphore: Arc<Semaphore>,
}

impl QuoteHttpClient {
    /// Create a new client.
    ///
    /// # Errors
    /// Fails if the underlying reqwest client cannot be built.
    pub fn new(config: QuoteHttpConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(5)
            .build()
            .context("Failed to build HTTP client")?;

        let semaphore = Arc::new(Semaphore::new(config.max_concurrent));

        Ok(Self {
            http,
            config,
            semaphore,
        })
    }

    /// Execute a GET request and deserialize the JSON body.
    ///
    /// Transient failures (429, 5xx, transport errors) are retried with
    /// exponential backoff up to `max_retries`; everything else maps
    /// straight onto a [`ProviderFailure`] for the cascade to absorb.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderFailure> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderFailure::Network("request limiter closed".to_string()))?;

        let mut last_failure = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.config.retry_base_delay * 2u32.pow(attempt - 1);
                debug!(attempt, delay_ms = delay.as_millis(), url, "Retrying request");
                sleep(delay).await;
            }

            let response = match self.http.get(url).query(query).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, attempt, url, "Request failed");
                    last_failure = Some(ProviderFailure::Network(e.to_string()));
                    continue;
                }
            };

            match response.status() {
                StatusCode::OK => {
                    return response
                        .json::<T>()
                        .await
                        .map_err(|e| ProviderFailure::Malformed(e.to_string()));
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    warn!(url, "Rate limited by provider, backing off");
                    last_failure = Some(ProviderFailure::Status(429));
                    continue;
                }
                status if status.is_server_error() => {
                    warn!(status = %status, url, "Server error, retrying");
                    last_failure = Some(ProviderFailure::Status(status.as_u16()));
                    continue;
                }
                status => {
                    return Err(ProviderFailure::Status(status.as_u16()));
                }
            }
        }

        Err(last_failure
            .unwrap_or_else(|| ProviderFailure::Network("max retries exceeded".to_string())))
    }
}

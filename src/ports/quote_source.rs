//! Quote Source Port - Provider Adapter Interface
//!
//! Defines the uniform contract every external quote provider adapter
//! implements, plus the failure signal the cascade controller absorbs.
//! The hexagonal architecture ensures the resolver never depends on
//! transport details.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::quote::{ProviderName, Quote, Symbol};

/// Internal failure signal raised by a quote source.
///
/// Carries no meaning to the cascade controller beyond "try the next
/// source". It is never surfaced to the result consumer and never enters
/// a result's quote list.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// The source requires an API credential and none was supplied.
    #[error("missing API credential")]
    MissingCredential,
    /// Transport-level failure: DNS, connect, TLS, or timeout.
    #[error("network error: {0}")]
    Network(String),
    /// The provider answered with a non-success HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    /// The payload could not be mapped onto the requested symbols:
    /// missing required field, non-numeric price, or symbol mismatch.
    #[error("malformed payload: {0}")]
    Malformed(String),
    /// The provider answered successfully but returned no quotes.
    #[error("provider returned no quotes")]
    Empty,
}

/// One successful fetch from a quote source.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    /// One quote per requested symbol, in request order.
    pub quotes: Vec<Quote>,
    /// Set by a source that degraded gracefully (e.g. substituted
    /// sample prices for individual symbols); forwarded verbatim to
    /// the result consumer.
    pub advisory: Option<String>,
}

impl SourceBatch {
    /// A batch with no degradation to report.
    pub fn clean(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            advisory: None,
        }
    }
}

/// Trait for external quote providers.
///
/// Implementors fetch raw data for the requested symbols over HTTP and
/// normalize it into [`Quote`] records. `fetch` fails with
/// [`ProviderFailure`] on a missing credential, network error,
/// non-success status, malformed payload, or empty result set; failure
/// granularity (whole-call vs per-symbol) is each adapter's documented
/// policy.
#[async_trait]
pub trait QuoteSource: Send + Sync + 'static {
    /// Provenance tag recorded on results this source produces.
    fn name(&self) -> ProviderName;

    /// Fetch one quote per symbol, preserving request order.
    async fn fetch(&self, symbols: &[Symbol]) -> Result<SourceBatch, ProviderFailure>;
}

//! Finnhub Source - Primary Credentialed Quote Provider
//!
//! Fetches real-time quotes from Finnhub's `/quote` endpoint, one
//! request per symbol, fanned out concurrently. The percent change is
//! derived from current and previous-close prices. This source fails
//! atomically: a partial batch is indistinguishable from corrupted data,
//! so any per-symbol failure aborts the whole call and advances the
//! cascade.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::adapters::http::QuoteHttpClient;
use crate::domain::change::percent_change;
use crate::domain::quote::{ProviderName, Quote, Symbol};
use crate::ports::quote_source::{ProviderFailure, QuoteSource, SourceBatch};

/// Finnhub `/quote` response. Extra fields (`h`, `l`, `o`, `d`, `dp`,
/// `t`) are ignored.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price.
    c: Option<f64>,
    /// Previous close price.
    pc: Option<f64>,
}

/// Credentialed Finnhub quote source.
pub struct FinnhubSource {
    /// Shared bounded HTTP client.
    client: Arc<QuoteHttpClient>,
    /// API base URL (e.g. `https://finnhub.io/api/v1`).
    base_url: String,
    /// API token; absence short-circuits to failure without a network
    /// call.
    token: Option<String>,
}

impl FinnhubSource {
    /// Create a new Finnhub source.
    pub fn new(client: Arc<QuoteHttpClient>, base_url: String, token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            token,
        }
    }

    /// Fetch and normalize one symbol's quote.
    async fn fetch_one(&self, symbol: &str, token: &str) -> Result<Quote, ProviderFailure> {
        let url = format!("{}/quote", self.base_url);
        let response: QuoteResponse = self
            .client
            .get_json(&url, &[("symbol", symbol), ("token", token)])
            .await?;

        debug!(symbol, current = ?response.c, previous_close = ?response.pc, "Finnhub quote received");
        quote_from_response(symbol, &response)
    }
}

/// Map a raw Finnhub quote onto the normalized shape.
///
/// A missing current price is malformed. A missing previous close only
/// drops the change column: the quote survives with `change_percent`
/// absent.
fn quote_from_response(symbol: &str, response: &QuoteResponse) -> Result<Quote, ProviderFailure> {
    let current = response.c.ok_or_else(|| {
        ProviderFailure::Malformed(format!("quote for {symbol} is missing the current price"))
    })?;

    let change_percent = response.pc.map(|pc| percent_change(current, pc));

    Ok(Quote {
        symbol: symbol.to_string(),
        price: Some(current),
        change_percent,
    })
}

#[async_trait]
impl QuoteSource for FinnhubSource {
    fn name(&self) -> ProviderName {
        ProviderName::Finnhub
    }

    #[instrument(skip(self, symbols), fields(symbols = symbols.len()))]
    async fn fetch(&self, symbols: &[Symbol]) -> Result<SourceBatch, ProviderFailure> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ProviderFailure::MissingCredential)?;

        if symbols.is_empty() {
            return Err(ProviderFailure::Empty);
        }

        // Indexed slots keep output in request order no matter which
        // request completes first.
        let mut slots: Vec<Option<Quote>> = vec![None; symbols.len()];
        let mut inflight: FuturesUnordered<_> = symbols
            .iter()
            .enumerate()
            .map(|(slot, symbol)| async move { (slot, self.fetch_one(symbol, token).await) })
            .collect();

        while let Some((slot, fetched)) = inflight.next().await {
            // First per-symbol failure fails the whole call; dropping
            // `inflight` abandons the remaining requests.
            slots[slot] = Some(fetched?);
        }
        drop(inflight);

        let quotes: Vec<Quote> = slots.into_iter().collect::<Option<_>>().ok_or_else(|| {
            ProviderFailure::Malformed("fan-out left an unfilled symbol slot".to_string())
        })?;

        Ok(SourceBatch::clean(quotes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::QuoteHttpConfig;

    fn source_without_token() -> FinnhubSource {
        let client = Arc::new(
            QuoteHttpClient::new(QuoteHttpConfig::default()).expect("client builds"),
        );
        FinnhubSource::new(client, "https://finnhub.example".to_string(), None)
    }

    #[test]
    fn missing_token_fails_without_network_call() {
        let source = source_without_token();
        let result = tokio_test::block_on(source.fetch(&["AAPL".to_string()]));

        assert!(matches!(result, Err(ProviderFailure::MissingCredential)));
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let client = Arc::new(
            QuoteHttpClient::new(QuoteHttpConfig::default()).expect("client builds"),
        );
        let source = FinnhubSource::new(
            client,
            "https://finnhub.example".to_string(),
            Some(String::new()),
        );

        let result = tokio_test::block_on(source.fetch(&["AAPL".to_string()]));
        assert!(matches!(result, Err(ProviderFailure::MissingCredential)));
    }

    #[test]
    fn derives_change_from_previous_close() {
        let response = QuoteResponse {
            c: Some(110.0),
            pc: Some(100.0),
        };

        let quote = quote_from_response("AAPL", &response).expect("well-formed");
        assert_eq!(quote.price, Some(110.0));
        assert_eq!(quote.change_percent, Some(10.0));
    }

    #[test]
    fn zero_previous_close_reports_zero_change() {
        let response = QuoteResponse {
            c: Some(110.0),
            pc: Some(0.0),
        };

        let quote = quote_from_response("IPO", &response).expect("well-formed");
        assert_eq!(quote.change_percent, Some(0.0));
    }

    #[test]
    fn missing_previous_close_leaves_change_absent() {
        let response = QuoteResponse {
            c: Some(227.52),
            pc: None,
        };

        let quote = quote_from_response("AAPL", &response).expect("price-only is valid");
        assert_eq!(quote.price, Some(227.52));
        assert_eq!(quote.change_percent, None);
    }

    #[test]
    fn missing_current_price_is_malformed() {
        let response = QuoteResponse { c: None, pc: Some(100.0) };

        let result = quote_from_response("AAPL", &response);
        assert!(matches!(result, Err(ProviderFailure::Malformed(_))));
    }

    #[test]
    fn wire_payload_parses_with_extra_fields() {
        let raw = r#"{"c":227.52,"d":1.9,"dp":0.84,"h":229.0,"l":225.1,"o":226.0,"pc":225.62,"t":1722860400}"#;
        let response: QuoteResponse = serde_json::from_str(raw).expect("parses");

        assert_eq!(response.c, Some(227.52));
        assert_eq!(response.pc, Some(225.62));
    }

    #[test]
    fn non_numeric_price_fails_to_parse() {
        let raw = r#"{"c":"not-a-number","pc":225.62}"#;
        assert!(serde_json::from_str::<QuoteResponse>(raw).is_err());
    }
}

//! Twelve Data Source - Tertiary Price-Only Quote Provider
//!
//! Fetches prices one symbol at a time from Twelve Data's `/price`
//! endpoint. The source carries no change information, so
//! `change_percent` is always zero, never absent. Unlike the other
//! sources this one degrades at symbol granularity: a failed symbol is
//! substituted from the static sample dataset and the batch advisory
//! flags the substitution, while the call as a whole still succeeds.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::adapters::http::QuoteHttpClient;
use crate::domain::quote::{ProviderName, Quote, Symbol};
use crate::domain::sample::sample_quote;
use crate::ports::quote_source::{ProviderFailure, QuoteSource, SourceBatch};

/// Twelve Data `/price` response. The price arrives as a decimal
/// string; error bodies lack the field entirely and fail to parse.
#[derive(Debug, Deserialize)]
struct PriceResponse {
    /// Price as string.
    price: String,
}

/// Price-only Twelve Data quote source.
pub struct TwelveDataSource {
    /// Shared bounded HTTP client.
    client: Arc<QuoteHttpClient>,
    /// API base URL (e.g. `https://api.twelvedata.com`).
    base_url: String,
    /// API key query parameter, `demo` unless configured otherwise.
    api_key: String,
}

impl TwelveDataSource {
    /// Create a new Twelve Data source.
    pub fn new(client: Arc<QuoteHttpClient>, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Fetch one symbol's price.
    async fn fetch_price(&self, symbol: &str) -> Result<f64, ProviderFailure> {
        let url = format!("{}/price", self.base_url);
        let response: PriceResponse = self
            .client
            .get_json(&url, &[("symbol", symbol), ("apikey", self.api_key.as_str())])
            .await?;

        response.price.parse::<f64>().map_err(|_| {
            ProviderFailure::Malformed(format!(
                "price for {symbol} is not numeric: {:?}",
                response.price
            ))
        })
    }
}

/// Assemble the final batch from per-symbol outcomes.
///
/// Failed symbols take the sample dataset price with a zero change;
/// any substitution sets the batch advisory. A symbol without a sample
/// row cannot be substituted and fails the call (startup validation
/// makes that unreachable in practice).
fn assemble(
    symbols: &[Symbol],
    outcomes: Vec<Result<f64, ProviderFailure>>,
) -> Result<SourceBatch, ProviderFailure> {
    let mut quotes = Vec::with_capacity(symbols.len());
    let mut substituted = 0usize;

    for (symbol, outcome) in symbols.iter().zip(outcomes) {
        match outcome {
            Ok(price) => quotes.push(Quote {
                symbol: symbol.clone(),
                price: Some(price),
                change_percent: Some(0.0),
            }),
            Err(failure) => {
                warn!(symbol = %symbol, error = %failure, "Per-symbol fetch failed, substituting sample price");

                let sample = sample_quote(symbol).ok_or_else(|| {
                    ProviderFailure::Malformed(format!("no sample fallback for {symbol}"))
                })?;
                quotes.push(Quote {
                    symbol: symbol.clone(),
                    price: sample.price,
                    change_percent: Some(0.0),
                });
                substituted += 1;
            }
        }
    }

    let advisory = (substituted > 0)
        .then(|| format!("Some prices are sample data ({substituted} symbols unavailable)."));

    Ok(SourceBatch { quotes, advisory })
}

#[async_trait]
impl QuoteSource for TwelveDataSource {
    fn name(&self) -> ProviderName {
        ProviderName::TwelveData
    }

    #[instrument(skip(self, symbols), fields(symbols = symbols.len()))]
    async fn fetch(&self, symbols: &[Symbol]) -> Result<SourceBatch, ProviderFailure> {
        if symbols.is_empty() {
            return Err(ProviderFailure::Empty);
        }

        // Same indexed-slot fan-out as the Finnhub source, except each
        // slot records the outcome instead of aborting on failure.
        let mut slots: Vec<Option<Result<f64, ProviderFailure>>> = Vec::new();
        slots.resize_with(symbols.len(), || None);

        let mut inflight: FuturesUnordered<_> = symbols
            .iter()
            .enumerate()
            .map(|(slot, symbol)| async move { (slot, self.fetch_price(symbol).await) })
            .collect();

        while let Some((slot, outcome)) = inflight.next().await {
            slots[slot] = Some(outcome);
        }
        drop(inflight);

        let outcomes: Vec<Result<f64, ProviderFailure>> = slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(ProviderFailure::Network("request never completed".to_string()))
                })
            })
            .collect();

        debug!(
            requested = symbols.len(),
            failed = outcomes.iter().filter(|o| o.is_err()).count(),
            "Twelve Data fan-out complete"
        );
        assemble(symbols, outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetched_prices_carry_zero_change() {
        let symbols = vec!["AAPL".to_string()];
        let batch = assemble(&symbols, vec![Ok(229.10)]).expect("no substitution needed");

        assert_eq!(batch.quotes[0].price, Some(229.10));
        assert_eq!(batch.quotes[0].change_percent, Some(0.0));
        assert!(batch.advisory.is_none());
    }

    #[test]
    fn failed_symbol_takes_sample_price_without_failing_the_call() {
        let symbols = vec!["AAPL".to_string(), "TSLA".to_string()];
        let outcomes = vec![
            Ok(229.10),
            Err(ProviderFailure::Status(500)),
        ];

        let batch = assemble(&symbols, outcomes).expect("call still succeeds");

        // TSLA substituted from the sample dataset, AAPL untouched.
        assert_eq!(batch.quotes[0].price, Some(229.10));
        assert_eq!(batch.quotes[1].price, Some(318.12));
        assert_eq!(batch.quotes[1].change_percent, Some(0.0));
        assert!(batch.advisory.is_some());
    }

    #[test]
    fn clean_batch_has_no_advisory() {
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let batch = assemble(&symbols, vec![Ok(229.10), Ok(416.0)]).expect("clean");

        assert!(batch.advisory.is_none());
    }

    #[test]
    fn unsubstitutable_symbol_fails_the_call() {
        let symbols = vec!["ZZZZ".to_string()];
        let outcomes = vec![Err(ProviderFailure::Status(500))];

        let result = assemble(&symbols, outcomes);
        assert!(matches!(result, Err(ProviderFailure::Malformed(_))));
    }

    #[test]
    fn wire_payload_price_is_a_decimal_string() {
        let raw = r#"{"price":"227.52000"}"#;
        let response: PriceResponse = serde_json::from_str(raw).expect("parses");

        assert_eq!(response.price.parse::<f64>().expect("numeric"), 227.52);
    }

    #[test]
    fn error_payload_fails_to_parse() {
        // Twelve Data reports errors in-band with HTTP 200.
        let raw = r#"{"code":404,"message":"symbol not found","status":"error"}"#;
        assert!(serde_json::from_str::<PriceResponse>(raw).is_err());
    }
}

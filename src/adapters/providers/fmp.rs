//! FMP Source - Secondary Batched Quote Provider
//!
//! Fetches all symbols in one request from Financial Modeling Prep's
//! batched quote endpoint. The response already carries a pre-computed
//! percent change, so no derivation happens here. The returned array
//! must map one-to-one onto the requested symbols; anything less is a
//! whole-call failure.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::adapters::http::QuoteHttpClient;
use crate::domain::quote::{ProviderName, Quote, Symbol};
use crate::ports::quote_source::{ProviderFailure, QuoteSource, SourceBatch};

/// One element of the FMP batched quote response. Extra fields
/// (`name`, `dayHigh`, `marketCap`, ...) are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchQuoteItem {
    /// Ticker symbol echoed by the provider.
    symbol: String,
    /// Last traded price.
    price: f64,
    /// Pre-computed percent change versus previous close.
    changes_percentage: f64,
}

/// Keyless FMP quote source (demo API key by default).
pub struct FmpSource {
    /// Shared bounded HTTP client.
    client: Arc<QuoteHttpClient>,
    /// API base URL (e.g. `https://financialmodelingprep.com/api/v3`).
    base_url: String,
    /// API key query parameter, `demo` unless configured otherwise.
    api_key: String,
}

impl FmpSource {
    /// Create a new FMP source.
    pub fn new(client: Arc<QuoteHttpClient>, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

/// Re-order the provider's batch onto the requested symbols.
///
/// Fails if the response is empty or any requested symbol has no entry.
/// Extra entries are ignored.
fn map_batch(symbols: &[Symbol], items: Vec<BatchQuoteItem>) -> Result<Vec<Quote>, ProviderFailure> {
    if items.is_empty() {
        return Err(ProviderFailure::Empty);
    }

    let mut by_symbol: HashMap<String, BatchQuoteItem> = HashMap::with_capacity(items.len());
    for item in items {
        by_symbol.insert(item.symbol.clone(), item);
    }

    symbols
        .iter()
        .map(|symbol| {
            let item = by_symbol.get(symbol).ok_or_else(|| {
                ProviderFailure::Malformed(format!("batch response has no entry for {symbol}"))
            })?;

            Ok(Quote::new(symbol.clone(), item.price, item.changes_percentage))
        })
        .collect()
}

#[async_trait]
impl QuoteSource for FmpSource {
    fn name(&self) -> ProviderName {
        ProviderName::Fmp
    }

    #[instrument(skip(self, symbols), fields(symbols = symbols.len()))]
    async fn fetch(&self, symbols: &[Symbol]) -> Result<SourceBatch, ProviderFailure> {
        if symbols.is_empty() {
            return Err(ProviderFailure::Empty);
        }

        let url = format!("{}/quote/{}", self.base_url, symbols.join(","));
        let items: Vec<BatchQuoteItem> = self
            .client
            .get_json(&url, &[("apikey", self.api_key.as_str())])
            .await?;

        debug!(requested = symbols.len(), received = items.len(), "FMP batch received");
        map_batch(symbols, items).map(SourceBatch::clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(symbol: &str, price: f64, change: f64) -> BatchQuoteItem {
        BatchQuoteItem {
            symbol: symbol.to_string(),
            price,
            changes_percentage: change,
        }
    }

    #[test]
    fn batch_is_reordered_to_request_order() {
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let items = vec![item("MSFT", 415.30, -0.35), item("AAPL", 227.52, 0.84)];

        let quotes = map_batch(&symbols, items).expect("one-to-one");
        assert_eq!(quotes[0].symbol, "AAPL");
        assert_eq!(quotes[0].price, Some(227.52));
        assert_eq!(quotes[1].symbol, "MSFT");
        assert_eq!(quotes[1].change_percent, Some(-0.35));
    }

    #[test]
    fn missing_symbol_fails_the_whole_batch() {
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let items = vec![item("AAPL", 227.52, 0.84)];

        let result = map_batch(&symbols, items);
        assert!(matches!(result, Err(ProviderFailure::Malformed(_))));
    }

    #[test]
    fn empty_response_is_a_failure() {
        let symbols = vec!["AAPL".to_string()];
        let result = map_batch(&symbols, Vec::new());

        assert!(matches!(result, Err(ProviderFailure::Empty)));
    }

    #[test]
    fn extra_entries_are_ignored() {
        let symbols = vec!["AAPL".to_string()];
        let items = vec![item("AAPL", 227.52, 0.84), item("GME", 24.10, 3.50)];

        let quotes = map_batch(&symbols, items).expect("requested symbol covered");
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "AAPL");
    }

    #[test]
    fn wire_payload_parses_camel_case_fields() {
        let raw = r#"[{"symbol":"AAPL","name":"Apple Inc.","price":227.52,"changesPercentage":0.84,"dayHigh":229.0}]"#;
        let items: Vec<BatchQuoteItem> = serde_json::from_str(raw).expect("parses");

        assert_eq!(items[0].symbol, "AAPL");
        assert_eq!(items[0].changes_percentage, 0.84);
    }

    #[test]
    fn non_numeric_price_fails_to_parse() {
        let raw = r#"[{"symbol":"AAPL","price":"n/a","changesPercentage":0.84}]"#;
        assert!(serde_json::from_str::<Vec<BatchQuoteItem>>(raw).is_err());
    }
}

//! Fallback Cascade Resolver - First Success Wins, Exhaustion Is Not An Error
//!
//! Orchestrates the configured quote sources in priority order and
//! produces the final `ResolutionResult`. Sources are attempted
//! sequentially so no traffic reaches a lower-priority provider once a
//! higher-priority one has answered. Every failure is absorbed here:
//! callers never see an error, only a degraded result backed by the
//! sample dataset.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::quote::{ProviderName, Quote, ResolutionResult, Symbol};
use crate::domain::sample::{MissingSampleData, demo_quotes};
use crate::ports::quote_source::{QuoteSource, SourceBatch};

/// Advisory attached when every source failed and the sample dataset is
/// served instead.
pub const DEMO_ADVISORY: &str = "Using local demo data (APIs unavailable).";

/// Cascading quote resolver.
///
/// Holds the ordered source chain, the symbol watchlist, and the demo
/// batch materialized at construction. Resolution is stateless beyond
/// that: each call builds a fresh result and nothing is cached between
/// calls.
pub struct QuoteResolver {
    /// Sources in priority order; the first success wins.
    sources: Vec<Arc<dyn QuoteSource>>,
    /// Ordered symbol watchlist.
    symbols: Vec<Symbol>,
    /// Pre-validated demo batch, the cascade terminus.
    demo: Vec<Quote>,
}

impl QuoteResolver {
    /// Create a resolver over `sources` for `symbols`.
    ///
    /// # Errors
    /// Returns [`MissingSampleData`] if any symbol lacks a sample row:
    /// without full sample coverage the exhaustion guarantee cannot
    /// hold, so this is fatal at startup rather than recoverable later.
    pub fn new(
        sources: Vec<Arc<dyn QuoteSource>>,
        symbols: Vec<Symbol>,
    ) -> Result<Self, MissingSampleData> {
        let demo = demo_quotes(&symbols)?;

        Ok(Self {
            sources,
            symbols,
            demo,
        })
    }

    /// The symbols this resolver serves, in output order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Resolve current quotes through the cascade.
    ///
    /// Infallible: exhaustion of all sources returns the demo batch
    /// with an advisory instead of an error.
    #[instrument(skip(self), fields(request_id = %Uuid::new_v4(), symbols = self.symbols.len()))]
    pub async fn resolve(&self) -> ResolutionResult {
        for source in &self.sources {
            let name = source.name();
            debug!(provider = %name, "Attempting quote source");

            match source.fetch(&self.symbols).await {
                Ok(batch) if self.covers_watchlist(&batch) => {
                    info!(provider = %name, quotes = batch.quotes.len(), "Quotes resolved");

                    return ResolutionResult {
                        quotes: batch.quotes,
                        source: name,
                        advisory: batch.advisory,
                        fetched_at: Utc::now(),
                    };
                }
                Ok(batch) => {
                    warn!(
                        provider = %name,
                        expected = self.symbols.len(),
                        received = batch.quotes.len(),
                        "Source batch does not cover the watchlist, advancing cascade"
                    );
                }
                Err(failure) => {
                    warn!(provider = %name, error = %failure, "Quote source failed, advancing cascade");
                }
            }
        }

        info!("All quote sources failed, serving demo dataset");

        ResolutionResult {
            quotes: self.demo.clone(),
            source: ProviderName::Demo,
            advisory: Some(DEMO_ADVISORY.to_string()),
            fetched_at: Utc::now(),
        }
    }

    /// One quote per requested symbol, in request order. Enforced here
    /// so a misbehaving source advances the cascade instead of leaking
    /// a short or shuffled batch to the consumer.
    fn covers_watchlist(&self, batch: &SourceBatch) -> bool {
        batch.quotes.len() == self.symbols.len()
            && batch
                .quotes
                .iter()
                .zip(&self.symbols)
                .all(|(quote, symbol)| &quote.symbol == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::ports::quote_source::ProviderFailure;

    /// Source stub with a canned outcome per call.
    struct StubSource {
        name: ProviderName,
        outcome: fn(&[Symbol]) -> Result<SourceBatch, ProviderFailure>,
    }

    #[async_trait]
    impl QuoteSource for StubSource {
        fn name(&self) -> ProviderName {
            self.name
        }

        async fn fetch(&self, symbols: &[Symbol]) -> Result<SourceBatch, ProviderFailure> {
            (self.outcome)(symbols)
        }
    }

    fn full_batch(symbols: &[Symbol]) -> Result<SourceBatch, ProviderFailure> {
        Ok(SourceBatch::clean(
            symbols.iter().map(|s| Quote::new(s.clone(), 100.0, 1.0)).collect(),
        ))
    }

    fn watchlist() -> Vec<Symbol> {
        vec!["AAPL".to_string(), "MSFT".to_string()]
    }

    #[tokio::test]
    async fn first_successful_source_determines_provenance() {
        let resolver = QuoteResolver::new(
            vec![Arc::new(StubSource {
                name: ProviderName::Finnhub,
                outcome: full_batch,
            })],
            watchlist(),
        )
        .expect("watchlist covered by samples");

        let result = resolver.resolve().await;
        assert_eq!(result.source, ProviderName::Finnhub);
        assert!(result.advisory.is_none());
    }

    #[tokio::test]
    async fn short_batch_advances_the_cascade() {
        let resolver = QuoteResolver::new(
            vec![
                Arc::new(StubSource {
                    name: ProviderName::Finnhub,
                    outcome: |_| Ok(SourceBatch::clean(vec![Quote::new("AAPL", 1.0, 0.0)])),
                }),
                Arc::new(StubSource {
                    name: ProviderName::Fmp,
                    outcome: full_batch,
                }),
            ],
            watchlist(),
        )
        .expect("watchlist covered by samples");

        let result = resolver.resolve().await;
        assert_eq!(result.source, ProviderName::Fmp);
    }

    #[tokio::test]
    async fn shuffled_batch_advances_the_cascade() {
        let resolver = QuoteResolver::new(
            vec![Arc::new(StubSource {
                name: ProviderName::Finnhub,
                outcome: |symbols| {
                    let mut quotes: Vec<Quote> = symbols
                        .iter()
                        .map(|s| Quote::new(s.clone(), 100.0, 1.0))
                        .collect();
                    quotes.reverse();
                    Ok(SourceBatch::clean(quotes))
                },
            })],
            watchlist(),
        )
        .expect("watchlist covered by samples");

        let result = resolver.resolve().await;
        assert_eq!(result.source, ProviderName::Demo);
    }

    #[tokio::test]
    async fn empty_source_chain_serves_demo_data() {
        let resolver =
            QuoteResolver::new(Vec::new(), watchlist()).expect("watchlist covered by samples");

        let result = resolver.resolve().await;
        assert_eq!(result.source, ProviderName::Demo);
        assert_eq!(result.advisory.as_deref(), Some(DEMO_ADVISORY));
        assert_eq!(result.quotes.len(), 2);
    }

    #[test]
    fn unknown_symbol_fails_construction() {
        let result = QuoteResolver::new(Vec::new(), vec!["ZZZZ".to_string()]);
        assert!(result.is_err());
    }
}

//! Core quote domain types.
//!
//! Defines the normalized shapes every provider response is mapped into:
//! quotes, provider provenance tags, and the final resolution record
//! handed to the consumer. These types are the foundation of the
//! hexagonal architecture's inner ring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque, case-sensitive ticker identifier used at the ports boundary.
pub type Symbol = String;

/// A normalized price/change record for one symbol.
///
/// `price` and `change_percent` are independently optional because a
/// provider may supply one without the other (e.g. a price-only
/// endpoint). Absence is distinct from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol this quote belongs to.
    pub symbol: Symbol,
    /// Last traded price, if the provider supplied one.
    pub price: Option<f64>,
    /// Percent change versus previous close, if known.
    pub change_percent: Option<f64>,
}

impl Quote {
    /// Create a quote with both fields present.
    pub fn new(symbol: impl Into<Symbol>, price: f64, change_percent: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price: Some(price),
            change_percent: Some(change_percent),
        }
    }
}

/// Tag identifying which source produced a [`ResolutionResult`].
///
/// Provenance only: consumers display it, nothing branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderName {
    /// Finnhub `/quote` endpoint (credentialed, per-symbol).
    Finnhub,
    /// Financial Modeling Prep batched quote endpoint.
    Fmp,
    /// Twelve Data price-only endpoint.
    TwelveData,
    /// Built-in sample dataset, served when every provider failed.
    Demo,
}

impl std::fmt::Display for ProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finnhub => write!(f, "Finnhub"),
            Self::Fmp => write!(f, "FMP"),
            Self::TwelveData => write!(f, "Twelve Data"),
            Self::Demo => write!(f, "Demo"),
        }
    }
}

/// Final output of one resolution run.
///
/// Invariants upheld by the resolver: `quotes` holds exactly one entry
/// per requested symbol, in request order, and a fresh result is built
/// on every run (no caching across calls).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// One normalized quote per requested symbol, in request order.
    pub quotes: Vec<Quote>,
    /// The source that ultimately produced `quotes`.
    pub source: ProviderName,
    /// Non-fatal note about degraded data quality, when applicable.
    pub advisory: Option<String>,
    /// When the winning fetch completed.
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_absent_fields_are_distinct_from_zero() {
        let partial = Quote {
            symbol: "AAPL".to_string(),
            price: Some(0.0),
            change_percent: None,
        };

        assert_eq!(partial.price, Some(0.0));
        assert_ne!(partial.change_percent, Some(0.0));
    }

    #[test]
    fn provider_name_display_is_human_readable() {
        assert_eq!(ProviderName::Finnhub.to_string(), "Finnhub");
        assert_eq!(ProviderName::Fmp.to_string(), "FMP");
        assert_eq!(ProviderName::TwelveData.to_string(), "Twelve Data");
        assert_eq!(ProviderName::Demo.to_string(), "Demo");
    }

    #[test]
    fn quote_serializes_absent_fields_as_null() {
        let quote = Quote {
            symbol: "TSLA".to_string(),
            price: Some(318.12),
            change_percent: None,
        };

        let json = serde_json::to_value(&quote).expect("serializable");
        assert_eq!(json["price"], 318.12);
        assert!(json["change_percent"].is_null());
    }
}

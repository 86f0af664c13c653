//! Static fallback dataset - sample quotes baked in at build time.
//!
//! Serves two roles: the cascade terminus when every provider fails, and
//! the per-symbol substitution source inside the price-only Twelve Data
//! adapter. Every symbol the service is configured to track must appear
//! here; a missing entry is a configuration error caught at startup,
//! never at resolution time.

use thiserror::Error;

use super::quote::{Quote, Symbol};

/// Sample `(symbol, price, change_percent)` rows covering the default
/// watchlist. Prices are plausible snapshots, not live data.
const SAMPLE_QUOTES: &[(&str, f64, f64)] = &[
    ("AAPL", 227.52, 0.84),
    ("MSFT", 415.30, -0.35),
    ("GOOGL", 186.47, 1.12),
    ("AMZN", 205.74, 0.47),
    ("TSLA", 318.12, -1.96),
    ("NVDA", 178.88, 2.31),
    ("META", 712.20, 0.58),
];

/// A configured symbol has no row in the sample dataset.
///
/// Fatal at startup: without a sample row the resolver cannot guarantee
/// one quote per symbol once the cascade is exhausted.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("symbol {0:?} has no sample quote; add it to the sample dataset or drop it from the watchlist")]
pub struct MissingSampleData(pub Symbol);

/// Look up the sample quote for one symbol. Case-sensitive.
pub fn sample_quote(symbol: &str) -> Option<Quote> {
    SAMPLE_QUOTES
        .iter()
        .find(|(sym, _, _)| *sym == symbol)
        .map(|&(sym, price, change)| Quote::new(sym, price, change))
}

/// Build the full demo batch for `symbols`, in request order.
///
/// # Errors
/// Returns [`MissingSampleData`] naming the first symbol without a
/// sample row.
pub fn demo_quotes(symbols: &[Symbol]) -> Result<Vec<Quote>, MissingSampleData> {
    symbols
        .iter()
        .map(|sym| sample_quote(sym).ok_or_else(|| MissingSampleData(sym.clone())))
        .collect()
}

//! Quote Provider Adapters - One Module Per External Source
//!
//! Each source normalizes its own wire schema into `Quote` records:
//! - Finnhub: primary, credentialed, per-symbol requests
//! - FMP: secondary, keyless, one batched request
//! - Twelve Data: tertiary, price-only, per-symbol with sample fallback

pub mod finnhub;
pub mod fmp;
pub mod twelvedata;

pub use finnhub::FinnhubSource;
pub use fmp::FmpSource;
pub use twelvedata::TwelveDataSource;

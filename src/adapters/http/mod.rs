//! HTTP Transport - Shared Client for Provider Adapters

pub mod client;

pub use client::{QuoteHttpClient, QuoteHttpConfig};

//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Trait definitions that decouple the resolver use case from concrete
//! provider adapters. Mocked with `mockall` in integration tests.

pub mod quote_source;

pub use quote_source::{ProviderFailure, QuoteSource, SourceBatch};

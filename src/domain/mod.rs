//! Domain layer - Core types and quote math.
//!
//! This module contains the pure domain logic for the quote resolver.
//! No transport or runtime dependencies allowed here (hexagonal
//! architecture inner ring). All types are serializable and testable in
//! isolation.

pub mod change;
pub mod quote;
pub mod sample;

// Re-export core types for convenience
pub use change::percent_change;
pub use quote::{ProviderName, Quote, ResolutionResult, Symbol};
pub use sample::{MissingSampleData, demo_quotes, sample_quote};

//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Concrete implementations of the ports against real transports:
//! - `http`: shared bounded reqwest client
//! - `providers`: one quote source per external provider

pub mod http;
pub mod providers;

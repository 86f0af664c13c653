//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, falling back to built-in defaults
//! when the file is absent, validating all parameters, and reading the
//! Finnhub credential from the environment.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::sample::demo_quotes;

use super::AppConfig;

/// Load and validate configuration.
///
/// A missing file is not an error: the built-in defaults describe a
/// fully working demo setup. A file that exists but cannot be read or
/// parsed is an error.
///
/// # Errors
/// Returns a detailed error if the file is unreadable, the TOML is
/// invalid, or validation rules are violated.
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| "Failed to parse config.toml")?
    } else {
        info!(path = %path.display(), "No config file found, using built-in defaults");
        AppConfig::default()
    };

    validate_config(&config)?;

    info!(
        symbols = config.watchlist.symbols.len(),
        timeout_ms = config.http.timeout_ms,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Read the Finnhub API token from the environment variable named in
/// the config. An unset or empty variable yields `None`; the primary
/// source then fails over without a network call.
pub fn finnhub_token(config: &AppConfig) -> Option<String> {
    std::env::var(&config.providers.finnhub.token_env)
        .ok()
        .filter(|token| !token.is_empty())
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty watchlist with non-empty symbols
/// - Sample-dataset coverage of every symbol (the exhaustion guarantee
///   depends on it, so a gap is fatal here rather than at resolve time)
/// - Non-empty provider base URLs
/// - Positive HTTP bounds
fn validate_config(config: &AppConfig) -> Result<()> {
    // Watchlist validation
    anyhow::ensure!(
        !config.watchlist.symbols.is_empty(),
        "At least one symbol must be configured"
    );

    for (i, symbol) in config.watchlist.symbols.iter().enumerate() {
        anyhow::ensure!(!symbol.is_empty(), "Watchlist entry {i} is empty");
    }

    demo_quotes(&config.watchlist.symbols)
        .with_context(|| "Every watchlist symbol needs a sample quote for the demo fallback")?;

    // Provider validation
    anyhow::ensure!(
        !config.providers.finnhub.base_url.is_empty(),
        "Finnhub base URL must not be empty"
    );
    anyhow::ensure!(
        !config.providers.fmp.base_url.is_empty(),
        "FMP base URL must not be empty"
    );
    anyhow::ensure!(
        !config.providers.twelvedata.base_url.is_empty(),
        "Twelve Data base URL must not be empty"
    );

    // HTTP validation
    anyhow::ensure!(
        config.http.timeout_ms > 0,
        "HTTP timeout must be positive, got {}",
        config.http.timeout_ms
    );
    anyhow::ensure!(
        config.http.max_concurrent > 0,
        "max_concurrent must be positive, got {}",
        config.http.max_concurrent
    );

    Ok(())
}

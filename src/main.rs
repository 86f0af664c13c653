//! quote-cascade — Entry Point
//!
//! Wires the resolution pipeline and runs it once, printing the result
//! as JSON on stdout. Logs go to stderr so stdout stays machine
//! readable for whatever consumer renders the quotes.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate (missing file -> built-in defaults)
//! 2. Init tracing (JSON structured logging, stderr)
//! 3. Read the Finnhub token from the environment
//! 4. Create the shared bounded HTTP client
//! 5. Build the source cascade: Finnhub -> FMP -> Twelve Data
//! 6. Build the resolver (validates sample coverage of the watchlist)
//! 7. Resolve once; ctrl-c abandons the in-flight resolution

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::http::{QuoteHttpClient, QuoteHttpConfig};
use adapters::providers::{FinnhubSource, FmpSource, TwelveDataSource};
use ports::quote_source::QuoteSource;
use usecases::resolver::QuoteResolver;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config =
        config::loader::load_config(&config_path).context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging on stderr ─────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&config.service.log_level)
            }),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        symbols = config.watchlist.symbols.len(),
        "Starting quote resolution"
    );

    // ── 3. Read the Finnhub token from the environment ──────
    let token = config::loader::finnhub_token(&config);
    if token.is_none() {
        warn!(
            env = %config.providers.finnhub.token_env,
            "No Finnhub token in environment, primary source will fail over"
        );
    }

    // ── 4. Create the shared bounded HTTP client ────────────
    let http_config = QuoteHttpConfig {
        timeout: Duration::from_millis(config.http.timeout_ms),
        max_concurrent: config.http.max_concurrent,
        max_retries: config.http.max_retries,
        retry_base_delay: Duration::from_millis(config.http.retry_base_delay_ms),
    };
    let client =
        Arc::new(QuoteHttpClient::new(http_config).context("Failed to create HTTP client")?);

    // ── 5. Build the source cascade in priority order ───────
    let sources: Vec<Arc<dyn QuoteSource>> = vec![
        Arc::new(FinnhubSource::new(
            Arc::clone(&client),
            config.providers.finnhub.base_url.clone(),
            token,
        )),
        Arc::new(FmpSource::new(
            Arc::clone(&client),
            config.providers.fmp.base_url.clone(),
            config.providers.fmp.api_key.clone(),
        )),
        Arc::new(TwelveDataSource::new(
            Arc::clone(&client),
            config.providers.twelvedata.base_url.clone(),
            config.providers.twelvedata.api_key.clone(),
        )),
    ];

    // ── 6. Build the resolver (fatal if samples lack coverage) ──
    let resolver = QuoteResolver::new(sources, config.watchlist.symbols.clone())
        .context("Sample dataset does not cover the configured watchlist")?;

    // ── 7. Resolve once; ctrl-c abandons in-flight requests ─
    tokio::select! {
        result = resolver.resolve() => {
            info!(source = %result.source, "Resolution complete");
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ = signal::ctrl_c() => {
            warn!("Interrupted, abandoning resolution");
        }
    }

    Ok(())
}

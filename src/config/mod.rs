//! Configuration Module - TOML-based Resolver Configuration
//!
//! Loads configuration from `config.toml` with per-field defaults so the
//! binary runs out of the box without a file. Provider endpoints, the
//! symbol watchlist, and HTTP bounds are externalized here; the Finnhub
//! credential itself is read from the environment (only its variable
//! name lives in the file).

pub mod loader;

use serde::Deserialize;

/// Top-level resolver configuration.
///
/// Loaded from `config.toml` at startup and validated before the first
/// resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Ordered symbol watchlist.
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    /// Per-provider endpoints and keys.
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// HTTP transport bounds.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Human-readable service name.
    #[serde(default = "default_service_name")]
    pub name: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Symbol watchlist configuration.
///
/// The order given here is the order quotes come back in.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistConfig {
    /// Ordered ticker symbols to resolve. Case-sensitive.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
}

/// Per-provider configuration, in cascade priority order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    /// Primary: Finnhub (credentialed).
    #[serde(default)]
    pub finnhub: FinnhubConfig,
    /// Secondary: Financial Modeling Prep (batched, demo key).
    #[serde(default)]
    pub fmp: FmpConfig,
    /// Tertiary: Twelve Data (price-only, demo key).
    #[serde(default)]
    pub twelvedata: TwelveDataConfig,
}

/// Finnhub endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FinnhubConfig {
    /// API base URL.
    #[serde(default = "default_finnhub_url")]
    pub base_url: String,
    /// Environment variable the API token is read from. The token never
    /// lives in the config file.
    #[serde(default = "default_finnhub_token_env")]
    pub token_env: String,
}

/// FMP endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FmpConfig {
    /// API base URL.
    #[serde(default = "default_fmp_url")]
    pub base_url: String,
    /// API key query parameter.
    #[serde(default = "default_demo_key")]
    pub api_key: String,
}

/// Twelve Data endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TwelveDataConfig {
    /// API base URL.
    #[serde(default = "default_twelvedata_url")]
    pub base_url: String,
    /// API key query parameter.
    #[serde(default = "default_demo_key")]
    pub api_key: String,
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum concurrent in-flight requests during fan-out.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Maximum retries on transient errors.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay between retries in milliseconds.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
        }
    }
}

impl Default for FinnhubConfig {
    fn default() -> Self {
        Self {
            base_url: default_finnhub_url(),
            token_env: default_finnhub_token_env(),
        }
    }
}

impl Default for FmpConfig {
    fn default() -> Self {
        Self {
            base_url: default_fmp_url(),
            api_key: default_demo_key(),
        }
    }
}

impl Default for TwelveDataConfig {
    fn default() -> Self {
        Self {
            base_url: default_twelvedata_url(),
            api_key: default_demo_key(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_concurrent: default_max_concurrent(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

// Default value functions for serde

fn default_service_name() -> String {
    "quote-cascade".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_symbols() -> Vec<String> {
    ["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_finnhub_url() -> String {
    "https://finnhub.io/api/v1".to_string()
}

fn default_finnhub_token_env() -> String {
    "FINNHUB_API_TOKEN".to_string()
}

fn default_fmp_url() -> String {
    "https://financialmodelingprep.com/api/v3".to_string()
}

fn default_twelvedata_url() -> String {
    "https://api.twelvedata.com".to_string()
}

fn default_demo_key() -> String {
    "demo".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_concurrent() -> usize {
    8
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    200
}

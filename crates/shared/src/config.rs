//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::{CurrencyCode, Language};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Rate source and refresh configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Local snapshot configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Language used when a request does not name one.
    #[serde(default)]
    pub language: Language,
    /// Currencies offered by the shop, used when no snapshot exists yet.
    #[serde(default)]
    pub currencies: Vec<CurrencySeed>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Rate source and refresh configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// The shop's local currency; every rate is quoted against it.
    #[serde(default = "CurrencyCode::ils")]
    pub base_currency: CurrencyCode,
    /// ExchangeRate-API v6 endpoint.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// ExchangeRate-API key. Without one the static rate table is served.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Run the background refresh loop.
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,
    /// Seconds between background refreshes.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Age in seconds after which the board counts as stale.
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
    /// HTTP timeout for provider requests.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_provider_url() -> String {
    "https://v6.exchangerate-api.com/v6".to_string()
}

fn default_auto_refresh() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    300 // 5 minutes
}

fn default_max_age() -> u64 {
    3600 // 1 hour
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_currency: CurrencyCode::ils(),
            provider_url: default_provider_url(),
            api_key: None,
            auto_refresh: default_auto_refresh(),
            refresh_interval_secs: default_refresh_interval(),
            max_age_secs: default_max_age(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Local snapshot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Path of the JSON snapshot file.
    #[serde(default = "default_cache_path")]
    pub path: String,
}

fn default_cache_path() -> String {
    "data/rates.json".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

/// A currency the shop trades, as declared in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencySeed {
    /// Currency code.
    pub code: CurrencyCode,
    /// Arabic display name.
    pub name_ar: String,
    /// English display name.
    pub name_en: String,
    /// Hebrew display name.
    #[serde(default)]
    pub name_he: Option<String>,
    /// Buy commission in agorot.
    #[serde(default)]
    pub buy_commission: Option<Decimal>,
    /// Sell commission in agorot.
    #[serde(default)]
    pub sell_commission: Option<Decimal>,
    /// Whether the currency is offered in the calculator.
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("SARRAFA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

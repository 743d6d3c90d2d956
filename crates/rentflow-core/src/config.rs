//! Engine configuration
//!
//! Settings that apply to every listing: the hourly cutoff, money rounding
//! and the fallback currency, plus tracing output. Layered from built-in
//! defaults, optional `config/` files and `RENTFLOW__*` variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main engine configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Pricing behaviour that is not part of a listing's own tariff
#[derive(Debug, Deserialize, Clone)]
pub struct PricingSettings {
    /// Bookings strictly shorter than this are billed by the hour
    /// when the listing allows it
    #[serde(default = "default_hourly_threshold")]
    pub hourly_threshold_hours: u32,

    /// Decimal places money amounts are rounded to
    #[serde(default = "default_rounding_scale")]
    pub rounding_scale: u32,

    /// Currency assumed when a listing document omits one
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_hourly_threshold() -> u32 {
    24
}

fn default_rounding_scale() -> u32 {
    2
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            hourly_threshold_hours: default_hourly_threshold(),
            rounding_scale: default_rounding_scale(),
            default_currency: default_currency(),
        }
    }
}

/// Tracing output configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// Default filter directive when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment and optional config files
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .set_default("pricing.hourly_threshold_hours", 24)?
            .set_default("pricing.rounding_scale", 2)?
            .set_default("pricing.default_currency", "EUR")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Optional files, the run-mode one overriding the shared one
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with RENTFLOW_ prefix
            .add_source(
                Environment::with_prefix("RENTFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load settings from one file, environment variables on top
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("RENTFLOW").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

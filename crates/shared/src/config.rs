//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Journal editing and balancing rules.
    #[serde(default)]
    pub journal: JournalConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Journal configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
    /// Largest absolute debit/credit difference still considered balanced
    /// (exclusive).
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
    /// Minimum number of lines an entry must keep.
    #[serde(default = "default_min_lines")]
    pub min_lines: usize,
    /// Currency new entries are created in.
    #[serde(default = "default_currency")]
    pub currency: Currency,
    /// Prefix for generated entry numbers (`{prefix}-{year}-{seq}`).
    #[serde(default = "default_entry_number_prefix")]
    pub entry_number_prefix: String,
    /// Auto-balance behaviour.
    #[serde(default)]
    pub auto_balance: AutoBalanceConfig,
}

fn default_balance_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_min_lines() -> usize {
    2
}

fn default_currency() -> Currency {
    Currency::Usd
}

fn default_entry_number_prefix() -> String {
    "JE".to_string()
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
            min_lines: default_min_lines(),
            currency: default_currency(),
            entry_number_prefix: default_entry_number_prefix(),
            auto_balance: AutoBalanceConfig::default(),
        }
    }
}

/// Auto-balance configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AutoBalanceConfig {
    /// Ask before overwriting a last line that already holds an amount.
    #[serde(default)]
    pub require_confirmation: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "tally=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `TALLY__SECTION__KEY` environment variables. A `.env` file is
    /// read first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TALLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

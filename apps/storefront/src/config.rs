//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. CLI flags (highest priority)                                       │
//! │     --session, --data-dir, --storage, --json                            │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     LIYANA_SESSION_ID=550e8400-…                                       │
//! │     LIYANA_STORAGE=memory                                              │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/liyana-nour/storefront.toml (Linux)                      │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [shop]
//! name = "Liyana Nour Extrait"
//! currency_symbol = "€"
//!
//! [cart]
//! session_id = "550e8400-e29b-41d4-a716-446655440000"
//! coupon_latency_ms = 500
//!
//! [storage]
//! backend = "file"   # file | memory
//! data_dir = "/var/lib/liyana/carts"
//!
//! [console]
//! output = "text"    # text | json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use liyana_core::validation::validate_session_id;
use liyana_core::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

// =============================================================================
// Shop Settings
// =============================================================================

/// Display settings for the shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSettings {
    /// Shown in the console banner.
    #[serde(default = "default_shop_name")]
    pub name: String,

    /// Currency symbol (for display)
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Number of decimal places for currency
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,
}

fn default_shop_name() -> String {
    "Liyana Nour Extrait".to_string()
}

fn default_currency_symbol() -> String {
    "€".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            name: default_shop_name(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
        }
    }
}

// =============================================================================
// Cart Settings
// =============================================================================

/// Cart session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSettings {
    /// Session to resume. A fresh UUID is generated when unset.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Simulated latency before a coupon is applied (milliseconds).
    #[serde(default = "default_coupon_latency")]
    pub coupon_latency_ms: u64,

    /// Capacity of the cart command channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_coupon_latency() -> u64 {
    500
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            session_id: None,
            coupon_latency_ms: default_coupon_latency(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where carts are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One JSON file per session.
    #[default]
    File,

    /// Kept in memory; lost on exit.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::File => write!(f, "file"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "json" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(AppError::InvalidConfig(format!(
                "Unknown storage backend: '{}'. Valid options: file, memory",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for cart files. Platform data directory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

// =============================================================================
// Console Settings
// =============================================================================

/// How the console prints cart responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON document per response (for piping into a frontend).
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default)]
    pub output: OutputFormat,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub shop: ShopSettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub console: ConsoleSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::load_file(config_path)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Defaults plus the config file, without environment overrides.
    pub fn load_file(config_path: Option<PathBuf>) -> AppResult<Self> {
        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                return Ok(toml::from_str(&contents)?);
            }
            debug!(?path, "Config file not found, using defaults");
        }

        Ok(Self::default())
    }

    /// Stores `session_id` in the config file so the next start resumes the
    /// same cart. Every other setting is written back as the file had it.
    pub fn remember_session(config_path: Option<PathBuf>, session_id: &str) -> AppResult<()> {
        let mut on_disk = Self::load_file(config_path.clone())?;
        on_disk.cart.session_id = Some(session_id.to_string());
        on_disk.save(config_path)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> AppResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| AppError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(ref session_id) = self.cart.session_id {
            validate_session_id(session_id)
                .map_err(|e| AppError::InvalidConfig(e.to_string()))?;
        }

        if self.cart.channel_capacity == 0 {
            return Err(AppError::InvalidConfig(
                "channel_capacity must be greater than 0".into(),
            ));
        }

        if self.cart.coupon_latency_ms > 10_000 {
            return Err(AppError::InvalidConfig(
                "coupon_latency_ms must be at most 10000".into(),
            ));
        }

        if self.shop.currency_decimals > 2 {
            return Err(AppError::InvalidConfig(
                "currency_decimals must be at most 2".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("LIYANA_SESSION_ID") {
            debug!(session_id = %id, "Overriding session id from environment");
            self.cart.session_id = Some(id);
        }

        if let Ok(name) = std::env::var("LIYANA_SHOP_NAME") {
            self.shop.name = name;
        }

        if let Ok(latency) = std::env::var("LIYANA_COUPON_LATENCY_MS") {
            match latency.parse::<u64>() {
                Ok(ms) => self.cart.coupon_latency_ms = ms,
                Err(_) => warn!(value = %latency, "Ignoring invalid LIYANA_COUPON_LATENCY_MS"),
            }
        }

        if let Ok(backend) = std::env::var("LIYANA_STORAGE") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring LIYANA_STORAGE"),
            }
        }

        if let Ok(dir) = std::env::var("LIYANA_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("de", "liyana-nour", "liyana-nour")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn coupon_latency(&self) -> Duration {
        Duration::from_millis(self.cart.coupon_latency_ms)
    }

    /// Formats money with the configured symbol and decimals.
    ///
    /// ## Example
    /// ```rust
    /// use liyana_core::Money;
    /// use liyana_storefront::config::StorefrontConfig;
    ///
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(6448)), "€64.48");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let decimals = self.shop.currency_decimals.min(2) as u32;
        let divisor = 10_i64.pow(decimals);
        let scaled = cents / 10_i64.pow(2 - decimals);
        let whole = scaled / divisor;
        let frac = (scaled % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.shop.currency_symbol,
            if decimals > 0 {
                format!("{}.{:0width$}", whole.abs(), frac, width = decimals as usize)
            } else {
                whole.abs().to_string()
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.shop.name, "Liyana Nour Extrait");
        assert_eq!(config.cart.coupon_latency_ms, 500);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.cart.session_id.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();

        config.cart.session_id = Some("not-a-uuid".to_string());
        assert!(config.validate().is_err());

        config.cart.session_id = Some("550e8400-e29b-41d4-a716-446655440000".to_string());
        assert!(config.validate().is_ok());

        config.cart.channel_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("file".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert_eq!("MEMORY".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(
            &path,
            r#"
            [cart]
            coupon_latency_ms = 0

            [storage]
            backend = "memory"
            "#,
        )
        .unwrap();

        let config = StorefrontConfig::load(Some(path)).unwrap();
        assert_eq!(config.cart.coupon_latency_ms, 0);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        // Untouched sections keep their defaults
        assert_eq!(config.shop.currency_symbol, "€");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storefront.toml");

        let mut config = StorefrontConfig::default();
        config.console.output = OutputFormat::Json;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[shop]"));
        assert!(contents.contains("output = \"json\""));
    }

    #[test]
    fn test_format_currency() {
        let config = StorefrontConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(6448)), "€64.48");
        assert_eq!(config.format_currency(Money::from_cents(1)), "€0.01");
        assert_eq!(config.format_currency(Money::zero()), "€0.00");
        assert_eq!(config.format_currency(Money::from_cents(-550)), "-€5.50");

        let mut whole = StorefrontConfig::default();
        whole.shop.currency_decimals = 0;
        assert_eq!(whole.format_currency(Money::from_cents(9044)), "€90");
    }
}

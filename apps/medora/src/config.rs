//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MEDORA_USER_ID=user_k3j9x2a1b                                      │
//! │     MEDORA_SIMULATE_LATENCY=false                                      │
//! │     MEDORA_STORAGE_HOST=http://localhost:9000                          │
//! │     MEDORA_SEED_DEMO=true                                              │
//! │     MEDORA_STRICT_CATALOG=true                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/medora/medora.toml (Linux)                               │
//! │     ~/Library/Application Support/app.medora.medora/medora.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # medora.toml
//! [store]
//! select_latency_ms = 300
//! insert_latency_ms = 500
//! public_host = "https://mock-storage.medora.app"
//!
//! [billing]
//! purchase_latency_ms = 1500
//! subscription_days = 30
//! strict_catalog = false
//!
//! [app]
//! user_id = "user_k3j9x2a1b"
//! seed_demo_data = true
//! ```

use std::path::{Path, PathBuf};

use medora_billing::BillingConfig;
use medora_core::{Latency, MAX_INSERT_BATCH, MAX_SUBSCRIPTION_DAYS};
use medora_store::{StoreConfig, DEFAULT_PUBLIC_HOST};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "medora.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Store Settings
// =============================================================================

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub select_latency_ms: u64,
    pub insert_latency_ms: u64,
    pub update_latency_ms: u64,
    pub delete_latency_ms: u64,
    pub upload_latency_ms: u64,

    /// Prefix for public object URLs.
    pub public_host: String,

    /// Maximum rows per insert call.
    pub max_insert_batch: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            select_latency_ms: 300,
            insert_latency_ms: 500,
            update_latency_ms: 300,
            delete_latency_ms: 300,
            upload_latency_ms: 1000,
            public_host: DEFAULT_PUBLIC_HOST.to_string(),
            max_insert_batch: MAX_INSERT_BATCH,
        }
    }
}

// =============================================================================
// Billing Settings
// =============================================================================

/// `[billing]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingSettings {
    pub purchase_latency_ms: u64,
    pub restore_latency_ms: u64,
    pub cancel_latency_ms: u64,

    /// Premium window granted by a purchase.
    pub subscription_days: i64,

    /// Reject package ids that are not in the catalog.
    pub strict_catalog: bool,
}

impl Default for BillingSettings {
    fn default() -> Self {
        BillingSettings {
            purchase_latency_ms: 1500,
            restore_latency_ms: 1000,
            cancel_latency_ms: 1000,
            subscription_days: 30,
            strict_catalog: false,
        }
    }
}

// =============================================================================
// App Settings
// =============================================================================

/// `[app]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Fixed user id; a random `user_xxxxxxxxx` id is generated when unset.
    pub user_id: Option<String>,

    /// Seed the sample donation requests and health files at startup.
    pub seed_demo_data: bool,
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub billing: BillingSettings,
    pub app: AppSettings,
}

impl AppConfig {
    /// Loads configuration: defaults, then the TOML file (if present), then
    /// `MEDORA_*` environment overrides, then validation.
    ///
    /// ## Arguments
    /// * `config_path` - Explicit file; `None` uses the platform config dir
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = AppConfig::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses TOML text; missing sections and keys take their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let host = &self.store.public_host;
        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "public_host must start with http:// or https://, got: {}",
                host
            )));
        }

        if self.store.max_insert_batch == 0 {
            return Err(ConfigError::Invalid(
                "max_insert_batch must be greater than 0".into(),
            ));
        }

        let days = self.billing.subscription_days;
        if !(1..=MAX_SUBSCRIPTION_DAYS).contains(&days) {
            return Err(ConfigError::Invalid(format!(
                "subscription_days must be between 1 and {}, got: {}",
                MAX_SUBSCRIPTION_DAYS, days
            )));
        }

        if let Some(user_id) = &self.app.user_id {
            if user_id.trim().is_empty() {
                return Err(ConfigError::Invalid("user_id must not be blank".into()));
            }
        }

        Ok(())
    }

    /// Applies overrides from the process environment.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `MEDORA_*` overrides from any key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(user_id) = lookup("MEDORA_USER_ID") {
            debug!(user_id = %user_id, "Overriding user id from environment");
            self.app.user_id = Some(user_id);
        }

        if let Some(value) = lookup("MEDORA_SIMULATE_LATENCY") {
            match parse_bool(&value) {
                Some(false) => {
                    debug!("Latency simulation disabled from environment");
                    self.disable_latency();
                }
                Some(true) => {}
                None => warn!(value = %value, "Unknown MEDORA_SIMULATE_LATENCY value"),
            }
        }

        if let Some(host) = lookup("MEDORA_STORAGE_HOST") {
            debug!(host = %host, "Overriding storage host from environment");
            self.store.public_host = host.trim_end_matches('/').to_string();
        }

        if let Some(value) = lookup("MEDORA_SEED_DEMO") {
            match parse_bool(&value) {
                Some(seed) => self.app.seed_demo_data = seed,
                None => warn!(value = %value, "Unknown MEDORA_SEED_DEMO value"),
            }
        }

        if let Some(value) = lookup("MEDORA_STRICT_CATALOG") {
            match parse_bool(&value) {
                Some(strict) => self.billing.strict_catalog = strict,
                None => warn!(value = %value, "Unknown MEDORA_STRICT_CATALOG value"),
            }
        }
    }

    /// Sets every simulated latency to zero.
    pub fn disable_latency(&mut self) {
        self.store.select_latency_ms = 0;
        self.store.insert_latency_ms = 0;
        self.store.update_latency_ms = 0;
        self.store.delete_latency_ms = 0;
        self.store.upload_latency_ms = 0;
        self.billing.purchase_latency_ms = 0;
        self.billing.restore_latency_ms = 0;
        self.billing.cancel_latency_ms = 0;
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("app", "medora", "medora")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Service Configs
    // =========================================================================

    /// Configuration for the data store.
    pub fn store_config(&self) -> StoreConfig {
        let s = &self.store;
        StoreConfig::default()
            .select_latency(Latency::from_millis(s.select_latency_ms))
            .insert_latency(Latency::from_millis(s.insert_latency_ms))
            .update_latency(Latency::from_millis(s.update_latency_ms))
            .delete_latency(Latency::from_millis(s.delete_latency_ms))
            .upload_latency(Latency::from_millis(s.upload_latency_ms))
            .public_host(s.public_host.clone())
            .max_insert_batch(s.max_insert_batch)
    }

    /// Configuration for the entitlement service.
    pub fn billing_config(&self) -> BillingConfig {
        let b = &self.billing;
        BillingConfig::default()
            .purchase_latency(Latency::from_millis(b.purchase_latency_ms))
            .restore_latency(Latency::from_millis(b.restore_latency_ms))
            .cancel_latency(Latency::from_millis(b.cancel_latency_ms))
            .subscription_days(b.subscription_days)
            .strict_catalog(b.strict_catalog)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

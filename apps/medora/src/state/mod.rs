//! # State Module
//!
//! The services every command works against, built once at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  AppConfig ──► AppState::build(config)                                 │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────┐              │
//! │  │ Arc<         │  │ Arc<             │  │ Arc<         │              │
//! │  │  DataStore>  │  │  Entitlement     │  │  AppConfig>  │              │
//! │  │              │  │  Service>        │  │              │              │
//! │  │ tables,      │  │ one user's       │  │ read-only    │              │
//! │  │ bucket       │  │ premium state    │  │              │              │
//! │  └──────────────┘  └──────────────────┘  └──────────────┘              │
//! │                                                                         │
//! │  AppState is Clone; clones share the same services.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use medora_billing::{BillingConfig, EntitlementService};
use medora_core::{Clock, SystemClock};
use medora_store::{DataStore, StoreConfig};

use crate::config::AppConfig;

/// Services shared by the commands.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<DataStore>,
    billing: Arc<EntitlementService>,
    config: Arc<AppConfig>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Builds both services from the loaded configuration.
    pub fn build(config: AppConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = DataStore::with_clock(config.store_config(), clock.clone());
        let billing = EntitlementService::with_clock(config.billing_config(), clock.clone());
        AppState::from_parts(store, billing, config, clock)
    }

    /// Builds zero-latency services sharing one clock (for testing).
    pub fn instant(clock: Arc<dyn Clock>) -> Self {
        let mut config = AppConfig::default();
        config.disable_latency();

        let store = DataStore::with_clock(StoreConfig::instant(), clock.clone());
        let billing = EntitlementService::with_clock(BillingConfig::instant(), clock.clone());
        AppState::from_parts(store, billing, config, clock)
    }

    /// Wraps already-built services.
    pub fn from_parts(
        store: DataStore,
        billing: EntitlementService,
        config: AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        AppState {
            store: Arc::new(store),
            billing: Arc::new(billing),
            config: Arc::new(config),
            clock,
        }
    }

    /// The data store.
    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// The entitlement service.
    pub fn billing(&self) -> &EntitlementService {
        &self.billing
    }

    /// The configuration the state was built from.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Clock shared with both services.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

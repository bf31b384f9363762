//! # Data Store Handle
//!
//! Configuration and construction of the in-memory data store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      In-Memory Data Store                               │
//! │                                                                         │
//! │  App startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::default() ← latencies, public host, batch limit          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DataStore::new(config) ← pre-creates the well-known tables            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │  Arc<StoreState>                         │                           │
//! │  │  ├── tables:  RwLock<name → Vec<Row>>    │                           │
//! │  │  └── objects: RwLock<(bucket, path) → bytes>                        │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.tables()   ──► TableRepository                                  │
//! │  store.storage()  ──► StorageRepository                                │
//! │  (cheap handles sharing the same state)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Simulated Latency
//! Every async operation sleeps for its configured [`Latency`] *before* it
//! takes a lock. The mutation itself then runs under a single write guard,
//! so each call is atomic on its own. Nothing spans two calls.

use std::collections::HashMap;
use std::sync::Arc;

use medora_core::{Clock, Latency, Row, SystemClock, DEFAULT_TABLES, MAX_INSERT_BATCH};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::repository::storage::StorageRepository;
use crate::repository::table::TableRepository;

/// Host prefix used for public object URLs unless configured otherwise.
pub const DEFAULT_PUBLIC_HOST: &str = "https://mock-storage.medora.app";

// =============================================================================
// Configuration
// =============================================================================

/// Data store configuration.
///
/// ## Example
/// ```rust
/// use medora_store::StoreConfig;
/// use medora_core::Latency;
///
/// let config = StoreConfig::default()
///     .select_latency(Latency::from_millis(50))
///     .public_host("http://localhost:9000");
/// assert_eq!(config.public_host, "http://localhost:9000");
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Delay before a query completes.
    /// Default: 300ms
    pub select_latency: Latency,

    /// Delay before an insert completes.
    /// Default: 500ms
    pub insert_latency: Latency,

    /// Delay before an update completes.
    /// Default: 300ms
    pub update_latency: Latency,

    /// Delay before a delete completes.
    /// Default: 300ms
    pub delete_latency: Latency,

    /// Delay before an upload completes.
    /// Default: 1000ms
    pub upload_latency: Latency,

    /// Prefix for public object URLs (no trailing slash).
    pub public_host: String,

    /// Maximum rows per insert call.
    pub max_insert_batch: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            select_latency: Latency::from_millis(300),
            insert_latency: Latency::from_millis(500),
            update_latency: Latency::from_millis(300),
            delete_latency: Latency::from_millis(300),
            upload_latency: Latency::from_millis(1000),
            public_host: DEFAULT_PUBLIC_HOST.to_string(),
            max_insert_batch: MAX_INSERT_BATCH,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with zero latency everywhere (for testing).
    ///
    /// ## Usage
    /// ```rust
    /// use medora_store::{DataStore, StoreConfig};
    ///
    /// let store = DataStore::new(StoreConfig::instant());
    /// ```
    pub fn instant() -> Self {
        StoreConfig {
            select_latency: Latency::instant(),
            insert_latency: Latency::instant(),
            update_latency: Latency::instant(),
            delete_latency: Latency::instant(),
            upload_latency: Latency::instant(),
            ..StoreConfig::default()
        }
    }

    /// Sets the query latency.
    pub fn select_latency(mut self, latency: Latency) -> Self {
        self.select_latency = latency;
        self
    }

    /// Sets the insert latency.
    pub fn insert_latency(mut self, latency: Latency) -> Self {
        self.insert_latency = latency;
        self
    }

    /// Sets the update latency.
    pub fn update_latency(mut self, latency: Latency) -> Self {
        self.update_latency = latency;
        self
    }

    /// Sets the delete latency.
    pub fn delete_latency(mut self, latency: Latency) -> Self {
        self.delete_latency = latency;
        self
    }

    /// Sets the upload latency.
    pub fn upload_latency(mut self, latency: Latency) -> Self {
        self.upload_latency = latency;
        self
    }

    /// Sets the public URL host; a trailing slash is dropped.
    pub fn public_host(mut self, host: impl Into<String>) -> Self {
        self.public_host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the maximum rows per insert call.
    pub fn max_insert_batch(mut self, max: usize) -> Self {
        self.max_insert_batch = max;
        self
    }
}

// =============================================================================
// Shared State
// =============================================================================

/// State shared by every repository handle.
#[derive(Debug)]
pub(crate) struct StoreState {
    pub(crate) config: StoreConfig,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) tables: RwLock<HashMap<String, Vec<Row>>>,
    pub(crate) objects: RwLock<HashMap<(String, String), Vec<u8>>>,
}

/// Waits out a simulated network delay.
pub(crate) async fn simulate(latency: Latency) {
    if !latency.is_instant() {
        tokio::time::sleep(latency.duration()).await;
    }
}

// =============================================================================
// DataStore
// =============================================================================

/// Main data store handle providing repository access.
///
/// Cloning is cheap: clones share the same tables and bucket.
#[derive(Debug, Clone)]
pub struct DataStore {
    state: Arc<StoreState>,
}

impl DataStore {
    /// Creates a store using the system clock.
    ///
    /// The well-known tables exist (empty) from the start; any other table
    /// is created by its first insert.
    pub fn new(config: StoreConfig) -> Self {
        DataStore::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a store stamping `created_at` from the given clock.
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        let tables = DEFAULT_TABLES
            .iter()
            .map(|name| (name.to_string(), Vec::new()))
            .collect::<HashMap<_, _>>();

        info!(
            tables = tables.len(),
            public_host = %config.public_host,
            "Data store created"
        );

        DataStore {
            state: Arc::new(StoreState {
                config,
                clock,
                tables: RwLock::new(tables),
                objects: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Returns the table repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let store = DataStore::new(StoreConfig::instant());
    /// let rows = store.tables().query(Query::table("health_files")).await?;
    /// assert!(rows.is_empty());
    /// ```
    pub fn tables(&self) -> TableRepository {
        TableRepository::new(self.state.clone())
    }

    /// Returns the bucket repository.
    pub fn storage(&self) -> StorageRepository {
        StorageRepository::new(self.state.clone())
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.state.config
    }

    /// Names of all tables that currently exist, sorted.
    pub async fn table_names(&self) -> Vec<String> {
        let tables = self.state.tables.read().await;
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        debug!(count = names.len(), "Listed tables");
        names
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

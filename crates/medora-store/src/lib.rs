//! # medora-store: Mock Data Store for Medora
//!
//! This crate stands in for the hosted backend the screens talk to: named
//! tables of schemaless rows and a file bucket, kept in memory and answered
//! after a simulated network delay.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Medora Data Flow                                 │
//! │                                                                         │
//! │  Screen command (list_health_files)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   medora-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐                  │   │
//! │  │   │   DataStore   │    │   Repositories     │                  │   │
//! │  │   │  (store.rs)   │    │                    │                  │   │
//! │  │   │               │    │ TableRepository    │                  │   │
//! │  │   │ StoreConfig   │◄───│ StorageRepository  │                  │   │
//! │  │   │ shared state  │    │                    │                  │   │
//! │  │   └───────────────┘    └────────────────────┘                  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  In-memory tables + objects (lost on exit)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - Configuration and the [`DataStore`] handle
//! - [`error`] - Store error types
//! - [`repository`] - Table and bucket repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medora_core::Query;
//! use medora_store::{DataStore, StoreConfig};
//!
//! let store = DataStore::new(StoreConfig::default());
//!
//! let created = store
//!     .tables()
//!     .insert("donation_requests", vec![row])
//!     .await?;
//!
//! let newest = store
//!     .tables()
//!     .query(Query::table("donation_requests").limit(10))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{DataStore, StoreConfig, DEFAULT_PUBLIC_HOST};

// Repository re-exports for convenience
pub use repository::storage::StorageRepository;
pub use repository::table::TableRepository;

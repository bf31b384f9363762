//! # medora-core: Pure Domain Types for Medora
//!
//! This crate holds the value types shared by the mock backend
//! (`medora-store`) and the entitlement service (`medora-billing`).
//! It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Medora Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Screens (web / mobile)                       │   │
//! │  │    Vault ──► Donation Hub ──► Mentors ──► Settings              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ await command(...)                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/medora commands                         │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼────────────┐      ┌──────────────▼────────────────┐  │
//! │  │  medora-store             │      │  medora-billing               │  │
//! │  │  tables, buckets          │      │  premium state machine        │  │
//! │  └──────────────┬────────────┘      └──────────────┬────────────────┘  │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────────────────────────▼────────────────┐  │
//! │  │               ★ medora-core (THIS CRATE) ★                        │  │
//! │  │                                                                   │  │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────────┐  ┌─────────────┐    │  │
//! │  │   │   row   │  │  query  │  │ entitlement │  │    clock    │    │  │
//! │  │   │  Row    │  │  Query  │  │ features    │  │  Clock      │    │  │
//! │  │   │ values  │  │ OrderBy │  │ packages    │  │  Latency    │    │  │
//! │  │   └─────────┘  └─────────┘  └─────────────┘  └─────────────┘    │  │
//! │  │                                                                   │  │
//! │  │   NO I/O • NO STORAGE • NO TIMERS • PURE FUNCTIONS                │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`row`] - Schemaless table rows (field name → JSON value)
//! - [`query`] - Query options replacing the select/eq/order/limit chain
//! - [`entitlement`] - Feature ids, premium packages, subscription status
//! - [`clock`] - Injectable wall clock and simulated latency
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for table names, paths and ids
//!
//! ## Example Usage
//!
//! ```rust
//! use medora_core::query::{Query, SortDirection};
//!
//! let query = Query::table("donation_requests")
//!     .eq("type", "blood")
//!     .order_by("created_at", SortDirection::Descending)
//!     .limit(10);
//!
//! assert_eq!(query.limit, Some(10));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod entitlement;
pub mod error;
pub mod query;
pub mod row;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, Latency, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use query::{Filter, OrderBy, Query, SortDirection};
pub use row::Row;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Table holding blood/organ/plasma/hair/equipment donation requests.
pub const TABLE_DONATION_REQUESTS: &str = "donation_requests";

/// Table holding donor responses to a donation request.
pub const TABLE_DONATION_MATCHES: &str = "donation_matches";

/// Table holding metadata for documents stored in the health vault.
pub const TABLE_HEALTH_FILES: &str = "health_files";

/// Tables that exist (empty) from the moment a store is created.
pub const DEFAULT_TABLES: [&str; 3] = [
    TABLE_DONATION_REQUESTS,
    TABLE_DONATION_MATCHES,
    TABLE_HEALTH_FILES,
];

/// Bucket used by the health vault for uploaded documents.
pub const BUCKET_HEALTH_FILES: &str = "health-files";

/// Identity field assigned to every inserted row.
pub const FIELD_ID: &str = "id";

/// Creation timestamp field assigned to every inserted row.
pub const FIELD_CREATED_AT: &str = "created_at";

/// Length of a premium window, in days.
pub const DEFAULT_SUBSCRIPTION_DAYS: i64 = 30;

/// Longest premium window a configuration may ask for (ten years).
pub const MAX_SUBSCRIPTION_DAYS: i64 = 3650;

/// Maximum number of rows accepted by a single insert call.
///
/// ## Business Reason
/// Guards against runaway batches from a misbehaving screen. A real backend
/// rejects oversized payloads; the mock does the same.
pub const MAX_INSERT_BATCH: usize = 500;

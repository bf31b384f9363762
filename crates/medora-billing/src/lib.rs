//! # medora-billing: Entitlement Service for Medora
//!
//! Premium subscription state for one user: the premium flag, the expiry of
//! the current window and the set of unlocked features.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Mentor screen ──► purchase_package ──┐                                │
//! │  Settings      ──► subscription_status│                                │
//! │  Any screen    ──► check_feature ─────┤                                │
//! │                                       ▼                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                medora-billing (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   EntitlementService                                           │   │
//! │  │   ├── record: RwLock<Option<EntitlementRecord>>  (sync reads)  │   │
//! │  │   ├── ledger: Mutex<PurchaseLedger>  (simulated store account) │   │
//! │  │   └── clock:  Arc<dyn Clock>          (expiry math)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medora_billing::{BillingConfig, EntitlementService};
//!
//! let billing = EntitlementService::new(BillingConfig::default());
//! billing.initialize("user_k3j9x2a1b")?;
//! billing.purchase("ai_mentor_monthly").await?;
//! assert_eq!(billing.subscription_status().days_left, Some(30));
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod outcome;
pub mod service;

pub use config::BillingConfig;
pub use error::{BillingError, BillingResult};
pub use outcome::{CancelOutcome, PurchaseReceipt, RestoreOutcome};
pub use service::EntitlementService;

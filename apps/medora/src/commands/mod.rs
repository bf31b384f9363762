//! # Commands Module
//!
//! Everything the screens await.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── vault.rs     ◄─── Health vault: list, upload, edit, delete
//! ├── donation.rs  ◄─── Donation hub: list, submit, respond
//! └── mentor.rs    ◄─── Paywall, purchase, restore, cancel, feature checks
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Screen                                                                 │
//! │  ──────                                                                 │
//! │  const files = await listHealthFiles();                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rust                                                                   │
//! │  ────                                                                   │
//! │  pub async fn list_health_files(                                        │
//! │      state: &AppState,        ◄── Services built at startup             │
//! │  ) -> ApiResult<Vec<HealthFile>>                                        │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  Screen receives: HealthFile[] or { code, message }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never fall back to sample data on their own; screens that want
//! optimistic data wrap the call with [`crate::fallback::or_fallback`].

pub mod donation;
pub mod mentor;
pub mod vault;

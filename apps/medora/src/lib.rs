//! # Medora Application Library
//!
//! Composition root for the Medora backend: configuration, logging, the
//! shared services and the commands the screens await.
//!
//! ## Module Organization
//! ```text
//! medora_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── medora.toml + MEDORA_* overrides
//! ├── state/
//! │   └── mod.rs      ◄─── AppState (DataStore, EntitlementService, config)
//! ├── commands/
//! │   ├── vault.rs    ◄─── Health vault commands
//! │   ├── donation.rs ◄─── Donation hub commands
//! │   └── mentor.rs   ◄─── Subscription commands
//! ├── fallback.rs     ◄─── Optimistic fallback helper
//! ├── demo.rs         ◄─── Sample records + seeding
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod fallback;
pub mod state;

use anyhow::Context;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::donation::{self, DonationKind};
use crate::commands::{mentor, vault};
use crate::config::AppConfig;
use crate::state::AppState;

/// Builds the services and runs one headless session.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Build State ──────────────────────────────────────────────────────► │
/// │     • DataStore with the configured latencies and public host          │
/// │     • EntitlementService (uninitialized)                                │
/// │                                                                         │
/// │  2. Seed Demo Data (if enabled) ──────────────────────────────────────► │
/// │                                                                         │
/// │  3. Initialize Entitlements ──────────────────────────────────────────► │
/// │     • Configured user id, or a generated user_xxxxxxxxx                 │
/// │                                                                         │
/// │  4. Print the home snapshot as JSON ──────────────────────────────────► │
/// │     • packages, subscription status, blood requests, vault             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting Medora");

    let seed = config.app.seed_demo_data;
    let user_id = config.app.user_id.clone();
    let state = AppState::build(config);

    if seed {
        let summary = demo::seed_demo_data(&state)
            .await
            .context("seeding demo data")?;
        info!(?summary, "Demo data ready");
    }

    let user_id = mentor::initialize_user(&state, user_id).context("initializing entitlements")?;
    info!(user_id = %user_id, "Session started");

    let requests = donation::list_donation_requests(&state, DonationKind::Blood)
        .await
        .context("listing donation requests")?;
    let files = vault::list_health_files(&state)
        .await
        .context("listing health files")?;

    let snapshot = json!({
        "userId": user_id,
        "packages": mentor::premium_packages(&state),
        "subscription": mentor::subscription_status(&state),
        "bloodRequests": requests,
        "healthFiles": files,
    });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=medora_store=trace` - Trace a single crate
/// - Default: `info,medora=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,medora=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

//! # Medora Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (`MEDORA_CONFIG` or the platform config dir)
//! 3. Build services, seed, initialize the user
//! 4. Print the home snapshot

use std::path::PathBuf;

use anyhow::Context;
use medora_lib::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medora_lib::init_tracing();

    let config_path = std::env::var_os("MEDORA_CONFIG").map(PathBuf::from);
    let config = AppConfig::load(config_path).context("loading configuration")?;

    medora_lib::run(config).await
}

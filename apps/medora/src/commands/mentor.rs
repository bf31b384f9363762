//! # Mentor / Subscription Commands
//!
//! The paywall, the purchase buttons and the subscription settings screen.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Mentor screen                                                          │
//! │  ┌─────────────────────────────┐  ┌─────────────────────────────┐      │
//! │  │ Human Health Mentor  $179   │  │ AI Health Mentor    $9.99   │      │
//! │  │ [Subscribe]                 │  │ [Subscribe]                 │      │
//! │  └──────────────┬──────────────┘  └──────────────┬──────────────┘      │
//! │                 └────────── purchase_package ─────┘                     │
//! │                                                                         │
//! │  Settings: subscription_status · restore_purchases · cancel_subscription│
//! │  Any screen: check_feature("human_mentor")                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medora_billing::{CancelOutcome, PurchaseReceipt, RestoreOutcome};
use medora_core::entitlement::{PremiumPackage, SubscriptionStatus};
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::AppState;

/// Starts tracking entitlements for `user_id`, or a generated id if `None`.
///
/// Returns the id in use (surrounding whitespace removed).
pub fn initialize_user(state: &AppState, user_id: Option<String>) -> ApiResult<String> {
    let user_id = user_id.unwrap_or_else(generate_user_id);
    let user_id = user_id.trim();
    state.billing().initialize(user_id)?;
    Ok(user_id.to_string())
}

/// A random `user_` id with nine lowercase alphanumerics.
pub fn generate_user_id() -> String {
    let simple = uuid::Uuid::new_v4().simple().to_string();
    format!("user_{}", &simple[..9])
}

/// The package catalog for the paywall.
pub fn premium_packages(state: &AppState) -> Vec<PremiumPackage> {
    state.billing().premium_packages()
}

/// Buys a package.
pub async fn purchase_package(state: &AppState, package_id: &str) -> ApiResult<PurchaseReceipt> {
    let receipt = state.billing().purchase(package_id).await?;
    info!(package_id = %package_id, expires_at = %receipt.expires_at, "purchase_package");
    Ok(receipt)
}

/// Re-applies a previous purchase for the current user.
pub async fn restore_purchases(state: &AppState) -> ApiResult<RestoreOutcome> {
    let outcome = state.billing().restore().await?;
    debug!(restored = outcome.restored, "restore_purchases");
    Ok(outcome)
}

/// Ends the subscription.
pub async fn cancel_subscription(state: &AppState) -> ApiResult<CancelOutcome> {
    Ok(state.billing().cancel().await?)
}

/// Current subscription snapshot.
pub fn subscription_status(state: &AppState) -> SubscriptionStatus {
    state.billing().subscription_status()
}

/// Whether a feature is unlocked for the current user.
pub fn check_feature(state: &AppState, feature: &str) -> bool {
    let allowed = state.billing().has_feature(feature);
    debug!(feature = %feature, allowed, "check_feature");
    allowed
}

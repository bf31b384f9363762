//! # Entitlement Types
//!
//! Feature ids, the premium package catalog and the subscription status DTO.
//!
//! ## Feature Gating
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Feature Sets                                      │
//! │                                                                         │
//! │  BASELINE (granted on initialize)   PREMIUM (granted on purchase)       │
//! │  ────────────────────────────────   ─────────────────────────────       │
//! │  basic_health_vault                 human_mentor                        │
//! │  basic_notifications                ai_mentor                           │
//! │  basic_profile                      premium_analytics                   │
//! │                                     priority_support                    │
//! │                                     advanced_matching                   │
//! │                                                                         │
//! │  Premium active ⇒ every feature check passes, including ids never      │
//! │  granted explicitly (unlimited_storage, family_sharing).                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Feature Ids
// =============================================================================

/// Feature identifiers checked by the screens.
pub mod features {
    pub const BASIC_HEALTH_VAULT: &str = "basic_health_vault";
    pub const BASIC_NOTIFICATIONS: &str = "basic_notifications";
    pub const BASIC_PROFILE: &str = "basic_profile";

    pub const HUMAN_MENTOR: &str = "human_mentor";
    pub const AI_MENTOR: &str = "ai_mentor";
    pub const PREMIUM_ANALYTICS: &str = "premium_analytics";
    pub const PRIORITY_SUPPORT: &str = "priority_support";
    pub const ADVANCED_MATCHING: &str = "advanced_matching";
    pub const UNLIMITED_STORAGE: &str = "unlimited_storage";
    pub const FAMILY_SHARING: &str = "family_sharing";
}

/// Features every initialized user has.
pub const BASELINE_FEATURES: [&str; 3] = [
    features::BASIC_HEALTH_VAULT,
    features::BASIC_NOTIFICATIONS,
    features::BASIC_PROFILE,
];

/// Features granted by a purchase and revoked by a cancel.
pub const PREMIUM_FEATURES: [&str; 5] = [
    features::HUMAN_MENTOR,
    features::AI_MENTOR,
    features::PREMIUM_ANALYTICS,
    features::PRIORITY_SUPPORT,
    features::ADVANCED_MATCHING,
];

// =============================================================================
// Packages
// =============================================================================

/// Package id for the human health mentor subscription.
pub const PACKAGE_HUMAN_MENTOR_MONTHLY: &str = "human_mentor_monthly";

/// Package id for the AI health mentor subscription.
pub const PACKAGE_AI_MENTOR_MONTHLY: &str = "ai_mentor_monthly";

/// A purchasable premium package shown on the paywall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PremiumPackage {
    /// Store identifier passed to `purchase`.
    pub id: String,

    /// Display name.
    pub name: String,

    /// One-line pitch.
    pub description: String,

    /// Monthly price in cents (integer money, never floats).
    pub price_cents: i64,

    /// Marketing bullet points.
    pub highlights: Vec<String>,
}

/// The package catalog.
pub fn premium_packages() -> Vec<PremiumPackage> {
    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    vec![
        PremiumPackage {
            id: PACKAGE_HUMAN_MENTOR_MONTHLY.to_string(),
            name: "Human Health Mentor".to_string(),
            description: "Get personalized guidance from certified medical professionals"
                .to_string(),
            price_cents: 17_900,
            highlights: strings(&[
                "24/7 unlimited chat support",
                "Weekly video consultations",
                "Detailed report explanations",
                "Personalized health plans",
                "Emergency health support",
                "Second opinion network",
                "Lab result interpretations",
                "Health tracking & monitoring",
            ]),
        },
        PremiumPackage {
            id: PACKAGE_AI_MENTOR_MONTHLY.to_string(),
            name: "AI Health Mentor".to_string(),
            description: "AI-powered health insights and report analysis".to_string(),
            price_cents: 999,
            highlights: strings(&[
                "AI report analysis",
                "Personalized health insights",
                "24/7 health questions support",
                "Trend analysis & insights",
                "Smart health recommendations",
            ]),
        },
    ]
}

/// Looks up a package in the catalog.
pub fn find_package(id: &str) -> Option<PremiumPackage> {
    premium_packages().into_iter().find(|p| p.id == id)
}

// =============================================================================
// State / Status
// =============================================================================

/// Where the entitlement state machine currently is.
///
/// ```text
/// Uninitialized ──initialize──► Free ──purchase──► Premium
///                                 ▲                   │
///                                 └──────cancel───────┤
///                                                     │ expiry passes
///                                 Lapsed ◄────────────┘
///                                 (flag still set, access denied)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementState {
    Uninitialized,
    Free,
    Premium,
    Lapsed,
}

/// Snapshot returned to the subscription settings screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    /// Stored premium flag.
    pub is_premium: bool,

    /// Flag set and premium window still open.
    pub is_active: bool,

    /// End of the premium window, if any.
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Whole days remaining (rounded up, never negative), if an expiry is set.
    pub days_left: Option<i64>,
}

impl SubscriptionStatus {
    /// Status of a user without a subscription.
    pub fn free() -> Self {
        SubscriptionStatus {
            is_premium: false,
            is_active: false,
            expires_at: None,
            days_left: None,
        }
    }
}

/// Days remaining until `expiry`: ceiling of the remaining time in days,
/// floored at zero.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use medora_core::entitlement::days_left;
///
/// let now = Utc::now();
/// assert_eq!(days_left(now + Duration::days(30), now), 30);
/// assert_eq!(days_left(now + Duration::hours(1), now), 1);
/// assert_eq!(days_left(now - Duration::days(3), now), 0);
/// ```
pub fn days_left(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

    let remaining = (expiry - now).num_milliseconds();
    if remaining <= 0 {
        return 0;
    }
    (remaining + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_days_left_rounds_up() {
        let now = Utc::now();
        assert_eq!(days_left(now + Duration::days(30), now), 30);
        assert_eq!(days_left(now + Duration::hours(12), now), 1);
        assert_eq!(days_left(now + Duration::days(29) + Duration::seconds(1), now), 30);
    }

    #[test]
    fn test_days_left_floors_at_zero() {
        let now = Utc::now();
        assert_eq!(days_left(now, now), 0);
        assert_eq!(days_left(now - Duration::days(1), now), 0);
    }

    #[test]
    fn test_catalog_contents() {
        let packages = premium_packages();
        assert_eq!(packages.len(), 2);
        assert_eq!(
            find_package(PACKAGE_HUMAN_MENTOR_MONTHLY).map(|p| p.price_cents),
            Some(17_900)
        );
        assert_eq!(
            find_package(PACKAGE_AI_MENTOR_MONTHLY).map(|p| p.price_cents),
            Some(999)
        );
        assert!(find_package("lifetime_unlimited").is_none());
    }

    #[test]
    fn test_feature_sets_are_disjoint() {
        for f in BASELINE_FEATURES {
            assert!(!PREMIUM_FEATURES.contains(&f));
        }
    }

    #[test]
    fn test_free_status() {
        let status = SubscriptionStatus::free();
        assert!(!status.is_premium);
        assert!(status.days_left.is_none());
    }
}

//! # Entitlement Service
//!
//! One user's premium status, expiry window and unlocked features.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Entitlement Lifecycle                                │
//! │                                                                         │
//! │  new(config)                 record = None        (Uninitialized)       │
//! │       │                                                                 │
//! │       ▼ initialize(user)                                                │
//! │  baseline features           premium = false      (Free)                │
//! │       │                                                                 │
//! │       ▼ purchase(pkg)        ~1.5s simulated store round-trip           │
//! │  + premium features          expiry = now + 30d   (Premium)             │
//! │       │                                                                 │
//! │       ├── cancel() ────────► premium features removed (Free)            │
//! │       │                                                                 │
//! │       └── time passes ─────► flag kept, checks fail   (Lapsed)          │
//! │                                                                         │
//! │  restore() re-applies an unexpired purchase from the ledger.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! The record sits behind a `std::sync::RwLock` so the feature checks stay
//! synchronous. Async operations finish their simulated wait first and only
//! then take the lock; no guard lives across an `.await`.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use medora_core::entitlement::{
    days_left, find_package, premium_packages, EntitlementState, PremiumPackage,
    SubscriptionStatus, BASELINE_FEATURES, PREMIUM_FEATURES,
};
use medora_core::validation::{validate_package_id, validate_user_id};
use medora_core::{Clock, Latency, SystemClock};
use tracing::{debug, info, warn};

use crate::config::BillingConfig;
use crate::error::{BillingError, BillingResult};
use crate::ledger::{LedgerEntry, PurchaseLedger};
use crate::outcome::{CancelOutcome, PurchaseReceipt, RestoreOutcome};

// =============================================================================
// Entitlement Record
// =============================================================================

/// The stored entitlement for the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntitlementRecord {
    pub user_id: String,
    pub is_premium: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub features: BTreeSet<String>,
    pub package_id: Option<String>,
}

impl EntitlementRecord {
    fn baseline(user_id: &str) -> Self {
        EntitlementRecord {
            user_id: user_id.to_string(),
            is_premium: false,
            expires_at: None,
            features: BASELINE_FEATURES.iter().map(|f| f.to_string()).collect(),
            package_id: None,
        }
    }

    /// Flag set and window still open.
    fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.is_premium && self.expires_at.map_or(true, |expiry| now < expiry)
    }

    fn grant_premium(&mut self, package_id: &str, expires_at: DateTime<Utc>) {
        self.is_premium = true;
        self.expires_at = Some(expires_at);
        self.package_id = Some(package_id.to_string());
        self.features
            .extend(PREMIUM_FEATURES.iter().map(|f| f.to_string()));
    }

    fn revoke_premium(&mut self) {
        self.is_premium = false;
        self.expires_at = None;
        self.package_id = None;
        self.features
            .retain(|f| !PREMIUM_FEATURES.contains(&f.as_str()));
    }
}

// =============================================================================
// Service
// =============================================================================

/// Entitlement service for one user.
///
/// Constructed explicitly and shared as `Arc<EntitlementService>`; there is
/// no global instance.
///
/// ## Usage
/// ```rust,ignore
/// let billing = Arc::new(EntitlementService::new(BillingConfig::default()));
/// billing.initialize("user_k3j9x2a1b")?;
///
/// if !billing.has_feature(features::HUMAN_MENTOR) {
///     let receipt = billing.purchase("human_mentor_monthly").await?;
/// }
/// ```
#[derive(Debug)]
pub struct EntitlementService {
    config: BillingConfig,
    clock: Arc<dyn Clock>,
    record: RwLock<Option<EntitlementRecord>>,
    ledger: Mutex<PurchaseLedger>,
}

impl EntitlementService {
    /// Creates an uninitialized service on the system clock.
    pub fn new(config: BillingConfig) -> Self {
        EntitlementService::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an uninitialized service on the given clock.
    pub fn with_clock(config: BillingConfig, clock: Arc<dyn Clock>) -> Self {
        EntitlementService {
            config,
            clock,
            record: RwLock::new(None),
            ledger: Mutex::new(PurchaseLedger::new()),
        }
    }

    /// Starts tracking `user_id` with the baseline feature set.
    ///
    /// Calling it again replaces the record (premium is reset); the
    /// purchase ledger is kept, so `restore` can bring premium back.
    pub fn initialize(&self, user_id: &str) -> BillingResult<()> {
        validate_user_id(user_id)?;
        let user_id = user_id.trim();

        let mut record = self.record.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = record.as_ref() {
            debug!(previous = %previous.user_id, "Replacing entitlement record");
        }
        *record = Some(EntitlementRecord::baseline(user_id));

        info!(user_id = %user_id, "Entitlements initialized");
        Ok(())
    }

    /// True if the premium flag is set and the window has not closed.
    ///
    /// Uninitialized → false.
    pub fn is_premium_active(&self) -> bool {
        let now = self.clock.now();
        self.read(|record| record.is_active(now)).unwrap_or(false)
    }

    /// True if premium is active or `feature` was granted explicitly.
    ///
    /// Active premium unlocks every feature id, including ones never listed.
    pub fn has_feature(&self, feature: &str) -> bool {
        let now = self.clock.now();
        self.read(|record| record.is_active(now) || record.features.contains(feature))
            .unwrap_or(false)
    }

    /// Buys `package_id` through the simulated store.
    ///
    /// ## What This Does
    /// 1. Validates the package id (and checks the catalog if strict)
    /// 2. Waits the purchase latency
    /// 3. Sets premium, expiry = now + subscription days, adds premium features
    /// 4. Records the purchase in the ledger for later restores
    ///
    /// ## Returns
    /// * `Ok(PurchaseReceipt)` - Premium is now active
    /// * `Err(BillingError::NotInitialized)` - `initialize` was never called
    /// * `Err(BillingError::UnknownPackage)` - Strict catalog and unknown id
    /// * `Err(BillingError::PeriodOutOfRange)` - Expiry would overflow the calendar
    pub async fn purchase(&self, package_id: &str) -> BillingResult<PurchaseReceipt> {
        validate_package_id(package_id)?;
        if self.config.strict_catalog && find_package(package_id).is_none() {
            warn!(package_id = %package_id, "Rejected purchase of unknown package");
            return Err(BillingError::UnknownPackage(package_id.to_string()));
        }

        debug!(package_id = %package_id, "Starting purchase");
        simulate(self.config.purchase_latency).await;

        let now = self.clock.now();
        let days = self.config.subscription_days;
        let expires_at = Duration::try_days(days)
            .and_then(|period| now.checked_add_signed(period))
            .ok_or(BillingError::PeriodOutOfRange(days))?;

        let mut guard = self.record.write().unwrap_or_else(PoisonError::into_inner);
        let record = guard.as_mut().ok_or(BillingError::NotInitialized)?;
        record.grant_premium(package_id, expires_at);
        let user_id = record.user_id.clone();
        drop(guard);

        self.ledger().record(
            &user_id,
            LedgerEntry {
                package_id: package_id.to_string(),
                expires_at,
            },
        );

        info!(
            user_id = %user_id,
            package_id = %package_id,
            expires_at = %expires_at,
            "Purchase completed"
        );

        Ok(PurchaseReceipt {
            user_id,
            package_id: package_id.to_string(),
            purchased_at: now,
            expires_at,
        })
    }

    /// Re-applies the current user's unexpired purchase, if any.
    ///
    /// ## Returns
    /// * `Ok(RestoreOutcome { restored: true, .. })` - Premium re-applied
    /// * `Ok(RestoreOutcome { restored: false, .. })` - Nothing to restore
    /// * `Err(BillingError::NotInitialized)` - `initialize` was never called
    pub async fn restore(&self) -> BillingResult<RestoreOutcome> {
        simulate(self.config.restore_latency).await;

        let now = self.clock.now();
        let mut guard = self.record.write().unwrap_or_else(PoisonError::into_inner);
        let record = guard.as_mut().ok_or(BillingError::NotInitialized)?;

        let Some(entry) = self.ledger().current(&record.user_id, now) else {
            info!(user_id = %record.user_id, "No purchases to restore");
            return Ok(RestoreOutcome::nothing());
        };

        record.grant_premium(&entry.package_id, entry.expires_at);
        info!(
            user_id = %record.user_id,
            package_id = %entry.package_id,
            "Purchases restored"
        );

        Ok(RestoreOutcome {
            restored: true,
            package_id: Some(entry.package_id),
            expires_at: Some(entry.expires_at),
        })
    }

    /// Ends the subscription: clears the flag and expiry, removes the premium
    /// features and forgets the ledger entry.
    pub async fn cancel(&self) -> BillingResult<CancelOutcome> {
        simulate(self.config.cancel_latency).await;

        let now = self.clock.now();
        let mut guard = self.record.write().unwrap_or_else(PoisonError::into_inner);
        let record = guard.as_mut().ok_or(BillingError::NotInitialized)?;

        let was_active = record.is_active(now);
        record.revoke_premium();
        self.ledger().remove(&record.user_id);

        info!(user_id = %record.user_id, was_active, "Subscription cancelled");
        Ok(CancelOutcome { was_active })
    }

    /// Snapshot for the settings screen.
    ///
    /// Uninitialized → the free status.
    pub fn subscription_status(&self) -> SubscriptionStatus {
        let now = self.clock.now();
        self.read(|record| SubscriptionStatus {
            is_premium: record.is_premium,
            is_active: record.is_active(now),
            expires_at: record.expires_at,
            days_left: record.expires_at.map(|expiry| days_left(expiry, now)),
        })
        .unwrap_or_else(SubscriptionStatus::free)
    }

    /// Where the state machine currently is.
    pub fn state(&self) -> EntitlementState {
        let now = self.clock.now();
        self.read(|record| match (record.is_premium, record.is_active(now)) {
            (true, true) => EntitlementState::Premium,
            (true, false) => EntitlementState::Lapsed,
            _ => EntitlementState::Free,
        })
        .unwrap_or(EntitlementState::Uninitialized)
    }

    /// The initialized user id, if any.
    pub fn user_id(&self) -> Option<String> {
        self.read(|record| record.user_id.clone())
    }

    /// The package catalog.
    pub fn premium_packages(&self) -> Vec<PremiumPackage> {
        premium_packages()
    }

    fn read<T>(&self, f: impl FnOnce(&EntitlementRecord) -> T) -> Option<T> {
        let guard = self.record.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().map(f)
    }

    fn ledger(&self) -> std::sync::MutexGuard<'_, PurchaseLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn simulate(latency: Latency) {
    if !latency.is_instant() {
        tokio::time::sleep(latency.duration()).await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use medora_core::entitlement::{features, PACKAGE_AI_MENTOR_MONTHLY, PACKAGE_HUMAN_MENTOR_MONTHLY};
    use medora_core::ManualClock;

    fn service() -> (EntitlementService, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        let service = EntitlementService::with_clock(BillingConfig::instant(), Arc::new(clock.clone()));
        (service, clock)
    }

    #[test]
    fn test_uninitialized_queries_are_negative() {
        let (service, _) = service();
        assert!(!service.is_premium_active());
        assert!(!service.has_feature(features::BASIC_PROFILE));
        assert_eq!(service.subscription_status(), SubscriptionStatus::free());
        assert_eq!(service.state(), EntitlementState::Uninitialized);
        assert!(service.user_id().is_none());
    }

    #[tokio::test]
    async fn test_uninitialized_operations_fail() {
        let (service, _) = service();
        assert!(matches!(
            service.purchase(PACKAGE_AI_MENTOR_MONTHLY).await,
            Err(BillingError::NotInitialized)
        ));
        assert!(matches!(service.restore().await, Err(BillingError::NotInitialized)));
        assert!(matches!(service.cancel().await, Err(BillingError::NotInitialized)));
    }

    #[test]
    fn test_initialize_grants_baseline_only() {
        let (service, _) = service();
        service.initialize("user_a1b2c3d4e").unwrap();

        assert!(service.has_feature(features::BASIC_HEALTH_VAULT));
        assert!(service.has_feature(features::BASIC_NOTIFICATIONS));
        assert!(service.has_feature(features::BASIC_PROFILE));
        assert!(!service.has_feature(features::HUMAN_MENTOR));
        assert!(!service.is_premium_active());
        assert_eq!(service.state(), EntitlementState::Free);
        assert_eq!(service.user_id().as_deref(), Some("user_a1b2c3d4e"));
    }

    #[test]
    fn test_initialize_rejects_blank_user() {
        let (service, _) = service();
        assert!(matches!(
            service.initialize("   "),
            Err(BillingError::Validation(_))
        ));
        assert_eq!(service.state(), EntitlementState::Uninitialized);
    }

    #[tokio::test]
    async fn test_purchase_activates_premium_for_thirty_days() {
        let (service, clock) = service();
        service.initialize("user_1").unwrap();

        let receipt = service.purchase(PACKAGE_HUMAN_MENTOR_MONTHLY).await.unwrap();

        assert_eq!(receipt.expires_at, clock.now() + Duration::days(30));
        assert!(service.is_premium_active());
        assert!(service.has_feature(features::HUMAN_MENTOR));
        assert!(service.has_feature(features::UNLIMITED_STORAGE));

        let status = service.subscription_status();
        assert!(status.is_premium);
        assert!(status.is_active);
        assert_eq!(status.days_left, Some(30));
        assert_eq!(service.state(), EntitlementState::Premium);
    }

    #[tokio::test]
    async fn test_purchase_accepts_any_package_unless_strict() {
        let (service, _) = service();
        service.initialize("user_1").unwrap();
        assert!(service.purchase("lifetime_unlimited").await.is_ok());

        let strict = EntitlementService::new(BillingConfig::instant().strict_catalog(true));
        strict.initialize("user_1").unwrap();
        assert!(matches!(
            strict.purchase("lifetime_unlimited").await,
            Err(BillingError::UnknownPackage(_))
        ));
        assert!(strict.purchase(PACKAGE_AI_MENTOR_MONTHLY).await.is_ok());
    }

    #[tokio::test]
    async fn test_purchase_rejects_empty_package() {
        let (service, _) = service();
        service.initialize("user_1").unwrap();
        assert!(matches!(
            service.purchase("").await,
            Err(BillingError::Validation(_))
        ));
        assert!(!service.is_premium_active());
    }

    #[tokio::test]
    async fn test_purchase_with_unrepresentable_period_fails_cleanly() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        let config = BillingConfig::instant().subscription_days(100_000_000);
        let service = EntitlementService::with_clock(config, Arc::new(clock));
        service.initialize("user_1").unwrap();

        assert!(matches!(
            service.purchase(PACKAGE_AI_MENTOR_MONTHLY).await,
            Err(BillingError::PeriodOutOfRange(100_000_000))
        ));
        assert_eq!(service.state(), EntitlementState::Free);
        assert!(!service.restore().await.unwrap().restored);
    }

    #[tokio::test]
    async fn test_cancel_returns_to_free() {
        let (service, _) = service();
        service.initialize("user_1").unwrap();
        service.purchase(PACKAGE_AI_MENTOR_MONTHLY).await.unwrap();

        let outcome = service.cancel().await.unwrap();

        assert!(outcome.was_active);
        assert!(!service.is_premium_active());
        assert!(!service.has_feature(features::HUMAN_MENTOR));
        assert!(!service.has_feature(features::AI_MENTOR));
        assert!(service.has_feature(features::BASIC_PROFILE));
        assert_eq!(service.subscription_status().days_left, None);
        assert_eq!(service.state(), EntitlementState::Free);

        let again = service.cancel().await.unwrap();
        assert!(!again.was_active);
    }

    #[tokio::test]
    async fn test_expired_window_keeps_flag_but_denies_access() {
        let (service, clock) = service();
        service.initialize("user_1").unwrap();
        service.purchase(PACKAGE_HUMAN_MENTOR_MONTHLY).await.unwrap();

        clock.advance(Duration::days(31));

        assert!(!service.is_premium_active());
        assert!(!service.has_feature(features::UNLIMITED_STORAGE));
        // explicitly granted ids still pass
        assert!(service.has_feature(features::HUMAN_MENTOR));

        let status = service.subscription_status();
        assert!(status.is_premium);
        assert!(!status.is_active);
        assert_eq!(status.days_left, Some(0));
        assert_eq!(service.state(), EntitlementState::Lapsed);
    }

    #[tokio::test]
    async fn test_days_left_counts_down() {
        let (service, clock) = service();
        service.initialize("user_1").unwrap();
        service.purchase(PACKAGE_AI_MENTOR_MONTHLY).await.unwrap();

        clock.advance(Duration::days(10) + Duration::hours(1));
        assert_eq!(service.subscription_status().days_left, Some(20));
    }

    #[tokio::test]
    async fn test_restore_after_reinstall() {
        let (service, _) = service();
        service.initialize("user_1").unwrap();
        let receipt = service.purchase(PACKAGE_AI_MENTOR_MONTHLY).await.unwrap();

        // reinstall: same user, fresh record
        service.initialize("user_1").unwrap();
        assert!(!service.is_premium_active());

        let outcome = service.restore().await.unwrap();
        assert!(outcome.restored);
        assert_eq!(outcome.package_id.as_deref(), Some(PACKAGE_AI_MENTOR_MONTHLY));
        assert_eq!(outcome.expires_at, Some(receipt.expires_at));
        assert!(service.is_premium_active());
    }

    #[tokio::test]
    async fn test_restore_with_nothing_to_restore() {
        let (service, clock) = service();
        service.initialize("user_1").unwrap();
        assert!(!service.restore().await.unwrap().restored);

        service.purchase(PACKAGE_AI_MENTOR_MONTHLY).await.unwrap();
        service.initialize("user_2").unwrap();
        assert!(!service.restore().await.unwrap().restored);

        service.initialize("user_1").unwrap();
        clock.advance(Duration::days(45));
        assert!(!service.restore().await.unwrap().restored);
        assert!(!service.is_premium_active());
    }

    #[tokio::test]
    async fn test_cancel_forgets_ledger_entry() {
        let (service, _) = service();
        service.initialize("user_1").unwrap();
        service.purchase(PACKAGE_AI_MENTOR_MONTHLY).await.unwrap();
        service.cancel().await.unwrap();

        assert!(!service.restore().await.unwrap().restored);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purchase_waits_configured_latency() {
        let service = EntitlementService::new(
            BillingConfig::instant().purchase_latency(Latency::from_millis(1500)),
        );
        service.initialize("user_1").unwrap();

        let started = tokio::time::Instant::now();
        service.purchase(PACKAGE_AI_MENTOR_MONTHLY).await.unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_millis(1500));
    }

    #[test]
    fn test_catalog_passthrough() {
        let (service, _) = service();
        assert_eq!(service.premium_packages().len(), 2);
    }
}

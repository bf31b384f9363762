//! # Billing Configuration
//!
//! Delays and rules for the simulated app-store account.

use medora_core::{Latency, DEFAULT_SUBSCRIPTION_DAYS};

/// Entitlement service configuration.
///
/// ## Example
/// ```rust
/// use medora_billing::BillingConfig;
///
/// let config = BillingConfig::instant().strict_catalog(true);
/// assert!(config.strict_catalog);
/// assert_eq!(config.subscription_days, 30);
/// ```
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Delay before a purchase completes.
    /// Default: 1500ms
    pub purchase_latency: Latency,

    /// Delay before a restore completes.
    /// Default: 1000ms
    pub restore_latency: Latency,

    /// Delay before a cancel completes.
    /// Default: 1000ms
    pub cancel_latency: Latency,

    /// Length of the premium window granted by a purchase.
    /// Default: 30
    pub subscription_days: i64,

    /// Reject package ids outside the catalog.
    /// Default: false (any non-empty id is accepted)
    pub strict_catalog: bool,
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            purchase_latency: Latency::from_millis(1500),
            restore_latency: Latency::from_millis(1000),
            cancel_latency: Latency::from_millis(1000),
            subscription_days: DEFAULT_SUBSCRIPTION_DAYS,
            strict_catalog: false,
        }
    }
}

impl BillingConfig {
    /// Zero latency everywhere (for testing).
    pub fn instant() -> Self {
        BillingConfig {
            purchase_latency: Latency::instant(),
            restore_latency: Latency::instant(),
            cancel_latency: Latency::instant(),
            ..BillingConfig::default()
        }
    }

    /// Sets the purchase latency.
    pub fn purchase_latency(mut self, latency: Latency) -> Self {
        self.purchase_latency = latency;
        self
    }

    /// Sets the restore latency.
    pub fn restore_latency(mut self, latency: Latency) -> Self {
        self.restore_latency = latency;
        self
    }

    /// Sets the cancel latency.
    pub fn cancel_latency(mut self, latency: Latency) -> Self {
        self.cancel_latency = latency;
        self
    }

    /// Sets the premium window length in days.
    pub fn subscription_days(mut self, days: i64) -> Self {
        self.subscription_days = days;
        self
    }

    /// Enables or disables catalog checks on purchase.
    pub fn strict_catalog(mut self, strict: bool) -> Self {
        self.strict_catalog = strict;
        self
    }
}

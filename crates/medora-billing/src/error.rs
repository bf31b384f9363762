//! # Billing Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Billing Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Lifecycle     │  │    Catalog      │  │     Input               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotInitialized │  │  UnknownPackage │  │  Validation             │ │
//! │  │                 │  │  PeriodOutOf-   │  │                         │ │
//! │  │                 │  │    Range        │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medora_core::ValidationError;
use thiserror::Error;

/// Result type alias for billing operations.
pub type BillingResult<T> = Result<T, BillingError>;

/// Entitlement service errors.
#[derive(Debug, Error)]
pub enum BillingError {
    /// `purchase`, `restore` or `cancel` was called before `initialize`.
    #[error("Entitlement service not initialized. Call initialize(user_id) first.")]
    NotInitialized,

    /// Package id is not in the catalog (strict catalog mode only).
    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    /// The configured subscription period cannot be added to the current time.
    #[error("Subscription period of {0} days is out of range")]
    PeriodOutOfRange(i64),

    /// Caller input was rejected before any state was touched.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BillingError::UnknownPackage("gold".to_string()).to_string(),
            "Unknown package: gold"
        );
        assert!(BillingError::NotInitialized
            .to_string()
            .contains("initialize(user_id)"));
    }
}

//! # API Error Type
//!
//! Unified error type for screen commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Medora                                 │
//! │                                                                         │
//! │  Screen                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  await update_health_file(..)                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  ApiResult<T>                                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error?   ─── StoreError::NotFound ──────┐                  │  │
//! │  │         │                                      │                 │  │
//! │  │         ▼                                      ▼                 │  │
//! │  │  Billing Error? ─── BillingError::NotInitialized ── ApiError ──► │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  catch (e) {                                                            │
//! │    // e.code = "NOT_FOUND"                                              │
//! │    // e.message = "No row in health_files where id = 42"                │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medora_billing::BillingError;
use medora_core::{CoreError, ValidationError};
use medora_store::StoreError;
use serde::Serialize;
use ts_rs::TS;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_INITIALIZED",
///   "message": "Entitlement service not initialized. Call initialize(user_id) first."
/// }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No row matched
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Entitlements used before initialize
    NotInitialized,

    /// Purchase rejected
    PaymentError,

    /// Stored data could not be read back
    StorageError,

    /// Anything else
    Internal,
}

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            e @ StoreError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, e.to_string()),
            StoreError::Validation(e) => ApiError::validation(e.to_string()),
            StoreError::Core(e) => ApiError::from(e),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            e @ BillingError::NotInitialized => {
                ApiError::new(ErrorCode::NotInitialized, e.to_string())
            }
            e @ BillingError::UnknownPackage(_) => {
                ApiError::new(ErrorCode::PaymentError, e.to_string())
            }
            e @ BillingError::PeriodOutOfRange(_) => ApiError::internal(e.to_string()),
            BillingError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidRow(reason) => {
                tracing::error!("Stored row could not be decoded: {}", reason);
                ApiError::new(ErrorCode::StorageError, "Stored record is malformed")
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::from(BillingError::NotInitialized);
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["code"], json!("NOT_INITIALIZED"));
    }

    #[test]
    fn test_store_error_mapping() {
        let err = ApiError::from(StoreError::not_found("health_files", "id", &json!("42")));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "No row in health_files where id = 42");

        let err = ApiError::from(StoreError::Validation(ValidationError::Required {
            field: "path".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_core_error_hides_details() {
        let err = ApiError::from(CoreError::InvalidRow("missing field `name`".to_string()));
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("name"));
    }

    #[test]
    fn test_unknown_package_is_payment_error() {
        let err = ApiError::from(BillingError::UnknownPackage("gold".to_string()));
        assert_eq!(err.code, ErrorCode::PaymentError);
        assert_eq!(err.to_string(), "[PaymentError] Unknown package: gold");
    }
}

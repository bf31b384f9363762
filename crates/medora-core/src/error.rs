//! # Error Types
//!
//! Domain-specific error types for medora-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medora-core errors (this file)                                        │
//! │  ├── CoreError        - Row decoding failures                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  medora-store errors                                                   │
//! │  └── StoreError       - NotFound, validation                           │
//! │                                                                         │
//! │  medora-billing errors                                                 │
//! │  └── BillingError     - NotInitialized, UnknownPackage, validation     │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What the screens see (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError/BillingError → ApiError → Screen   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value could not be represented as (or read back from) a row.
    ///
    /// ## When This Occurs
    /// - Serializing a record that is not a JSON object
    /// - Decoding a row into a typed record with missing/mistyped fields
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any state is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., table name with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

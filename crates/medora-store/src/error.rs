//! # Store Error Types
//!
//! Error types for table and bucket operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (medora-core)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds table/field context                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in the app) ← Serialized for the screens                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medora_core::{CoreError, ValidationError};
use thiserror::Error;

/// Data store operation errors.
///
/// An in-memory store can only fail on bad input or a missing match, but
/// callers still receive a `Result` so a networked backend can slot in.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched an update.
    ///
    /// ## When This Occurs
    /// - The id was deleted by another screen
    /// - The table doesn't exist yet
    #[error("No row in {table} where {field} = {value}")]
    NotFound {
        table: String,
        field: String,
        value: String,
    },

    /// Caller input was rejected before any state was touched.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A record could not be turned into (or read back from) a row.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a table/field/value triple.
    pub fn not_found(
        table: impl Into<String>,
        field: impl Into<String>,
        value: &serde_json::Value,
    ) -> Self {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        StoreError::NotFound {
            table: table.into(),
            field: field.into(),
            value,
        }
    }
}

/// Result type for data store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("health_files", "id", &json!("abc"));
        assert_eq!(err.to_string(), "No row in health_files where id = abc");

        let err = StoreError::not_found("t", "rank", &json!(3));
        assert_eq!(err.to_string(), "No row in t where rank = 3");
    }
}

//! # Validation Module
//!
//! Input validation for the names and ids callers hand to the services.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen form                                                  │
//! │  └── Required fields, immediate feedback                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command / service entry (THIS MODULE)                        │
//! │  ├── Table / field / bucket names                                      │
//! │  ├── Object paths                                                      │
//! │  └── User and package ids, batch sizes                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: In-memory state                                              │
//! │  └── No schema: rows are accepted as-is                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use medora_core::validation::{validate_table_name, validate_batch_size};
//!
//! validate_table_name("health_files").unwrap();
//! validate_batch_size(3, 500).unwrap();
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 63;
const MAX_PATH_LEN: usize = 1024;
const MAX_ID_LEN: usize = 128;

// =============================================================================
// Name Validators
// =============================================================================

/// Validates a table name.
///
/// ## Rules
/// - Must not be empty
/// - At most 63 characters
/// - Lowercase letters, digits and underscores only
///
/// ## Example
/// ```rust
/// use medora_core::validation::validate_table_name;
///
/// assert!(validate_table_name("donation_requests").is_ok());
/// assert!(validate_table_name("").is_err());
/// assert!(validate_table_name("Donation Requests").is_err());
/// ```
pub fn validate_table_name(table: &str) -> ValidationResult<()> {
    validate_identifier("table", table, |c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
    })
}

/// Validates a field name used in a filter, order clause or match.
///
/// Rows are schemaless, so any name a row can carry is accepted here
/// (`bloodType`, `blood-type`, `contact.email`) except names containing
/// whitespace or control characters.
pub fn validate_field_name(field: &str) -> ValidationResult<()> {
    validate_identifier("field", field, |c| !c.is_whitespace() && !c.is_control())
}

/// Validates a storage bucket name.
///
/// ## Rules
/// - Must not be empty
/// - At most 63 characters
/// - Lowercase letters, digits and hyphens only
pub fn validate_bucket(bucket: &str) -> ValidationResult<()> {
    validate_identifier("bucket", bucket, |c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
    })
}

fn validate_identifier(
    field: &str,
    value: &str,
    allowed: impl Fn(char) -> bool,
) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    if !value.chars().all(allowed) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' contains characters that are not allowed", value),
        });
    }

    Ok(())
}

// =============================================================================
// Path Validators
// =============================================================================

/// Validates an object path inside a bucket.
///
/// ## Rules
/// - Must not be empty or start with `/`
/// - At most 1024 characters
/// - No empty, `.` or `..` segments
///
/// ## Example
/// ```rust
/// use medora_core::validation::validate_object_path;
///
/// assert!(validate_object_path("health-files/1705312800000.pdf").is_ok());
/// assert!(validate_object_path("/etc/passwd").is_err());
/// assert!(validate_object_path("a/../b").is_err());
/// ```
pub fn validate_object_path(path: &str) -> ValidationResult<()> {
    if path.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "path".to_string(),
        });
    }

    if path.len() > MAX_PATH_LEN {
        return Err(ValidationError::TooLong {
            field: "path".to_string(),
            max: MAX_PATH_LEN,
        });
    }

    if path.starts_with('/') {
        return Err(ValidationError::InvalidFormat {
            field: "path".to_string(),
            reason: "must be relative to the bucket".to_string(),
        });
    }

    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(ValidationError::InvalidFormat {
            field: "path".to_string(),
            reason: "must not contain empty, '.' or '..' segments".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Id Validators
// =============================================================================

/// Validates a user id passed to the entitlement service.
pub fn validate_user_id(user_id: &str) -> ValidationResult<()> {
    validate_opaque_id("user_id", user_id)
}

/// Validates a package id passed to `purchase`.
pub fn validate_package_id(package_id: &str) -> ValidationResult<()> {
    validate_opaque_id("package_id", package_id)
}

fn validate_opaque_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the number of rows in a single insert call.
///
/// Zero is allowed (the insert is a no-op).
pub fn validate_batch_size(len: usize, max: usize) -> ValidationResult<()> {
    if len > max {
        return Err(ValidationError::OutOfRange {
            field: "rows".to_string(),
            min: 0,
            max: i64::try_from(max).unwrap_or(i64::MAX),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

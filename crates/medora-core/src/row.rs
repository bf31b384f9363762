//! # Table Rows
//!
//! A [`Row`] is a schemaless record: a mapping from field name to JSON value.
//!
//! ## Row Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Row Lifecycle                                   │
//! │                                                                         │
//! │  Screen builds record ──► Row::from_record(&record)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert ──► store assigns `id` (UUID v4) and `created_at` (RFC 3339)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  update ──► Row::merge(patch)  (patched fields overwrite, rest kept)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  query  ──► row.decode::<HealthFile>()                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No schema is enforced: any field may be present on any row.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::{FIELD_CREATED_AT, FIELD_ID};

/// A single record within a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Row(Map::new())
    }

    /// Builds a row from any serializable record.
    ///
    /// ## Returns
    /// * `Ok(Row)` - The record serialized to a JSON object
    /// * `Err(CoreError::InvalidRow)` - The record is not an object (e.g. a bare string)
    pub fn from_record<T: Serialize>(record: &T) -> CoreResult<Self> {
        let value =
            serde_json::to_value(record).map_err(|e| CoreError::InvalidRow(e.to_string()))?;
        Row::try_from(value)
    }

    /// Decodes the row into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> CoreResult<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| CoreError::InvalidRow(e.to_string()))
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Builder-style variant of [`Row::set`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Returns the row's identity field as a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get(FIELD_ID).and_then(Value::as_str)
    }

    /// Returns the row's creation timestamp as stored (RFC 3339).
    pub fn created_at(&self) -> Option<&str> {
        self.0.get(FIELD_CREATED_AT).and_then(Value::as_str)
    }

    /// Equality predicate used by filters, update and delete.
    ///
    /// A missing field never matches, not even `Value::Null`. Numbers match
    /// by value, so a stored `1.0` equals a filter of `1`.
    pub fn matches(&self, field: &str, value: &Value) -> bool {
        self.0.get(field).is_some_and(|v| values_equal(v, value))
    }

    /// Merges `patch` into this row: patched fields overwrite, others stay.
    pub fn merge(&mut self, patch: &Row) {
        for (field, value) in &patch.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }

    /// Number of fields on the row.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Row(map)
    }
}

impl TryFrom<Value> for Row {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Row(map)),
            other => Err(CoreError::InvalidRow(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }
}

impl From<Row> for Value {
    fn from(row: Row) -> Self {
        Value::Object(row.0)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Value Equality
// =============================================================================

/// Equality used by filters and single-field matches.
///
/// Two numbers compare by value (`1 == 1.0`); integers are compared exactly
/// when both fit the same integer type. Everything else is structural.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                match (x.as_f64(), y.as_f64()) {
                    (Some(x), Some(y)) => x == y,
                    _ => false,
                }
            }
        }
        _ => a == b,
    }
}

// =============================================================================
// Value Ordering
// =============================================================================

/// Total order over field values used when a query sorts rows.
///
/// ## Ordering Rules
/// ```text
/// bool < number < string < array < object
/// numbers compare numerically, strings lexicographically
/// (RFC 3339 timestamps therefore sort chronologically)
/// ```
///
/// Missing fields and nulls are handled by the caller (they sort last
/// regardless of direction).
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x.len().cmp(&y.len()),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => rank(a).cmp(&rank(b)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

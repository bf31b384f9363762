//! # Query Options
//!
//! A single explicit value describing a read against one table.
//!
//! ## Why Not a Fluent Chain?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Chained builder objects            One Query value                     │
//! │  ──────────────────────             ───────────────                     │
//! │  from("t")                          Query {                             │
//! │    .select("*")                        table:   "t",                    │
//! │    .eq("type", "blood")                filters: [type = blood],         │
//! │    .order("created_at", desc)          order:   created_at DESC,        │
//! │    .limit(10)                          limit:   10,                     │
//! │                                     }                                   │
//! │  Each step returns a new object    ──► store.query(query).await         │
//! │  with a different set of methods.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The setters on [`Query`] only fill fields of the same struct; nothing is
//! executed until the value is handed to the store.
//!
//! ## Evaluation Order
//! 1. Keep rows matching **every** equality filter
//! 2. If `order` is set, stable-sort by that field (missing/null last)
//! 3. Truncate to `limit`

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::row::{compare_values, Row};

// =============================================================================
// Sort Direction
// =============================================================================

/// Direction of an `order` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest (newest) first.
    #[default]
    Descending,
}

// =============================================================================
// Filter / OrderBy
// =============================================================================

/// Equality predicate: `field == value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

/// Sort clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

// =============================================================================
// Query
// =============================================================================

/// Read options for one table.
///
/// ## Example
/// ```rust
/// use medora_core::query::{Query, SortDirection};
///
/// let q = Query::table("health_files")
///     .order_by("upload_date", SortDirection::Descending);
/// assert!(q.filters.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Table to read from.
    pub table: String,

    /// Equality filters, all of which must match.
    #[serde(default)]
    pub filters: Vec<Filter>,

    /// Optional sort clause.
    #[serde(default)]
    pub order: Option<OrderBy>,

    /// Optional maximum number of rows.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Query {
    /// Starts a query against `table` with no filters, order or limit.
    pub fn table(table: impl Into<String>) -> Self {
        Query {
            table: table.into(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Adds an equality filter.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Sets the sort clause.
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Sets the maximum number of rows.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// True if `row` satisfies every filter.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| row.matches(&f.field, &f.value))
    }

    /// Evaluates the query over a table's rows (in table order).
    pub fn apply<'a, I>(&self, rows: I) -> Vec<Row>
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let mut selected: Vec<Row> = rows
            .into_iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect();

        if let Some(order) = &self.order {
            selected.sort_by(|a, b| compare_field(a, b, order));
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }

        selected
    }
}

/// Compares two rows on the order field; missing/null values sort last.
fn compare_field(a: &Row, b: &Row, order: &OrderBy) -> Ordering {
    let a = a.get(&order.field).filter(|v| !v.is_null());
    let b = b.get(&order.field).filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match order.direction {
            SortDirection::Ascending => compare_values(x, y),
            SortDirection::Descending => compare_values(y, x),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Table Repository
//!
//! Query, insert, update and delete against named in-memory tables.
//!
//! ## Insert Stamping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert("health_files", [a, b])                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  a.id = uuid v4      a.created_at = now (RFC 3339, UTC)                │
//! │  b.id = uuid v4      b.created_at = now                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  table before: [x, y]                                                  │
//! │  table after:  [a, b, x, y]   ← new rows first, relative order kept    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Caller-supplied `id` / `created_at` values are overwritten.

use std::sync::Arc;

use chrono::SecondsFormat;
use medora_core::validation::{validate_batch_size, validate_field_name, validate_table_name};
use medora_core::{Query, Row, FIELD_CREATED_AT, FIELD_ID};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{simulate, StoreState};

/// Repository for table operations.
///
/// ## Usage
/// ```rust,ignore
/// let tables = store.tables();
///
/// // Newest blood requests
/// let rows = tables
///     .query(Query::table("donation_requests").eq("type", "blood").limit(10))
///     .await?;
///
/// // Mark a file as signed
/// tables
///     .update("health_files", Row::new().with("doctor_signed", true), "id", json!(id))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct TableRepository {
    state: Arc<StoreState>,
}

impl TableRepository {
    pub(crate) fn new(state: Arc<StoreState>) -> Self {
        TableRepository { state }
    }

    /// Runs a query.
    ///
    /// ## Semantics
    /// 1. Rows matching every equality filter, in table order
    /// 2. Stable sort by `order` if given (missing / null last)
    /// 3. Truncated to `limit`
    ///
    /// An unknown (but well-formed) table yields an empty result.
    pub async fn query(&self, query: Query) -> StoreResult<Vec<Row>> {
        validate_query(&query)?;
        simulate(self.state.config.select_latency).await;

        let tables = self.state.tables.read().await;
        let rows = match tables.get(&query.table) {
            Some(table) => query.apply(table),
            None => Vec::new(),
        };

        debug!(
            table = %query.table,
            filters = query.filters.len(),
            count = rows.len(),
            "Query returned rows"
        );
        Ok(rows)
    }

    /// Runs a query and returns only its first row.
    pub async fn query_single(&self, query: Query) -> StoreResult<Option<Row>> {
        let rows = self.query(query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Inserts rows, stamping each with a fresh `id` and `created_at`.
    ///
    /// ## Returns
    /// * `Ok(Vec<Row>)` - The created rows, in the order given
    /// * `Err(StoreError::Validation)` - Bad table name or oversized batch
    pub async fn insert(&self, table: &str, rows: Vec<Row>) -> StoreResult<Vec<Row>> {
        validate_table_name(table)?;
        validate_batch_size(rows.len(), self.state.config.max_insert_batch)?;

        if rows.is_empty() {
            debug!(table = %table, "Empty insert, nothing to do");
            return Ok(Vec::new());
        }

        simulate(self.state.config.insert_latency).await;

        let created_at = self
            .state
            .clock
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        let created: Vec<Row> = rows
            .into_iter()
            .map(|mut row| {
                row.set(FIELD_ID, Uuid::new_v4().to_string());
                row.set(FIELD_CREATED_AT, created_at.clone());
                row
            })
            .collect();

        let mut tables = self.state.tables.write().await;
        let entry = tables.entry(table.to_string()).or_default();
        let older = std::mem::take(entry);
        entry.extend(created.iter().cloned());
        entry.extend(older);

        info!(table = %table, count = created.len(), total = entry.len(), "Inserted rows");
        Ok(created)
    }

    /// Merges `patch` into the first row where `field == value`.
    ///
    /// ## Returns
    /// * `Ok(Row)` - The row after the merge
    /// * `Err(StoreError::NotFound)` - Nothing matched; no state changed
    pub async fn update(
        &self,
        table: &str,
        patch: Row,
        field: &str,
        value: Value,
    ) -> StoreResult<Row> {
        validate_table_name(table)?;
        validate_field_name(field)?;
        simulate(self.state.config.update_latency).await;

        let mut tables = self.state.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| row.matches(field, &value)))
            .ok_or_else(|| StoreError::not_found(table, field, &value))?;

        row.merge(&patch);

        debug!(table = %table, field = %field, patched = patch.len(), "Updated row");
        Ok(row.clone())
    }

    /// Removes every row where `field == value`.
    ///
    /// Returns the number of rows removed; zero is not an error, so a
    /// repeated delete is a no-op.
    pub async fn delete(&self, table: &str, field: &str, value: Value) -> StoreResult<usize> {
        validate_table_name(table)?;
        validate_field_name(field)?;
        simulate(self.state.config.delete_latency).await;

        let mut tables = self.state.tables.write().await;
        let removed = match tables.get_mut(table) {
            Some(rows) => {
                let before = rows.len();
                rows.retain(|row| !row.matches(field, &value));
                before - rows.len()
            }
            None => 0,
        };

        debug!(table = %table, field = %field, removed, "Deleted rows");
        Ok(removed)
    }

    /// Number of rows currently in `table` (no latency).
    pub async fn count(&self, table: &str) -> usize {
        let tables = self.state.tables.read().await;
        tables.get(table).map_or(0, Vec::len)
    }
}

fn validate_query(query: &Query) -> StoreResult<()> {
    validate_table_name(&query.table)?;
    for filter in &query.filters {
        validate_field_name(&filter.field)?;
    }
    if let Some(order) = &query.order {
        validate_field_name(&order.field)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use chrono::{DateTime, TimeZone, Utc};
    use medora_core::{Latency, ManualClock, SortDirection, TABLE_DONATION_REQUESTS};
    use serde_json::json;

    use crate::{DataStore, StoreConfig};

    use super::*;

    fn store() -> DataStore {
        DataStore::new(StoreConfig::instant())
    }

    fn request(kind: &str, urgency: &str) -> Row {
        Row::new()
            .with("type", kind)
            .with("urgency", urgency)
            .with("status", "active")
    }

    #[tokio::test]
    async fn test_numeric_filters_match_across_integer_and_float() {
        let store = store();
        let tables = store.tables();
        tables
            .insert("notes", vec![Row::new().with("rank", 1.0), Row::new().with("rank", 2)])
            .await
            .unwrap();

        let rows = tables.query(Query::table("notes").eq("rank", 1)).await.unwrap();
        assert_eq!(rows.len(), 1);

        let updated = tables
            .update("notes", Row::new().with("pinned", true), "rank", json!(2.0))
            .await
            .unwrap();
        assert_eq!(updated.get("pinned"), Some(&json!(true)));

        assert_eq!(tables.delete("notes", "rank", json!(1)).await.unwrap(), 1);
        assert_eq!(tables.count("notes").await, 1);
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids_and_timestamps() {
        let store = store();
        let before = Utc::now();

        let created = store
            .tables()
            .insert(
                TABLE_DONATION_REQUESTS,
                vec![request("blood", "Critical"), request("organ", "High")],
            )
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        let ids: HashSet<_> = created.iter().map(|r| r.id().unwrap().to_string()).collect();
        assert_eq!(ids.len(), 2);

        for row in &created {
            let stamped = DateTime::parse_from_rfc3339(row.created_at().unwrap()).unwrap();
            assert!(stamped.with_timezone(&Utc) <= Utc::now());
            assert!(stamped.with_timezone(&Utc) >= before - chrono::Duration::seconds(1));
        }
    }

    #[tokio::test]
    async fn test_insert_overwrites_caller_id() {
        let store = store();
        let created = store
            .tables()
            .insert("notes", vec![Row::new().with("id", "mine").with("created_at", "x")])
            .await
            .unwrap();

        assert_ne!(created[0].id(), Some("mine"));
        assert_ne!(created[0].created_at(), Some("x"));
    }

    #[tokio::test]
    async fn test_insert_uses_injected_clock() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let store = DataStore::with_clock(StoreConfig::instant(), Arc::new(ManualClock::new(start)));

        let created = store
            .tables()
            .insert("notes", vec![Row::new()])
            .await
            .unwrap();

        assert_eq!(created[0].created_at(), Some("2024-01-15T09:30:00.000Z"));
    }

    #[tokio::test]
    async fn test_insert_prepends_newest_first() {
        let store = store();
        let tables = store.tables();
        tables
            .insert("notes", vec![Row::new().with("n", 1)])
            .await
            .unwrap();
        tables
            .insert("notes", vec![Row::new().with("n", 2), Row::new().with("n", 3)])
            .await
            .unwrap();

        let rows = tables.query(Query::table("notes")).await.unwrap();
        let ns: Vec<_> = rows.iter().map(|r| r.get("n").cloned().unwrap()).collect();
        assert_eq!(ns, vec![json!(2), json!(3), json!(1)]);
    }

    #[tokio::test]
    async fn test_insert_creates_unknown_table() {
        let store = store();
        assert_eq!(store.tables().count("audit_log").await, 0);

        store
            .tables()
            .insert("audit_log", vec![Row::new().with("event", "login")])
            .await
            .unwrap();

        assert_eq!(store.tables().count("audit_log").await, 1);
        assert!(store.table_names().await.contains(&"audit_log".to_string()));
    }

    #[tokio::test]
    async fn test_empty_insert_is_noop() {
        let store = store();
        let created = store.tables().insert("notes", Vec::new()).await.unwrap();
        assert!(created.is_empty());
        assert!(!store.table_names().await.contains(&"notes".to_string()));
    }

    #[tokio::test]
    async fn test_insert_rejects_oversized_batch() {
        let store = DataStore::new(StoreConfig::instant().max_insert_batch(2));
        let result = store
            .tables()
            .insert("notes", vec![Row::new(), Row::new(), Row::new()])
            .await;

        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert_eq!(store.tables().count("notes").await, 0);
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_table_name() {
        let result = store().tables().insert("Bad Name", vec![Row::new()]).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_hyphenated_fields_can_be_matched() {
        let store = store();
        let tables = store.tables();
        tables
            .insert("notes", vec![Row::new().with("blood-type", "O-")])
            .await
            .unwrap();

        let rows = tables
            .query(Query::table("notes").eq("blood-type", "O-"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(tables.delete("notes", "blood-type", json!("O-")).await.unwrap(), 1);

        let result = tables.query(Query::table("notes").eq("blood type", "O-")).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_query_unknown_table_is_empty() {
        let rows = store()
            .tables()
            .query(Query::table("never_created"))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_query_filter_order_limit() {
        let store = store();
        let tables = store.tables();
        tables
            .insert(
                TABLE_DONATION_REQUESTS,
                vec![
                    request("blood", "Critical").with("rank", 1),
                    request("organ", "High").with("rank", 2),
                    request("blood", "Medium").with("rank", 3),
                    request("blood", "High").with("rank", 4),
                ],
            )
            .await
            .unwrap();

        let rows = tables
            .query(
                Query::table(TABLE_DONATION_REQUESTS)
                    .eq("type", "blood")
                    .order_by("rank", SortDirection::Descending)
                    .limit(2),
            )
            .await
            .unwrap();

        let ranks: Vec<_> = rows.iter().map(|r| r.get("rank").cloned().unwrap()).collect();
        assert_eq!(ranks, vec![json!(4), json!(3)]);
    }

    #[tokio::test]
    async fn test_query_limit_bounds() {
        let store = store();
        let tables = store.tables();
        tables
            .insert("notes", (0..5).map(|n| Row::new().with("n", n)).collect())
            .await
            .unwrap();

        for limit in [0, 1, 3, 5, 20] {
            let rows = tables.query(Query::table("notes").limit(limit)).await.unwrap();
            assert_eq!(rows.len(), limit.min(5));
        }
    }

    #[tokio::test]
    async fn test_query_single() {
        let store = store();
        let tables = store.tables();
        let created = tables
            .insert("notes", vec![Row::new().with("n", 1), Row::new().with("n", 2)])
            .await
            .unwrap();
        let id = created[1].id().unwrap().to_string();

        let row = tables
            .query_single(Query::table("notes").eq("id", id.clone()))
            .await
            .unwrap();
        assert_eq!(row.and_then(|r| r.get("n").cloned()), Some(json!(2)));

        let none = tables
            .query_single(Query::table("notes").eq("id", "missing"))
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_update_overwrites_only_patched_fields() {
        let store = store();
        let tables = store.tables();
        let created = tables
            .insert(
                "health_files",
                vec![Row::new()
                    .with("name", "Blood Test Results")
                    .with("doctor_signed", false)
                    .with("size", 1024)],
            )
            .await
            .unwrap();
        let id = created[0].id().unwrap().to_string();

        let updated = tables
            .update(
                "health_files",
                Row::new().with("doctor_signed", true),
                "id",
                json!(id),
            )
            .await
            .unwrap();

        assert_eq!(updated.get("doctor_signed"), Some(&json!(true)));
        assert_eq!(updated.get("name"), Some(&json!("Blood Test Results")));
        assert_eq!(updated.get("size"), Some(&json!(1024)));
        assert_eq!(updated.id(), Some(id.as_str()));
        assert_eq!(updated.created_at(), created[0].created_at());
    }

    #[tokio::test]
    async fn test_update_touches_first_match_only() {
        let store = store();
        let tables = store.tables();
        tables
            .insert(
                "notes",
                vec![
                    Row::new().with("kind", "a").with("n", 1),
                    Row::new().with("kind", "a").with("n", 2),
                ],
            )
            .await
            .unwrap();

        tables
            .update("notes", Row::new().with("seen", true), "kind", json!("a"))
            .await
            .unwrap();

        let rows = tables.query(Query::table("notes")).await.unwrap();
        assert_eq!(rows[0].get("seen"), Some(&json!(true)));
        assert_eq!(rows[1].get("seen"), None);
    }

    #[tokio::test]
    async fn test_update_without_match_is_not_found() {
        let store = store();
        let result = store
            .tables()
            .update("health_files", Row::new().with("name", "x"), "id", json!("nope"))
            .await;

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        assert_eq!(store.tables().count("health_files").await, 0);
    }

    #[tokio::test]
    async fn test_delete_then_query_is_empty_and_idempotent() {
        let store = store();
        let tables = store.tables();
        let created = tables
            .insert("health_files", vec![Row::new().with("name", "Scan")])
            .await
            .unwrap();
        let id = json!(created[0].id().unwrap());

        assert_eq!(tables.delete("health_files", "id", id.clone()).await.unwrap(), 1);

        let rows = tables
            .query(Query::table("health_files").eq("id", id.clone()))
            .await
            .unwrap();
        assert!(rows.is_empty());

        assert_eq!(tables.delete("health_files", "id", id).await.unwrap(), 0);
        assert_eq!(tables.delete("never_created", "id", json!("x")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_all_matches() {
        let store = store();
        let tables = store.tables();
        tables
            .insert(
                "notes",
                vec![
                    Row::new().with("kind", "a"),
                    Row::new().with("kind", "b"),
                    Row::new().with("kind", "a"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(tables.delete("notes", "kind", json!("a")).await.unwrap(), 2);
        assert_eq!(tables.count("notes").await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_waits_configured_latency() {
        let store = DataStore::new(
            StoreConfig::instant().select_latency(Latency::from_millis(300)),
        );

        let started = tokio::time::Instant::now();
        store.tables().query(Query::table("notes")).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_is_invisible_until_latency_elapses() {
        let store = DataStore::new(
            StoreConfig::instant().insert_latency(Latency::from_millis(500)),
        );

        let tables = store.tables();
        let pending = tokio::spawn(async move {
            tables.insert("notes", vec![Row::new()]).await
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.tables().count("notes").await, 0);

        pending.await.unwrap().unwrap();
        assert_eq!(store.tables().count("notes").await, 1);
    }
}

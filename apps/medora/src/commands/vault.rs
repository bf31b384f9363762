//! # Health Vault Commands
//!
//! Upload, list, download, edit and delete the user's medical documents.
//!
//! ## Upload Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User picks "Lipid Panel.pdf" (application/pdf, 245760 bytes)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  storage.upload_file("health-files", "health-files/<millis>-<tag>.pdf")│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  storage.public_url(..) → file_url                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tables.insert("health_files", [{                                      │
//! │      name: "Lipid Panel",      category: "Documents",                  │
//! │      doctor_signed: false,     upload_date: now, ...                   │
//! │  }])                                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Returns the stored HealthFile (with id)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::SecondsFormat;
use medora_core::{Query, Row, SortDirection, BUCKET_HEALTH_FILES, FIELD_ID, TABLE_HEALTH_FILES};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::state::AppState;

/// Category given to uploaded images.
pub const CATEGORY_IMAGING: &str = "Imaging";

/// Category given to every other upload.
pub const CATEGORY_DOCUMENTS: &str = "Documents";

/// A document stored in the health vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthFile {
    pub id: String,
    pub name: String,
    /// MIME type of the uploaded file.
    #[serde(rename = "type")]
    pub mime_type: String,
    #[ts(type = "number")]
    pub size: u64,
    pub upload_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub doctor_signed: bool,
    pub file_url: String,
    pub category: String,
}

/// Fields a user can edit on a stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthFileEdit {
    pub name: String,
    pub description: String,
    pub doctor_signed: bool,
}

/// Record inserted for a new upload (the store adds `id`).
#[derive(Debug, Serialize)]
struct NewHealthFile<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    mime_type: &'a str,
    size: u64,
    upload_date: String,
    description: &'a str,
    doctor_signed: bool,
    file_url: String,
    category: &'a str,
}

/// Lists the vault, most recent upload first.
pub async fn list_health_files(state: &AppState) -> ApiResult<Vec<HealthFile>> {
    let rows = state
        .store()
        .tables()
        .query(Query::table(TABLE_HEALTH_FILES).order_by("upload_date", SortDirection::Descending))
        .await?;

    let files = rows
        .iter()
        .map(Row::decode::<HealthFile>)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = files.len(), "list_health_files");
    Ok(files)
}

/// Uploads a file and records it in the vault.
///
/// ## Arguments
/// * `file_name` - Original file name, e.g. `"X-Ray Chest.jpeg"`
/// * `mime_type` - e.g. `"image/jpeg"`; `image/*` files go under Imaging
/// * `bytes` - File contents
pub async fn upload_health_file(
    state: &AppState,
    file_name: &str,
    mime_type: &str,
    bytes: Vec<u8>,
) -> ApiResult<HealthFile> {
    let display_name = strip_extension(file_name.trim());
    if display_name.is_empty() {
        return Err(ApiError::validation("file name is required"));
    }

    let now = state.clock().now();
    let path = object_path(now.timestamp_millis(), file_name.trim());
    let size = bytes.len() as u64;

    let storage = state.store().storage();
    let stored_path = storage
        .upload_file(BUCKET_HEALTH_FILES, &path, bytes)
        .await?;
    let file_url = storage.public_url(BUCKET_HEALTH_FILES, &stored_path);

    let record = NewHealthFile {
        name: display_name,
        mime_type,
        size,
        upload_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        description: "",
        doctor_signed: false,
        file_url,
        category: category_for(mime_type),
    };

    let created = state
        .store()
        .tables()
        .insert(TABLE_HEALTH_FILES, vec![Row::from_record(&record)?])
        .await?;

    let file = created
        .first()
        .ok_or_else(|| ApiError::internal("insert returned no rows"))?
        .decode::<HealthFile>()?;

    info!(id = %file.id, path = %stored_path, size, "Health file uploaded");
    Ok(file)
}

/// Reads back the uploaded bytes of a stored file.
///
/// Files without an uploaded object (sample records) report `NOT_FOUND`.
pub async fn download_health_file(state: &AppState, id: &str) -> ApiResult<Vec<u8>> {
    let row = state
        .store()
        .tables()
        .query_single(Query::table(TABLE_HEALTH_FILES).eq(FIELD_ID, id))
        .await?
        .ok_or_else(|| {
            ApiError::new(ErrorCode::NotFound, format!("No health file with id {}", id))
        })?;
    let file = row.decode::<HealthFile>()?;

    let storage = state.store().storage();
    let bucket_root = storage.public_url(BUCKET_HEALTH_FILES, "");
    let bytes = match file.file_url.strip_prefix(&bucket_root) {
        Some(path) => storage.object(BUCKET_HEALTH_FILES, path).await,
        None => None,
    };

    debug!(id = %id, found = bytes.is_some(), "download_health_file");
    bytes.ok_or_else(|| {
        ApiError::new(ErrorCode::NotFound, format!("No uploaded contents for health file {}", id))
    })
}

/// Saves edits to a stored file.
pub async fn update_health_file(
    state: &AppState,
    id: &str,
    edit: HealthFileEdit,
) -> ApiResult<HealthFile> {
    let patch = Row::from_record(&edit)?;
    let row = state
        .store()
        .tables()
        .update(TABLE_HEALTH_FILES, patch, FIELD_ID, Value::from(id))
        .await?;

    debug!(id = %id, "update_health_file");
    Ok(row.decode()?)
}

/// Deletes a stored file's record. Returns how many records were removed.
pub async fn delete_health_file(state: &AppState, id: &str) -> ApiResult<usize> {
    let removed = state
        .store()
        .tables()
        .delete(TABLE_HEALTH_FILES, FIELD_ID, Value::from(id))
        .await?;

    debug!(id = %id, removed, "delete_health_file");
    Ok(removed)
}

/// Vault category for a MIME type.
pub fn category_for(mime_type: &str) -> &'static str {
    if mime_type.starts_with("image/") {
        CATEGORY_IMAGING
    } else {
        CATEGORY_DOCUMENTS
    }
}

/// Object path for an upload: upload time plus a random tag, so two uploads
/// in the same millisecond never share an object.
fn object_path(millis: i64, file_name: &str) -> String {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}-{}.{}",
        BUCKET_HEALTH_FILES,
        millis,
        &tag[..8],
        extension(file_name)
    )
}

/// Drops a trailing `.ext` (the part after the last dot, if it has no `/`).
fn strip_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => file_name,
    }
}

/// The part after the last dot, or the whole name if there is no dot.
fn extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_for() {
        assert_eq!(category_for("image/png"), CATEGORY_IMAGING);
        assert_eq!(category_for("application/pdf"), CATEGORY_DOCUMENTS);
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("Blood Test Results.pdf"), "Blood Test Results");
        assert_eq!(strip_extension("scan.final.png"), "scan.final");
        assert_eq!(strip_extension("README"), "README");
        assert_eq!(strip_extension("trailing."), "trailing.");
    }

    #[test]
    fn test_object_path_is_unique_per_upload() {
        let first = object_path(1_705_312_800_000, "scan.png");
        let second = object_path(1_705_312_800_000, "scan.png");

        assert!(first.starts_with("health-files/1705312800000-"));
        assert!(first.ends_with(".png"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("scan.final.png"), "png");
        assert_eq!(extension("README"), "README");
    }
}

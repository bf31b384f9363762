//! # Optimistic Fallback
//!
//! The screens stay usable when a command fails: they log the error and show
//! local data instead. That policy lives here, outside the services, so the
//! services themselves always report failures.
//!
//! ```rust,ignore
//! let files = or_fallback(
//!     list_health_files(&state).await,
//!     "list_health_files",
//!     demo::demo_health_files,
//! );
//! ```

use tracing::warn;

use crate::error::ApiResult;

/// Returns the command's value, or logs the failure and returns `fallback()`.
pub fn or_fallback<T>(result: ApiResult<T>, command: &str, fallback: impl FnOnce() -> T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(command = %command, code = ?err.code, "Command failed, using fallback: {}", err.message);
            fallback()
        }
    }
}

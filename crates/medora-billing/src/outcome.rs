//! Results of the asynchronous store-account operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Returned by a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub user_id: String,
    pub package_id: String,
    #[ts(as = "String")]
    pub purchased_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub expires_at: DateTime<Utc>,
}

/// Returned by `restore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RestoreOutcome {
    /// True if an unexpired purchase was found and re-applied.
    pub restored: bool,

    /// Package that was restored.
    pub package_id: Option<String>,

    /// End of the restored premium window.
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl RestoreOutcome {
    pub(crate) fn nothing() -> Self {
        RestoreOutcome {
            restored: false,
            package_id: None,
            expires_at: None,
        }
    }
}

/// Returned by `cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CancelOutcome {
    /// Whether premium was active right before the cancel.
    pub was_active: bool,
}

//! # Donation Hub Commands
//!
//! Browse open donation requests, post a new one, or answer one as a donor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tabs: [Blood] [Organ] [Plasma] [Hair] [Equipment]                     │
//! │                                                                         │
//! │  list_donation_requests(Blood)                                          │
//! │    → donation_requests WHERE type = 'blood'                             │
//! │      ORDER BY created_at DESC LIMIT 10                                  │
//! │                                                                         │
//! │  submit_donation_request(Blood, form)                                   │
//! │    → insert { status: 'active', distance: '0 km', ... }                 │
//! │                                                                         │
//! │  respond_to_request(request_id, donor_id)                               │
//! │    → donation_matches insert { status: 'pending' }                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use medora_core::{
    Query, Row, SortDirection, ValidationError, FIELD_CREATED_AT, TABLE_DONATION_MATCHES,
    TABLE_DONATION_REQUESTS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Requests shown per tab.
pub const REQUESTS_PER_PAGE: usize = 10;

/// What is being donated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DonationKind {
    Blood,
    Organ,
    Plasma,
    Hair,
    Equipment,
}

impl DonationKind {
    pub const ALL: [DonationKind; 5] = [
        DonationKind::Blood,
        DonationKind::Organ,
        DonationKind::Plasma,
        DonationKind::Hair,
        DonationKind::Equipment,
    ];

    /// Value stored in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationKind::Blood => "blood",
            DonationKind::Organ => "organ",
            DonationKind::Plasma => "plasma",
            DonationKind::Hair => "hair",
            DonationKind::Equipment => "equipment",
        }
    }
}

impl fmt::Display for DonationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open donation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DonationRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DonationKind,
    #[serde(default)]
    pub blood_type: Option<String>,
    pub urgency: String,
    pub location: String,
    #[serde(default)]
    pub distance: String,
    pub requester_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: String,
}

/// What the request form collects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequestForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub blood_type: String,
    pub urgency: String,
    pub description: String,
}

/// A donor's answer to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DonationMatch {
    pub id: String,
    pub request_id: String,
    pub donor_id: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
struct NewDonationRequest<'a> {
    #[serde(rename = "type")]
    kind: DonationKind,
    blood_type: Option<&'a str>,
    urgency: &'a str,
    location: &'a str,
    distance: &'a str,
    requester_name: &'a str,
    description: &'a str,
    contact_phone: Option<&'a str>,
    contact_email: Option<&'a str>,
    status: &'a str,
}

/// Newest requests of one kind.
pub async fn list_donation_requests(
    state: &AppState,
    kind: DonationKind,
) -> ApiResult<Vec<DonationRequest>> {
    let query = Query::table(TABLE_DONATION_REQUESTS)
        .eq("type", kind.as_str())
        .order_by(FIELD_CREATED_AT, SortDirection::Descending)
        .limit(REQUESTS_PER_PAGE);

    let rows = state.store().tables().query(query).await?;
    let requests = rows
        .iter()
        .map(Row::decode::<DonationRequest>)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(kind = %kind, count = requests.len(), "list_donation_requests");
    Ok(requests)
}

/// Posts a new request from the form.
///
/// ## Rules
/// - Name and city are required
/// - The poster's own distance is always `0 km`
pub async fn submit_donation_request(
    state: &AppState,
    kind: DonationKind,
    form: DonationRequestForm,
) -> ApiResult<DonationRequest> {
    require("name", &form.name)?;
    require("city", &form.city)?;

    let record = NewDonationRequest {
        kind,
        blood_type: non_empty(&form.blood_type),
        urgency: form.urgency.trim(),
        location: form.city.trim(),
        distance: "0 km",
        requester_name: form.name.trim(),
        description: form.description.trim(),
        contact_phone: non_empty(&form.phone),
        contact_email: non_empty(&form.email),
        status: "active",
    };

    let created = state
        .store()
        .tables()
        .insert(TABLE_DONATION_REQUESTS, vec![Row::from_record(&record)?])
        .await?;

    let request = created
        .first()
        .ok_or_else(|| ApiError::internal("insert returned no rows"))?
        .decode::<DonationRequest>()?;

    info!(id = %request.id, kind = %kind, "Donation request submitted");
    Ok(request)
}

/// Records `donor_id` as a pending match for `request_id`.
pub async fn respond_to_request(
    state: &AppState,
    request_id: &str,
    donor_id: &str,
) -> ApiResult<DonationMatch> {
    require("request_id", request_id)?;
    require("donor_id", donor_id)?;

    let row = Row::new()
        .with("request_id", request_id)
        .with("donor_id", donor_id)
        .with("status", "pending");

    let created = state
        .store()
        .tables()
        .insert(TABLE_DONATION_MATCHES, vec![row])
        .await?;

    let matched = created
        .first()
        .ok_or_else(|| ApiError::internal("insert returned no rows"))?
        .decode::<DonationMatch>()?;

    info!(id = %matched.id, request_id = %request_id, "Donor matched to request");
    Ok(matched)
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_json() {
        for kind in DonationKind::ALL {
            let value = serde_json::to_value(kind).unwrap();
            assert_eq!(value, serde_json::json!(kind.as_str()));
        }
    }

    #[test]
    fn test_form_uses_camel_case() {
        let form: DonationRequestForm = serde_json::from_value(serde_json::json!({
            "name": "Asha", "phone": "", "email": "", "city": "Delhi",
            "bloodType": "O-", "urgency": "Urgent", "description": ""
        }))
        .unwrap();
        assert_eq!(form.blood_type, "O-");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" B+ "), Some("B+"));
    }
}

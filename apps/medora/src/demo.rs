//! # Demo Data
//!
//! Sample records shown when a screen falls back, and optionally seeded
//! into the store at startup (`seed_demo_data = true`).

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use medora_core::{Row, TABLE_DONATION_REQUESTS, TABLE_HEALTH_FILES};
use serde::Serialize;
use tracing::info;

use crate::commands::donation::{DonationKind, DonationRequest};
use crate::commands::vault::{HealthFile, CATEGORY_IMAGING};
use crate::error::ApiResult;
use crate::state::AppState;

/// Rows written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub donation_requests: usize,
    pub health_files: usize,
}

/// The two sample vault documents.
pub fn demo_health_files() -> Vec<HealthFile> {
    vec![
        HealthFile {
            id: "1".to_string(),
            name: "Blood Test Results".to_string(),
            mime_type: "application/pdf".to_string(),
            size: 245_760,
            upload_date: "2024-01-15".to_string(),
            description: "Complete blood count and lipid profile".to_string(),
            doctor_signed: true,
            file_url: "#".to_string(),
            category: "Lab Results".to_string(),
        },
        HealthFile {
            id: "2".to_string(),
            name: "X-Ray Chest".to_string(),
            mime_type: "image/jpeg".to_string(),
            size: 1_048_576,
            upload_date: "2024-01-10".to_string(),
            description: "Routine chest X-ray examination".to_string(),
            doctor_signed: true,
            file_url: "#".to_string(),
            category: CATEGORY_IMAGING.to_string(),
        },
    ]
}

/// The two sample requests for a tab, the second one an hour older.
pub fn demo_donation_requests(kind: DonationKind, now: DateTime<Utc>) -> Vec<DonationRequest> {
    let stamp = |at: DateTime<Utc>| at.to_rfc3339_opts(SecondsFormat::Millis, true);

    vec![
        DonationRequest {
            id: "1".to_string(),
            kind,
            blood_type: Some("B+".to_string()),
            urgency: "Emergency".to_string(),
            location: "AIIMS Delhi".to_string(),
            distance: "2.3 km".to_string(),
            requester_name: "Anonymous Patient".to_string(),
            description: "Urgent blood needed for surgery".to_string(),
            contact_phone: None,
            contact_email: None,
            status: Some("active".to_string()),
            created_at: stamp(now),
        },
        DonationRequest {
            id: "2".to_string(),
            kind,
            blood_type: Some("O+".to_string()),
            urgency: "Routine".to_string(),
            location: "Apollo Hospital".to_string(),
            distance: "5.1 km".to_string(),
            requester_name: "Medical Team".to_string(),
            description: "Regular donation needed".to_string(),
            contact_phone: None,
            contact_email: None,
            status: Some("active".to_string()),
            created_at: stamp(now - Duration::hours(1)),
        },
    ]
}

/// Inserts the sample requests (for every kind) and vault documents.
///
/// The store assigns fresh ids and `created_at` stamps to everything seeded,
/// so the hour gap between a tab's two requests is not kept. Older samples
/// are inserted first, which keeps each tab in the same newest-first order
/// as [`demo_donation_requests`].
pub async fn seed_demo_data(state: &AppState) -> ApiResult<SeedSummary> {
    let now = state.clock().now();

    let mut newer = Vec::new();
    let mut older = Vec::new();
    for kind in DonationKind::ALL {
        for (position, request) in demo_donation_requests(kind, now).iter().enumerate() {
            let row = Row::from_record(request)?;
            if position == 0 {
                newer.push(row);
            } else {
                older.push(row);
            }
        }
    }

    let files = demo_health_files()
        .iter()
        .map(Row::from_record)
        .collect::<Result<Vec<_>, _>>()?;

    let tables = state.store().tables();
    let mut donation_requests = tables.insert(TABLE_DONATION_REQUESTS, older).await?.len();
    donation_requests += tables.insert(TABLE_DONATION_REQUESTS, newer).await?.len();
    let health_files = tables.insert(TABLE_HEALTH_FILES, files).await?.len();

    info!(donation_requests, health_files, "Demo data seeded");
    Ok(SeedSummary {
        donation_requests,
        health_files,
    })
}

//! End-to-end session flows across the vault, donation hub and mentor
//! commands, driven with zero latency and a manual clock.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use medora_core::entitlement::{features, PACKAGE_AI_MENTOR_MONTHLY, PACKAGE_HUMAN_MENTOR_MONTHLY};
use medora_core::ManualClock;
use medora_lib::commands::donation::{
    self, DonationKind, DonationRequestForm, REQUESTS_PER_PAGE,
};
use medora_lib::commands::{mentor, vault};
use medora_lib::demo;
use medora_lib::error::ErrorCode;
use medora_lib::fallback::or_fallback;
use medora_lib::state::AppState;

fn session() -> (AppState, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
    let state = AppState::instant(Arc::new(clock.clone()));
    (state, clock)
}

fn form(name: &str, city: &str) -> DonationRequestForm {
    DonationRequestForm {
        name: name.to_string(),
        city: city.to_string(),
        blood_type: "A+".to_string(),
        urgency: "Urgent".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn vault_upload_edit_delete() {
    let (state, clock) = session();

    let first = vault::upload_health_file(&state, "Lipid Panel.pdf", "application/pdf", vec![0; 64])
        .await
        .unwrap();
    clock.advance(Duration::minutes(5));
    let second = vault::upload_health_file(&state, "Knee MRI.png", "image/png", vec![1; 8])
        .await
        .unwrap();

    assert_eq!(first.name, "Lipid Panel");
    assert_eq!(first.category, vault::CATEGORY_DOCUMENTS);
    assert_eq!(first.size, 64);
    assert!(!first.doctor_signed);
    assert!(first
        .file_url
        .starts_with("https://mock-storage.medora.app/health-files/health-files/"));
    assert_eq!(second.category, vault::CATEGORY_IMAGING);

    let listed = vault::list_health_files(&state).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    let edited = vault::update_health_file(
        &state,
        &first.id,
        vault::HealthFileEdit {
            name: "Lipid Panel (March)".to_string(),
            description: "Fasting".to_string(),
            doctor_signed: true,
        },
    )
    .await
    .unwrap();
    assert_eq!(edited.name, "Lipid Panel (March)");
    assert!(edited.doctor_signed);
    assert_eq!(edited.file_url, first.file_url);

    assert_eq!(vault::delete_health_file(&state, &first.id).await.unwrap(), 1);
    assert_eq!(vault::delete_health_file(&state, &first.id).await.unwrap(), 0);

    let err = vault::update_health_file(
        &state,
        &first.id,
        vault::HealthFileEdit {
            name: "gone".to_string(),
            description: String::new(),
            doctor_signed: false,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(vault::list_health_files(&state).await.unwrap().len(), 1);
}

#[tokio::test]
async fn vault_uploads_in_the_same_instant_stay_separate() {
    let (state, _clock) = session();

    let first = vault::upload_health_file(&state, "scan.png", "image/png", vec![1, 1])
        .await
        .unwrap();
    let second = vault::upload_health_file(&state, "scan.png", "image/png", vec![2, 2, 2])
        .await
        .unwrap();

    assert_ne!(first.file_url, second.file_url);
    assert_eq!(vault::download_health_file(&state, &first.id).await.unwrap(), vec![1, 1]);
    assert_eq!(vault::download_health_file(&state, &second.id).await.unwrap(), vec![2, 2, 2]);
}

#[tokio::test]
async fn vault_download_of_missing_or_sample_file_is_not_found() {
    let (state, _clock) = session();
    demo::seed_demo_data(&state).await.unwrap();

    let sample = vault::list_health_files(&state).await.unwrap().remove(0);
    let err = vault::download_health_file(&state, &sample.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = vault::download_health_file(&state, "no-such-id").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn vault_rejects_blank_file_name() {
    let (state, _clock) = session();

    let err = vault::upload_health_file(&state, "  ", "application/pdf", vec![])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn donation_requests_are_filtered_and_paged() {
    let (state, clock) = session();

    for i in 0..12 {
        clock.advance(Duration::seconds(1));
        donation::submit_donation_request(&state, DonationKind::Blood, form(&format!("Donor {i}"), "Delhi"))
            .await
            .unwrap();
    }
    donation::submit_donation_request(&state, DonationKind::Organ, form("Kidney", "Pune"))
        .await
        .unwrap();

    let blood = donation::list_donation_requests(&state, DonationKind::Blood).await.unwrap();
    assert_eq!(blood.len(), REQUESTS_PER_PAGE);
    assert_eq!(blood[0].requester_name, "Donor 11");
    assert!(blood.iter().all(|r| r.kind == DonationKind::Blood));
    assert!(blood.iter().all(|r| r.distance == "0 km"));
    assert!(blood.iter().all(|r| r.status.as_deref() == Some("active")));

    let organ = donation::list_donation_requests(&state, DonationKind::Organ).await.unwrap();
    assert_eq!(organ.len(), 1);
    assert_eq!(organ[0].location, "Pune");

    let hair = donation::list_donation_requests(&state, DonationKind::Hair).await.unwrap();
    assert!(hair.is_empty());
}

#[tokio::test]
async fn donation_form_requires_name_and_city() {
    let (state, _clock) = session();

    let err = donation::submit_donation_request(&state, DonationKind::Plasma, form("Asha", " "))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = donation::submit_donation_request(&state, DonationKind::Plasma, form("", "Delhi"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn donor_response_is_pending() {
    let (state, _clock) = session();

    let request = donation::submit_donation_request(&state, DonationKind::Blood, form("Ravi", "Mumbai"))
        .await
        .unwrap();
    let matched = donation::respond_to_request(&state, &request.id, "user_donor0001")
        .await
        .unwrap();

    assert_eq!(matched.request_id, request.id);
    assert_eq!(matched.donor_id, "user_donor0001");
    assert_eq!(matched.status, "pending");
    assert_eq!(state.store().tables().count("donation_matches").await, 1);
}

#[tokio::test]
async fn mentor_subscription_lifecycle() {
    let (state, clock) = session();

    let user_id = mentor::initialize_user(&state, Some("user_abc123xyz".to_string())).unwrap();
    assert_eq!(user_id, "user_abc123xyz");
    assert!(mentor::check_feature(&state, features::BASIC_HEALTH_VAULT));
    assert!(!mentor::check_feature(&state, features::HUMAN_MENTOR));
    assert!(!mentor::subscription_status(&state).is_premium);

    let receipt = mentor::purchase_package(&state, PACKAGE_HUMAN_MENTOR_MONTHLY).await.unwrap();
    assert_eq!(receipt.expires_at - receipt.purchased_at, Duration::days(30));

    let status = mentor::subscription_status(&state);
    assert!(status.is_premium && status.is_active);
    assert_eq!(status.days_left, Some(30));
    assert!(mentor::check_feature(&state, features::HUMAN_MENTOR));
    assert!(mentor::check_feature(&state, "anything_at_all"));

    // Re-initializing resets to free; restore brings the purchase back.
    mentor::initialize_user(&state, Some(user_id.clone())).unwrap();
    assert!(!mentor::subscription_status(&state).is_premium);
    clock.advance(Duration::days(10));
    let restored = mentor::restore_purchases(&state).await.unwrap();
    assert!(restored.restored);
    assert_eq!(mentor::subscription_status(&state).days_left, Some(20));

    let cancelled = mentor::cancel_subscription(&state).await.unwrap();
    assert!(cancelled.was_active);
    assert!(!mentor::check_feature(&state, features::HUMAN_MENTOR));
    assert!(!mentor::restore_purchases(&state).await.unwrap().restored);
}

#[tokio::test]
async fn premium_lapses_after_expiry() {
    let (state, clock) = session();
    mentor::initialize_user(&state, None).unwrap();

    mentor::purchase_package(&state, PACKAGE_AI_MENTOR_MONTHLY).await.unwrap();
    clock.advance(Duration::days(31));

    let status = mentor::subscription_status(&state);
    assert!(status.is_premium);
    assert!(!status.is_active);
    assert_eq!(status.days_left, Some(0));
    assert!(!mentor::check_feature(&state, "anything_at_all"));
}

#[tokio::test]
async fn purchase_before_initialize_is_rejected() {
    let (state, _clock) = session();

    let err = mentor::purchase_package(&state, PACKAGE_HUMAN_MENTOR_MONTHLY)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotInitialized);
    assert!(!mentor::check_feature(&state, features::BASIC_PROFILE));
}

#[tokio::test]
async fn generated_user_ids_look_right() {
    let (state, _clock) = session();

    let user_id = mentor::initialize_user(&state, None).unwrap();
    assert!(user_id.starts_with("user_"));
    assert_eq!(user_id.len(), 14);
    assert_eq!(mentor::premium_packages(&state).len(), 2);
}

#[tokio::test]
async fn demo_seed_fills_every_tab() {
    let (state, _clock) = session();

    let summary = demo::seed_demo_data(&state).await.unwrap();
    assert_eq!(summary.donation_requests, 10);
    assert_eq!(summary.health_files, 2);

    for kind in DonationKind::ALL {
        let requests = donation::list_donation_requests(&state, kind).await.unwrap();
        assert_eq!(requests.len(), 2, "{kind}");
        assert_eq!(requests[0].requester_name, "Anonymous Patient");
        assert_eq!(requests[1].requester_name, "Medical Team");
    }
    assert_eq!(vault::list_health_files(&state).await.unwrap().len(), 2);
}

#[tokio::test]
async fn failed_listing_falls_back_to_demo_data() {
    let (state, _clock) = session();
    let now = state.clock().now();

    let result = mentor::purchase_package(&state, PACKAGE_AI_MENTOR_MONTHLY)
        .await
        .map(|_| Vec::new());
    let shown = or_fallback(result, "purchase_package", || {
        demo::demo_donation_requests(DonationKind::Blood, now)
    });
    assert_eq!(shown.len(), 2);
}

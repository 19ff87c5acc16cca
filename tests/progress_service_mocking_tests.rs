//! Progress service mocking tests
//!
//! These tests use wiremock to create deterministic HTTP mocking for the
//! progress service, eliminating network dependencies and exercising the
//! full presenter → client → wire path.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drivedesk::{
    AdvanceInput, InstructorDetails, LicenseType, NextAction, ProgressClient, ProgressStatus,
    RateLimitedApiClient, TransitionKind, WorkflowError, WorkflowPresenter,
};

fn client_for(server: &MockServer) -> ProgressClient {
    // Generous quota so rate limiting never slows the test run.
    ProgressClient::new(server.uri(), RateLimitedApiClient::new(6000, 100).unwrap())
}

fn record_body(user_id: &str, status: &str) -> serde_json::Value {
    json!({ "data": { "user_id": user_id, "status": status } })
}

#[tokio::test]
async fn learning_test_passed_offers_set_license_ready_and_sends_exact_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/progress/learning/U1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U1", "test_passed")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Exact body: the target status from the table plus the one required
    // field, nothing else.
    Mock::given(method("PUT"))
        .and(path("/progress/learning"))
        .and(body_json(json!({
            "user_id": "U1",
            "status": "license_ready",
            "license_download_link": "https://cdn.example/license-u1.pdf"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/progress/learning/U1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "user_id": "U1",
                "status": "license_ready",
                "license_download_link": "https://cdn.example/license-u1.pdf"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut presenter = WorkflowPresenter::new(client_for(&server), LicenseType::Learning, "U1");
    presenter.fetch().await.unwrap();
    assert_eq!(
        presenter.offered_action(),
        Some(NextAction::Advance(TransitionKind::SetLicenseReady))
    );

    presenter
        .advance(AdvanceInput::SetLicenseReady {
            license_download_link: "https://cdn.example/license-u1.pdf".to_string(),
        })
        .await
        .unwrap();

    // The re-read after the write is what the presenter now holds.
    assert_eq!(
        presenter.record().unwrap().status,
        ProgressStatus::LicenseReady
    );
    assert_eq!(
        presenter.download_link(),
        Some("https://cdn.example/license-u1.pdf")
    );
}

#[tokio::test]
async fn driving_test_passed_dispatches_with_tracking_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/progress/driving/U2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U2", "test_passed")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/progress/driving"))
        .and(body_json(json!({
            "user_id": "U2",
            "status": "dispatched",
            "tracking_id": "TRK-83"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/progress/driving/U2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U2", "dispatched")))
        .mount(&server)
        .await;

    let mut presenter = WorkflowPresenter::new(client_for(&server), LicenseType::Driving, "U2");
    presenter.fetch().await.unwrap();
    assert_eq!(
        presenter.offered_action(),
        Some(NextAction::Advance(TransitionKind::DispatchLicense))
    );

    presenter
        .advance(AdvanceInput::DispatchLicense {
            tracking_id: "TRK-83".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(
        presenter.record().unwrap().status,
        ProgressStatus::Dispatched
    );
    assert_eq!(
        presenter.offered_action(),
        Some(NextAction::Advance(TransitionKind::MarkDelivered))
    );
}

#[tokio::test]
async fn rebook_slot_carries_fee_flag_and_minute_precision_datetime() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/progress/driving/U3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U3", "test_failed")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/progress/driving"))
        .and(body_json(json!({
            "user_id": "U3",
            "status": "slot_booked",
            "slot_datetime": "2026-03-14T10:30",
            "retest_fee_paid": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/progress/driving/U3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U3", "slot_booked")))
        .mount(&server)
        .await;

    let mut presenter = WorkflowPresenter::new(client_for(&server), LicenseType::Driving, "U3");
    presenter.fetch().await.unwrap();

    let slot = chrono::NaiveDate::from_ymd_opt(2026, 3, 14)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    presenter
        .advance(AdvanceInput::RebookSlot {
            slot_datetime: slot,
        })
        .await
        .unwrap();

    assert_eq!(
        presenter.offered_action(),
        Some(NextAction::Advance(TransitionKind::AssignInstructor))
    );
}

#[tokio::test]
async fn instructor_assignment_nests_details_in_the_wire_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/progress/learning/U4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U4", "slot_booked")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/progress/learning"))
        .and(body_json(json!({
            "user_id": "U4",
            "status": "test_pending",
            "instructor_details": {
                "name": "R. Kher",
                "vehicle_no": "MH12 AB 3456",
                "destination": "Ring road circuit"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/progress/learning/U4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U4", "test_pending")))
        .mount(&server)
        .await;

    let mut presenter = WorkflowPresenter::new(client_for(&server), LicenseType::Learning, "U4");
    presenter.fetch().await.unwrap();
    presenter
        .advance(AdvanceInput::AssignInstructor {
            instructor: InstructorDetails {
                name: "R. Kher".to_string(),
                vehicle_no: "MH12 AB 3456".to_string(),
                destination: "Ring road circuit".to_string(),
            },
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn read_failure_clears_the_record_and_the_presenter_stays_usable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/progress/learning/U5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U5", "processing")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/progress/learning/U5"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "database offline" })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/progress/learning/U5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U5", "processing")))
        .mount(&server)
        .await;

    let mut presenter = WorkflowPresenter::new(client_for(&server), LicenseType::Learning, "U5");
    presenter.fetch().await.unwrap();
    assert!(presenter.record().is_some());

    let err = presenter.fetch().await.unwrap_err();
    assert!(matches!(err, WorkflowError::ServiceRead(_)));
    assert_eq!(err.service_message(), Some("database offline"));
    assert!(presenter.record().is_none());

    // Retry succeeds without rebuilding anything.
    presenter.fetch().await.unwrap();
    assert!(presenter.record().is_some());
}

#[tokio::test]
async fn write_failure_preserves_the_record_and_skips_the_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/progress/learning/U6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U6", "test_pending")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/progress/learning"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "transition refused" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut presenter = WorkflowPresenter::new(client_for(&server), LicenseType::Learning, "U6");
    presenter.fetch().await.unwrap();

    let err = presenter
        .advance(AdvanceInput::MarkPassed)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::ServiceWrite(_)));
    assert_eq!(err.service_message(), Some("transition refused"));
    assert_eq!(
        presenter.record().unwrap().status,
        ProgressStatus::TestPending
    );

    // The single expected GET proves no refetch happened after the failure.
    server.verify().await;
}

#[tokio::test]
async fn empty_user_id_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut presenter = WorkflowPresenter::new(client_for(&server), LicenseType::Learning, "  ");
    let err = presenter.fetch().await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    server.verify().await;
}

#[tokio::test]
async fn unrecognized_status_degrades_to_no_action() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/progress/driving/U7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("U7", "unknown_value")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut presenter = WorkflowPresenter::new(client_for(&server), LicenseType::Driving, "U7");
    presenter.fetch().await.unwrap();

    assert_eq!(presenter.offered_action(), Some(NextAction::Unavailable));
    let err = presenter
        .advance(AdvanceInput::MarkDelivered)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NoActionAvailable { .. }));

    server.verify().await;
}

#[tokio::test]
async fn missing_record_reads_as_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/learning/U8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    let mut presenter = WorkflowPresenter::new(client_for(&server), LicenseType::Learning, "U8");
    let fetched = presenter.fetch().await.unwrap();
    assert!(fetched.is_none());
    assert_eq!(presenter.offered_action(), None);
}

#[tokio::test]
async fn malformed_body_is_a_recoverable_read_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/learning/U9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let mut presenter = WorkflowPresenter::new(client_for(&server), LicenseType::Learning, "U9");
    let err = presenter.fetch().await.unwrap_err();
    assert!(matches!(err, WorkflowError::ServiceRead(_)));
    assert!(presenter.record().is_none());
}

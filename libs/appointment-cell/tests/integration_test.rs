use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::router::appointment_routes;
use shared_utils::test_utils::{MockServiceResponses, TestEndpoints};

fn create_test_app(base_url: &str) -> Router {
    appointment_routes(TestEndpoints::all(base_url).to_arc())
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_list_appointments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rdv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockServiceResponses::appointment_response(1, "P001", "Amel Cherif", "2025-01-10", "pending"),
            MockServiceResponses::appointment_response(2, "P002", "Karim Saidi", "2025-03-02", "completed"),
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert_eq!(json_response["total"], 2);
    // Most recent first.
    assert_eq!(json_response["appointments"][0]["date"], "2025-03-02");
}

#[tokio::test]
async fn test_create_appointment_without_patient_fails_before_any_network_call() {
    let mock_server = MockServer::start().await;

    // The appointment service must never be contacted.
    Mock::given(method("POST"))
        .and(path("/api/rdv"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({
                "date": "2030-09-01",
                "time": "10:30"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json_response = body_json(response).await;
    assert!(json_response["error"]
        .as_str()
        .unwrap()
        .contains("patient"));
}

#[tokio::test]
async fn test_create_appointment_rejects_past_date() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server.uri());

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({
                "patient_id": "P001",
                "patient_name": "Amel Cherif",
                "date": "2020-01-01",
                "time": "10:30"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_appointment_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rdv"))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockServiceResponses::appointment_response(5, "P001", "Amel Cherif", "2030-09-01", "pending"),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({
                "patient_id": "P001",
                "patient_name": "Amel Cherif",
                "doctor_id": 1,
                "doctor_name": "Dr. Benali",
                "date": "2030-09-01",
                "time": "10:30",
                "reason": "Consultation"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert_eq!(json_response["id"], "5");
    assert_eq!(json_response["status"], "pending");
}

#[tokio::test]
async fn test_update_completed_appointment_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rdv/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockServiceResponses::appointment_response(2, "P002", "Karim Saidi", "2025-03-02", "completed"),
        ))
        .mount(&mock_server)
        .await;

    // No mutation may reach the owning service.
    Mock::given(method("PUT"))
        .and(path("/api/rdv/2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let response = app
        .oneshot(json_request("PUT", "/2", json!({"reason": "Changed"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_rejects_invalid_transition() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rdv/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockServiceResponses::appointment_response(3, "P001", "Amel Cherif", "2025-01-10", "pending"),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/rdv/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    // pending -> completed skips in_progress.
    let response = app
        .oneshot(json_request("PUT", "/3", json!({"status": "completed"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_allows_cancellation_of_pending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rdv/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockServiceResponses::appointment_response(4, "P001", "Amel Cherif", "2025-01-10", "pending"),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/rdv/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockServiceResponses::appointment_response(4, "P001", "Amel Cherif", "2025-01-10", "cancelled"),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let response = app
        .oneshot(json_request("PUT", "/4", json!({"status": "cancelled"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert_eq!(json_response["status"], "cancelled");
}

#[tokio::test]
async fn test_update_surfaces_owning_service_rejection_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rdv/6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockServiceResponses::appointment_response(6, "P001", "Amel Cherif", "2025-01-10", "in_progress"),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/rdv/6"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            MockServiceResponses::error_response("Cannot modify terminated appointment"),
        ))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let response = app
        .oneshot(json_request("PUT", "/6", json!({"status": "cancelled"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json_response = body_json(response).await;
    assert_eq!(json_response["error"], "Cannot modify terminated appointment");
}

#[tokio::test]
async fn test_last_visit_picks_most_recent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rdv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockServiceResponses::appointment_response(1, "P001", "Amel Cherif", "2025-01-10", "completed"),
            MockServiceResponses::appointment_response(2, "P001", "Amel Cherif", "2025-03-02", "completed"),
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/patient/P001/last")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert_eq!(json_response["last_visit"]["date"], "2025-03-02");
}

#[tokio::test]
async fn test_last_visit_without_history_is_null_not_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rdv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/patient/P999/last")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert!(json_response["last_visit"].is_null());
}

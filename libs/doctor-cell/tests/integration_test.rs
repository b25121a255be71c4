use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::router::doctor_routes;
use shared_utils::test_utils::{MockServiceResponses, TestEndpoints};

fn create_test_app(base_url: &str) -> Router {
    doctor_routes(TestEndpoints::all(base_url).to_arc())
}

#[tokio::test]
async fn test_list_doctors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockServiceResponses::doctor_response(1, "Dr. Benali", "Médecine Générale"),
            MockServiceResponses::doctor_response(2, "Dr. Meziane", "Pédiatrie"),
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["total"], 2);
    // Numeric upstream ids are normalized to strings.
    assert_eq!(json_response["doctors"][0]["id"], "1");
    assert_eq!(json_response["doctors"][1]["specialty"], "Pédiatrie");
}

#[tokio::test]
async fn test_list_doctors_unreachable_directory_degrades_to_empty() {
    let app = create_test_app("http://127.0.0.1:1");

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["total"], 0);
}

#[tokio::test]
async fn test_get_doctor_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/doctors/99"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(MockServiceResponses::error_response("Resource not found")),
        )
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server.uri());

    let request = Request::builder()
        .method("GET")
        .uri("/99")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

mod support;

use axum::http::StatusCode;
use serde_json::json;

use gymdesk::bootstrap_admin;
use support::{TestApp, body_json, body_text, test_config};

#[tokio::test]
async fn health_and_readiness_report_ok() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");

    let response = app.get("/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_expose_request_counters() {
    let app = TestApp::new();
    app.get("/rest/gym/", None).await;

    let response = app.get("/metrics", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("gymdesk_http_requests"));
}

#[tokio::test]
async fn bootstrap_admin_token_grants_superuser_access() {
    let mut config = test_config();
    config.admin_username = Some("root".into());
    config.admin_password = Some("hunter2-but-long".into());
    config.admin_token = Some("fixed-admin-token".into());
    let app = TestApp::with_config(config);
    bootstrap_admin(&app.state).expect("bootstrap");

    let response = app
        .post_json(
            "/rest/gym/",
            Some("fixed-admin-token"),
            json!({"gym_name": "Iron Temple"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn bootstrap_without_admin_config_is_a_no_op() {
    let app = TestApp::new();
    bootstrap_admin(&app.state).expect("bootstrap");
    assert_eq!(app.state.directory().user_count(), 0);
}

use axum::http::StatusCode;
use db::test_utils::setup_test_db;
use tower::ServiceExt;

use crate::helpers::{empty_request, get_json_body, make_app};

#[tokio::test]
async fn health_is_public() {
    let app = make_app(setup_test_db().await);

    let response = app
        .oneshot(empty_request("GET", "/api/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_json_body(response).await;
    assert_eq!(json["data"], "OK");
}

use axum::http::StatusCode;
use db::test_utils::setup_test_db;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::{get_json_body, json_request, make_app, seed_teacher};

#[tokio::test]
async fn register_teacher_then_login() {
    let db = setup_test_db().await;
    let app = make_app(db.clone());

    let payload = json!({
        "firstName": "Maria",
        "lastName": "Santos",
        "userType": "teacher",
        "username": "msantos",
        "password": "secret123",
        "facultyId": "FAC-7"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/register", None, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["userType"], "teacher");

    let login = json!({"username": "msantos", "password": "secret123", "userType": "teacher"});
    let response = app
        .oneshot(json_request("POST", "/api/login", None, &login))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_json_body(response).await;
    assert!(json["data"]["token"].as_str().is_some());
    assert!(json["data"]["expiresAt"].as_str().is_some());
    assert_eq!(json["data"]["user"]["firstName"], "Maria");
    assert_eq!(json["data"]["user"]["userType"], "teacher");
}

#[tokio::test]
async fn register_student_requires_student_fields() {
    let app = make_app(setup_test_db().await);

    let payload = json!({
        "firstName": "Juan",
        "lastName": "Cruz",
        "userType": "student",
        "username": "jcruz",
        "password": "secret123"
    });
    let response = app
        .oneshot(json_request("POST", "/api/register", None, &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_json_body(response).await;
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("Student ID"));
}

#[tokio::test]
async fn register_rejects_short_password_and_bad_type() {
    let app = make_app(setup_test_db().await);

    let short = json!({
        "firstName": "Juan", "lastName": "Cruz", "userType": "student",
        "username": "jcruz", "password": "123", "studentId": "2024-1", "course": "BSIT"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/register", None, &short))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_json_body(response).await;
    assert!(json["message"].as_str().unwrap().contains("at least 6"));

    let admin = json!({
        "firstName": "Juan", "lastName": "Cruz", "userType": "admin",
        "username": "jcruz", "password": "secret123"
    });
    let response = app
        .oneshot(json_request("POST", "/api/register", None, &admin))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let db = setup_test_db().await;
    seed_teacher(&db, "taken").await;
    let app = make_app(db);

    let payload = json!({
        "firstName": "Other",
        "lastName": "Person",
        "userType": "teacher",
        "username": "taken",
        "password": "secret123",
        "facultyId": "FAC-8"
    });
    let response = app
        .oneshot(json_request("POST", "/api/register", None, &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_with_wrong_password_or_table_is_unauthorized() {
    let db = setup_test_db().await;
    seed_teacher(&db, "maria").await;
    let app = make_app(db);

    let wrong = json!({"username": "maria", "password": "nope", "userType": "teacher"});
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/login", None, &wrong))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // teacher credentials do not exist in the student table
    let as_student = json!({"username": "maria", "password": "password123", "userType": "student"});
    let response = app
        .oneshot(json_request("POST", "/api/login", None, &as_student))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

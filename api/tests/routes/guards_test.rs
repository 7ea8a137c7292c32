use api::auth::UserType;
use axum::http::StatusCode;
use db::test_utils::setup_test_db;
use tower::ServiceExt;

use crate::helpers::{empty_request, get_json_body, make_app, seed_student, seed_teacher, token_for};

#[tokio::test]
async fn teacher_routes_require_a_token() {
    let app = make_app(setup_test_db().await);

    let response = app
        .oneshot(empty_request("GET", "/api/teacher/classes", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = get_json_body(response).await;
    assert_eq!(json["message"], "Authentication required");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = make_app(setup_test_db().await);

    let response = app
        .oneshot(empty_request("GET", "/api/student/classes", Some("not.a.jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tokens_only_open_their_own_route_group() {
    let db = setup_test_db().await;
    let teacher = seed_teacher(&db, "maria").await;
    let student = seed_student(&db, "juan", "Cruz").await;
    let app = make_app(db);

    let student_token = token_for(student.id, UserType::Student);
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/teacher/classes", Some(&student_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let teacher_token = token_for(teacher.id, UserType::Teacher);
    let response = app
        .oneshot(empty_request("GET", "/api/student/classes", Some(&teacher_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

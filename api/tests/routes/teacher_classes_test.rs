use api::auth::UserType;
use axum::http::StatusCode;
use db::models::class;
use db::test_utils::setup_test_db;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::{
    empty_request, get_json_body, json_request, make_app, seed_student, seed_teacher, token_for,
};

#[tokio::test]
async fn create_class_and_list_with_counts() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let s = seed_student(&db, "ana", "Aquino").await;
    let app = make_app(db.clone());
    let token = token_for(t.id, UserType::Teacher);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/teacher/classes",
            Some(&token),
            &json!({"name": "Grade 7 - Rizal", "schedule": "MWF 8:00"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let class_id = get_json_body(response).await["data"]["classId"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/teacher/classes/{class_id}/students"),
            Some(&token),
            &json!({"studentId": s.id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/teacher/classes/{class_id}/students"),
            Some(&token),
            &json!({"studentId": s.id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(empty_request("GET", "/api/teacher/classes", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_json_body(response).await;
    assert_eq!(json["data"][0]["name"], "Grade 7 - Rizal");
    assert_eq!(json["data"][0]["studentCount"], 1);
}

#[tokio::test]
async fn create_class_requires_name_and_schedule() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let app = make_app(db);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/teacher/classes",
            Some(&token_for(t.id, UserType::Teacher)),
            &json!({"name": "", "schedule": "MWF"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn roster_is_hidden_from_other_teachers() {
    let db = setup_test_db().await;
    let owner = seed_teacher(&db, "owner").await;
    let other = seed_teacher(&db, "other").await;
    let c = class::Model::create(&db, owner.id, "Grade 8", "TTh").await.unwrap();
    let app = make_app(db);
    let uri = format!("/api/teacher/classes/{}/students", c.id);

    let response = app
        .clone()
        .oneshot(empty_request("GET", &uri, Some(&token_for(other.id, UserType::Teacher))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(empty_request("GET", &uri, Some(&token_for(owner.id, UserType::Teacher))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(get_json_body(response).await["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn adding_unknown_student_is_not_found() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let c = class::Model::create(&db, t.id, "Grade 8", "TTh").await.unwrap();
    let app = make_app(db);

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/teacher/classes/{}/students", c.id),
            Some(&token_for(t.id, UserType::Teacher)),
            &json!({"studentId": 4040}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_update_validates_email() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let app = make_app(db);
    let token = token_for(t.id, UserType::Teacher);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/teacher/profile/update",
            Some(&token),
            &json!({"email": "not-an-email"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/teacher/profile/update",
            Some(&token),
            &json!({"email": "maria@school.ph", "phone": "0917 000 0000"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_json_body(response).await;
    assert_eq!(json["data"]["email"], "maria@school.ph");
    assert_eq!(json["data"]["hasProfilePicture"], false);
}

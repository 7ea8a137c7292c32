use api::auth::UserType;
use axum::http::StatusCode;
use db::models::{subject, subject_attendance_record, subject_student};
use db::test_utils::setup_test_db;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::{
    empty_request, get_json_body, json_request, make_app, seed_student, seed_teacher, token_for,
};

#[tokio::test]
async fn create_subject_and_generate_key() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let app = make_app(db);
    let token = token_for(t.id, UserType::Teacher);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/teacher/subjects",
            Some(&token),
            &json!({"subjectCode": "SCI7", "description": "Science", "schedule": "MWF 10:00"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let subject_id = get_json_body(response).await["data"]["subjectId"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(empty_request(
            "POST",
            &format!("/api/teacher/subjects/{subject_id}/generate-key"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let key = get_json_body(response).await["data"]["keyCode"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(key.len(), 6);

    let response = app
        .oneshot(empty_request("GET", "/api/teacher/subjects", Some(&token)))
        .await
        .unwrap();
    let json = get_json_body(response).await;
    assert_eq!(json["data"][0]["keyCode"], key);
    assert_eq!(json["data"][0]["studentCount"], 0);
}

#[tokio::test]
async fn update_subject_needs_at_least_one_field() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let subj = subject::Model::create(&db, t.id, "SCI7", "Science", "MWF").await.unwrap();
    let app = make_app(db);
    let token = token_for(t.id, UserType::Teacher);
    let uri = format!("/api/teacher/subjects/{}", subj.id);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, Some(&token), &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request("PUT", &uri, Some(&token), &json!({"schedule": "TTh 13:00"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_json_body(response).await;
    assert_eq!(json["data"]["schedule"], "TTh 13:00");
    assert_eq!(json["data"]["subjectCode"], "SCI7");
}

#[tokio::test]
async fn delete_subject_removes_dependents() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let s = seed_student(&db, "ana", "Aquino").await;
    let subj = subject::Model::create(&db, t.id, "SCI7", "Science", "MWF").await.unwrap();
    subject_student::Model::enroll(&db, subj.id, s.id).await.unwrap();
    let app = make_app(db.clone());
    let token = token_for(t.id, UserType::Teacher);

    let mark = json!({"studentId": s.id, "date": "2024-04-10", "status": "present"});
    app.clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/teacher/subjects/{}/attendance", subj.id),
            Some(&token),
            &mark,
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(empty_request(
            "DELETE",
            &format!("/api/teacher/subjects/{}", subj.id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(subject::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(subject_student::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(subject_attendance_record::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn foreign_subject_cannot_be_changed() {
    let db = setup_test_db().await;
    let owner = seed_teacher(&db, "owner").await;
    let other = seed_teacher(&db, "other").await;
    let subj = subject::Model::create(&db, owner.id, "SCI7", "Science", "MWF").await.unwrap();
    let app = make_app(db.clone());
    let token = token_for(other.id, UserType::Teacher);

    for (method, uri) in [
        ("DELETE", format!("/api/teacher/subjects/{}", subj.id)),
        ("POST", format!("/api/teacher/subjects/{}/generate-key", subj.id)),
        ("GET", format!("/api/teacher/subjects/{}/students", subj.id)),
        ("GET", format!("/api/teacher/subjects/{}/attendance", subj.id)),
    ] {
        let response = app
            .clone()
            .oneshot(empty_request(method, &uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{method} {uri}");
    }

    let unchanged = subject::Entity::find_by_id(subj.id).one(&db).await.unwrap().unwrap();
    assert!(unchanged.key_code.is_none());
}

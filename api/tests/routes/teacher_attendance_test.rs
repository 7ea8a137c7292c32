use api::auth::UserType;
use axum::http::StatusCode;
use db::models::{attendance_record, class, class_student, subject, subject_attendance_record};
use db::test_utils::setup_test_db;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::{get_json_body, json_request, make_app, seed_student, seed_teacher, token_for};

#[tokio::test]
async fn bulk_attendance_reports_recorded_count() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let a = seed_student(&db, "ana", "Aquino").await;
    let b = seed_student(&db, "ben", "Bautista").await;
    let c = class::Model::create(&db, t.id, "Grade 7", "MWF").await.unwrap();
    class_student::Model::add(&db, c.id, a.id).await.unwrap();
    class_student::Model::add(&db, c.id, b.id).await.unwrap();
    let app = make_app(db.clone());

    let body = json!({
        "date": "2024-03-01",
        "attendanceRecords": [
            {"studentId": a.id, "status": "present"},
            {"studentId": b.id, "status": "absent", "notes": "fever"}
        ]
    });
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/teacher/classes/{}/attendance", c.id),
            Some(&token_for(t.id, UserType::Teacher)),
            &body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_json_body(response).await;
    assert_eq!(json["data"]["recorded"], 2);
    assert_eq!(json["message"], "2 attendance records recorded");
    assert_eq!(attendance_record::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn bulk_attendance_errors_carry_their_kind() {
    let db = setup_test_db().await;
    let owner = seed_teacher(&db, "owner").await;
    let other = seed_teacher(&db, "other").await;
    let a = seed_student(&db, "ana", "Aquino").await;
    let c = class::Model::create(&db, owner.id, "Grade 7", "MWF").await.unwrap();
    let app = make_app(db.clone());
    let uri = format!("/api/teacher/classes/{}/attendance", c.id);

    let empty = json!({"date": "2024-03-01", "attendanceRecords": []});
    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, Some(&token_for(owner.id, UserType::Teacher)), &empty))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_json_body(response).await["data"]["kind"], "invalid_input");

    let valid = json!({"date": "2024-03-01", "attendanceRecords": [{"studentId": a.id, "status": "present"}]});
    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, Some(&token_for(other.id, UserType::Teacher)), &valid))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(get_json_body(response).await["data"]["kind"], "not_found_or_forbidden");

    let ghost = json!({"date": "2024-03-01", "attendanceRecords": [
        {"studentId": a.id, "status": "present"},
        {"studentId": 987_654, "status": "present"}
    ]});
    let response = app
        .oneshot(json_request("POST", &uri, Some(&token_for(owner.id, UserType::Teacher)), &ghost))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(get_json_body(response).await["data"]["kind"], "recording_failed");

    assert_eq!(attendance_record::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn subject_attendance_created_then_updated() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let s = seed_student(&db, "ana", "Aquino").await;
    let subj = subject::Model::create(&db, t.id, "MATH7", "Mathematics", "TTh").await.unwrap();
    let app = make_app(db.clone());
    let token = token_for(t.id, UserType::Teacher);
    let uri = format!("/api/teacher/subjects/{}/attendance", subj.id);

    let first = json!({"studentId": s.id, "date": "2024-04-10", "status": "present"});
    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, Some(&token), &first))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = get_json_body(response).await;
    assert_eq!(created["data"]["outcome"], "created");

    let second = json!({"studentId": s.id, "date": "2024-04-10", "status": "absent", "notes": "called in sick"});
    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, Some(&token), &second))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = get_json_body(response).await;
    assert_eq!(updated["data"]["outcome"], "updated");
    assert_eq!(updated["data"]["id"], created["data"]["id"]);

    let response = app
        .oneshot(crate::helpers::empty_request(
            "GET",
            &format!("{uri}?date=2024-04-10"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = get_json_body(response).await;
    let rows = listing["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "absent");
    assert_eq!(rows[0]["notes"], "called in sick");
    assert_eq!(rows[0]["lastName"], "Aquino");

    assert_eq!(subject_attendance_record::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn subject_attendance_rejects_unknown_status() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let s = seed_student(&db, "ana", "Aquino").await;
    let subj = subject::Model::create(&db, t.id, "MATH7", "Mathematics", "TTh").await.unwrap();
    let app = make_app(db.clone());

    let body = json!({"studentId": s.id, "date": "2024-04-10", "status": "excused"});
    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/teacher/subjects/{}/attendance", subj.id),
            Some(&token_for(t.id, UserType::Teacher)),
            &body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_json_body(response).await;
    assert_eq!(json["data"]["kind"], "invalid_input");
    assert_eq!(subject_attendance_record::Entity::find().count(&db).await.unwrap(), 0);
}

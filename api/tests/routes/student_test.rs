use api::auth::UserType;
use axum::{
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
};
use db::models::{attendance_record::{self, AttendanceStatus}, class, class_student, subject};
use db::test_utils::setup_test_db;
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;
use util::config::AppConfig;
use util::test_helpers::setup_test_storage_root;

use crate::helpers::{
    empty_request, get_json_body, json_request, make_app, seed_student, seed_teacher, token_for,
};

fn picture_upload(token: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "----attendance-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"avatar\"\r\n",
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/student/profile/upload-picture")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn profile_uses_student_number_as_student_id() {
    let db = setup_test_db().await;
    let s = seed_student(&db, "ana", "Aquino").await;
    let app = make_app(db);

    let response = app
        .oneshot(empty_request("GET", "/api/student/profile", Some(&token_for(s.id, UserType::Student))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_json_body(response).await;
    assert_eq!(json["data"]["studentId"], "2024-ana");
    assert_eq!(json["data"]["lastName"], "Aquino");
    assert_eq!(json["data"]["hasProfilePicture"], false);
}

#[tokio::test]
async fn classes_and_attendance_are_listed_for_the_student() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let s = seed_student(&db, "ana", "Aquino").await;
    let first = class::Model::create(&db, t.id, "Grade 7", "MWF").await.unwrap();
    let second = class::Model::create(&db, t.id, "Homeroom", "Daily").await.unwrap();
    class_student::Model::add(&db, first.id, s.id).await.unwrap();
    class_student::Model::add(&db, second.id, s.id).await.unwrap();
    let app = make_app(db.clone());
    let teacher_token = token_for(t.id, UserType::Teacher);
    let student_token = token_for(s.id, UserType::Student);

    for (class_id, date, status) in [
        (first.id, "2024-03-01", "present"),
        (first.id, "2024-03-04", "late"),
        (second.id, "2024-03-02", "absent"),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/teacher/classes/{class_id}/attendance"),
                Some(&teacher_token),
                &json!({"date": date, "attendanceRecords": [{"studentId": s.id, "status": status}]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/student/classes", Some(&student_token)))
        .await
        .unwrap();
    let classes = get_json_body(response).await;
    assert_eq!(classes["data"].as_array().unwrap().len(), 2);
    assert_eq!(classes["data"][0]["teacher"], "Maria Santos");

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/student/attendance", Some(&student_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let all = get_json_body(response).await;
    let rows = all["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["date"], "2024-03-04");
    assert_eq!(rows[0]["status"], "late");

    let response = app
        .oneshot(empty_request(
            "GET",
            &format!("/api/student/attendance/{}", second.id),
            Some(&student_token),
        ))
        .await
        .unwrap();
    let filtered = get_json_body(response).await;
    let rows = filtered["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["className"], "Homeroom");
    assert_eq!(rows[0]["status"], "absent");

    let stored = attendance_record::Model::count_for_class_date(
        &db,
        first.id,
        chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(stored, 1);
    assert_eq!(AttendanceStatus::Late.to_string(), "late");
}

#[tokio::test]
async fn search_and_enroll_by_key_code() {
    let db = setup_test_db().await;
    let t = seed_teacher(&db, "maria").await;
    let s = seed_student(&db, "ana", "Aquino").await;
    let subj = subject::Model::create(&db, t.id, "SCI7", "Science", "MWF")
        .await
        .unwrap()
        .regenerate_key_code(&db)
        .await
        .unwrap();
    let key = subj.key_code.clone().unwrap();
    let app = make_app(db);
    let token = token_for(s.id, UserType::Student);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/student/subjects/search",
            Some(&token),
            &json!({"key_code": key.to_lowercase()}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_json_body(response).await["data"]["id"], subj.id);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/student/subjects/search",
            Some(&token),
            &json!({"key_code": "ZZZZZZZ"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let enroll = json!({"subjectId": subj.id});
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/student/subjects/enroll", Some(&token), &enroll))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/student/subjects/enroll", Some(&token), &enroll))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/student/subjects/enroll",
            Some(&token),
            &json!({"subjectId": 9999}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("GET", "/api/student/subjects", Some(&token)))
        .await
        .unwrap();
    let json = get_json_body(response).await;
    assert_eq!(json["data"][0]["subjectCode"], "SCI7");
}

#[tokio::test]
async fn qr_code_requires_profile_picture() {
    let db = setup_test_db().await;
    let s = seed_student(&db, "ana", "Aquino").await;
    let app = make_app(db);

    let response = app
        .oneshot(empty_request("GET", "/api/student/qr-code", Some(&token_for(s.id, UserType::Student))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn uploaded_picture_unlocks_qr_code() {
    let _tmp = setup_test_storage_root();
    let db = setup_test_db().await;
    let s = seed_student(&db, "ana", "Aquino").await;
    let app = make_app(db);
    let token = token_for(s.id, UserType::Student);

    let response = app
        .clone()
        .oneshot(picture_upload(&token, "text/plain", b"not an image"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let response = app
        .clone()
        .oneshot(picture_upload(&token, "image/png", &png))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_json_body(response).await["data"]["profilePicture"], "avatar.png");

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/student/profile/picture", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/student/qr-code", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_json_body(response).await;
    assert_eq!(json["data"]["payload"]["studentId"], "2024-ana");
    assert!(json["data"]["imageUrl"].as_str().unwrap().contains("size=200x200"));

    let response = app
        .oneshot(empty_request("DELETE", "/api/student/profile/delete-picture", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    AppConfig::reset();
}

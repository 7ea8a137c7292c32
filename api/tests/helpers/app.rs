#![allow(dead_code)]

use api::auth::{UserType, generate_jwt};
use api::routes::routes;
use axum::{
    Router,
    body::Body,
    http::{Request, header::AUTHORIZATION, header::CONTENT_TYPE},
    response::Response,
};
use db::models::student::{self, NewStudent};
use db::models::teacher::{self, NewTeacher};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use util::state::AppState;

pub fn make_app(db: DatabaseConnection) -> Router {
    Router::new().nest("/api", routes(AppState::new(db)))
}

pub async fn get_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn token_for(id: i64, user_type: UserType) -> String {
    generate_jwt(id, user_type).unwrap().0
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn seed_teacher(db: &DatabaseConnection, username: &str) -> teacher::Model {
    teacher::Model::create(
        db,
        NewTeacher {
            first_name: "Maria",
            middle_name: None,
            last_name: "Santos",
            faculty_id: "FAC-100",
            username,
            password: "password123",
        },
    )
    .await
    .unwrap()
}

pub async fn seed_student(db: &DatabaseConnection, username: &str, last_name: &str) -> student::Model {
    student::Model::create(
        db,
        NewStudent {
            first_name: "Juan",
            middle_name: Some("P"),
            last_name,
            student_number: &format!("2024-{username}"),
            course: "BSCS",
            username,
            password: "password123",
        },
    )
    .await
    .unwrap()
}

//! `/api/teacher/...` routes. Every route requires a teacher token (see `allow_teacher`),
//! and class or subject routes additionally require that the teacher owns the resource.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use util::state::AppState;

use crate::routes::common::MAX_PICTURE_BYTES;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

pub fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get::get_profile))
        .route("/profile/update", post(post::update_profile))
        .route(
            "/profile/upload-picture",
            post(post::upload_picture).layer(DefaultBodyLimit::max(MAX_PICTURE_BYTES + 64 * 1024)),
        )
        .route("/profile/delete-picture", delete(delete::delete_picture))
        .route("/profile/picture", get(get::get_picture))
        .route("/classes", get(get::list_classes).post(post::create_class))
        .route(
            "/classes/{class_id}/students",
            get(get::list_class_students).post(post::add_class_student),
        )
        .route(
            "/classes/{class_id}/attendance",
            post(post::record_class_attendance),
        )
        .route("/subjects", get(get::list_subjects).post(post::create_subject))
        .route(
            "/subjects/{subject_id}",
            put(put::update_subject).delete(delete::delete_subject),
        )
        .route(
            "/subjects/{subject_id}/students",
            get(get::list_subject_students),
        )
        .route(
            "/subjects/{subject_id}/generate-key",
            post(post::generate_key),
        )
        .route(
            "/subjects/{subject_id}/attendance",
            get(get::list_subject_attendance).post(post::record_subject_attendance),
        )
}

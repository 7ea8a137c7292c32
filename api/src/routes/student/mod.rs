//! `/api/student/...` routes, all behind `allow_student`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use util::state::AppState;

use crate::routes::common::MAX_PICTURE_BYTES;

pub mod delete;
pub mod get;
pub mod post;

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get::get_profile))
        .route(
            "/profile/upload-picture",
            post(post::upload_picture).layer(DefaultBodyLimit::max(MAX_PICTURE_BYTES + 64 * 1024)),
        )
        .route("/profile/delete-picture", delete(delete::delete_picture))
        .route("/profile/picture", get(get::get_picture))
        .route("/classes", get(get::list_classes))
        .route("/attendance", get(get::list_attendance))
        .route("/attendance/{class_id}", get(get::list_class_attendance))
        .route("/subjects", get(get::list_subjects))
        .route("/subjects/search", post(post::search_subject))
        .route("/subjects/enroll", post(post::enroll))
        .route("/qr-code", get(get::qr_code))
}

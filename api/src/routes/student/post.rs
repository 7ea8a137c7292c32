use axum::{
    Json,
    extract::{Multipart, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::{student, subject, subject_student};
use sea_orm::{DbErr, EntityTrait, SqlErr};
use serde::{Deserialize, Serialize};
use util::paths::AccountKind;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{ProfilePictureResponse, json_rejection_message, store_profile_picture};

/// POST /api/student/profile/upload-picture
///
/// Multipart upload with a single `file` field (JPEG, PNG or GIF, at most 2 MiB).
pub async fn upload_picture(
    State(app_state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let filename = match store_profile_picture(AccountKind::Student, user.id(), &mut multipart).await {
        Ok(filename) => filename,
        Err((status, message)) => {
            return (status, Json(ApiResponse::<ProfilePictureResponse>::error(message)));
        }
    };

    match student::Model::set_profile_picture(app_state.db(), user.id(), Some(filename.clone())).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ProfilePictureResponse { profile_picture: filename },
                "Profile picture uploaded successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<ProfilePictureResponse>::error(format!("Database error: {e}"))),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchSubjectRequest {
    pub key_code: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubjectMatch {
    pub id: i64,
    pub subject_code: String,
    pub description: String,
    pub schedule: String,
}

/// POST /api/student/subjects/search
///
/// Looks a subject up by its key code (case-insensitive).
///
/// ### Request Body
/// ```json
/// { "key_code": "AB12CD" }
/// ```
pub async fn search_subject(
    State(app_state): State<AppState>,
    payload: Result<Json<SearchSubjectRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<SubjectMatch>::error(json_rejection_message(&rejection))),
            );
        }
    };
    if req.key_code.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<SubjectMatch>::error("Key code is required")),
        );
    }

    match subject::Model::find_by_key_code(app_state.db(), &req.key_code).await {
        Ok(Some(found)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SubjectMatch {
                    id: found.id,
                    subject_code: found.subject_code,
                    description: found.description,
                    schedule: found.schedule,
                },
                "Subject found",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<SubjectMatch>::error("No subject matches this key code")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<SubjectMatch>::error(format!("Database error: {e}"))),
        ),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub subject_id: i64,
}

fn is_duplicate(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// POST /api/student/subjects/enroll
///
/// ### Responses
/// - `201 Created`
/// - `404 Not Found` (unknown subject)
/// - `409 Conflict` (already enrolled)
pub async fn enroll(
    State(app_state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<EnrollRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::error(json_rejection_message(&rejection))),
            );
        }
    };
    let db = app_state.db();

    match subject::Entity::find_by_id(req.subject_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Subject not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
            );
        }
    }

    match subject_student::Model::is_enrolled(db, req.subject_id, user.id()).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::<()>::error("Already enrolled in this subject")),
            );
        }
        Ok(false) => {}
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
            );
        }
    }

    match subject_student::Model::enroll(db, req.subject_id, user.id()).await {
        Ok(_) => {
            tracing::info!("Student {} enrolled in subject {}", user.id(), req.subject_id);
            (
                StatusCode::CREATED,
                Json(ApiResponse::success((), "Enrolled successfully")),
            )
        }
        Err(e) if is_duplicate(&e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error("Already enrolled in this subject")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
        ),
    }
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::teacher;
use sea_orm::EntityTrait;
use services::attendance::authorize_subject;
use util::paths::AccountKind;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, attendance_error};
use crate::routes::common::remove_profile_picture;

/// DELETE /api/teacher/profile/delete-picture
pub async fn delete_picture(State(app_state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    let db = app_state.db();
    let current = match teacher::Entity::find_by_id(user.id()).one(db).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Teacher not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
            );
        }
    };

    let Some(filename) = current.profile_picture else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("No profile picture set")),
        );
    };

    if let Err(e) = remove_profile_picture(AccountKind::Teacher, current.id, &filename).await {
        tracing::error!("Failed to remove picture of teacher {}: {}", current.id, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("Failed to delete profile picture")),
        );
    }

    match teacher::Model::set_profile_picture(db, current.id, None).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Profile picture deleted successfully")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
        ),
    }
}

/// DELETE /api/teacher/subjects/{subject_id}
///
/// Removes the subject with its enrollments and subject attendance.
pub async fn delete_subject(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(subject_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    let owned = match authorize_subject(db, user.id(), subject_id).await {
        Ok(owned) => owned,
        Err(e) => return attendance_error(e).into_response(),
    };

    match owned.delete_with_dependents(db).await {
        Ok(()) => {
            tracing::info!("Teacher {} deleted subject {}", user.id(), subject_id);
            (
                StatusCode::OK,
                Json(ApiResponse::success((), "Subject deleted successfully")),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
        )
            .into_response(),
    }
}

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::student;
use sea_orm::EntityTrait;
use util::paths::AccountKind;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::remove_profile_picture;

/// DELETE /api/student/profile/delete-picture
pub async fn delete_picture(State(app_state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    let db = app_state.db();
    let current = match student::Entity::find_by_id(user.id()).one(db).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Student not found")),
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

    if let Err(e) = remove_profile_picture(AccountKind::Student, current.id, &filename).await {
        tracing::error!("Failed to remove picture of student {}: {}", current.id, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("Failed to delete profile picture")),
        );
    }

    match student::Model::set_profile_picture(db, current.id, None).await {
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

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::subject::{self, SubjectChanges};
use serde::{Deserialize, Serialize};
use services::attendance::authorize_subject;
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, attendance_error};
use crate::routes::common::format_validation_errors;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 32, message = "Subject code must not be empty"))]
    pub subject_code: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Description must not be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Schedule must not be empty"))]
    pub schedule: Option<String>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub id: i64,
    pub subject_code: String,
    pub description: String,
    pub schedule: String,
    pub key_code: Option<String>,
}

impl From<subject::Model> for SubjectResponse {
    fn from(s: subject::Model) -> Self {
        Self {
            id: s.id,
            subject_code: s.subject_code,
            description: s.description,
            schedule: s.schedule,
            key_code: s.key_code,
        }
    }
}

/// PUT /api/teacher/subjects/{subject_id}
///
/// Partial update; at least one of `subjectCode`, `description`, `schedule` is required.
pub async fn update_subject(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(subject_id): Path<i64>,
    Json(req): Json<UpdateSubjectRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<SubjectResponse>::error(format_validation_errors(&e))),
        )
            .into_response();
    }

    let changes = SubjectChanges {
        subject_code: req.subject_code.map(|v| v.trim().to_owned()),
        description: req.description.map(|v| v.trim().to_owned()),
        schedule: req.schedule.map(|v| v.trim().to_owned()),
    };
    if changes.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<SubjectResponse>::error("At least one field must be provided")),
        )
            .into_response();
    }

    let db = app_state.db();
    let owned = match authorize_subject(db, user.id(), subject_id).await {
        Ok(owned) => owned,
        Err(e) => return attendance_error(e).into_response(),
    };

    match owned.apply_changes(db, changes).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SubjectResponse::from(updated),
                "Subject updated successfully",
            )),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<SubjectResponse>::error(format!("Database error: {e}"))),
        )
            .into_response(),
    }
}

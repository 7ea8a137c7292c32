use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::class::{self, ClassSummary};
use db::models::subject::{self, SubjectSummary};
use db::models::subject_attendance_record::SubjectAttendanceRow;
use db::models::teacher;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use services::attendance::{authorize_class, authorize_subject, subject_attendance_for};
use util::paths::AccountKind;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, attendance_error};
use crate::routes::common::{StudentSummary, serve_profile_picture};

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfileResponse {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub faculty_id: String,
    pub username: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub has_profile_picture: bool,
}

impl From<teacher::Model> for TeacherProfileResponse {
    fn from(t: teacher::Model) -> Self {
        Self {
            id: t.id,
            has_profile_picture: t.profile_picture.is_some(),
            first_name: t.first_name,
            middle_name: t.middle_name,
            last_name: t.last_name,
            faculty_id: t.faculty_id,
            username: t.username,
            email: t.email,
            phone: t.phone,
        }
    }
}

/// GET /api/teacher/profile
pub async fn get_profile(State(app_state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    match teacher::Entity::find_by_id(user.id()).one(app_state.db()).await {
        Ok(Some(t)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TeacherProfileResponse::from(t),
                "Profile retrieved successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<TeacherProfileResponse>::error("Teacher not found")),
        ),
        Err(e) => {
            tracing::error!("Failed to load teacher {}: {:?}", user.id(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<TeacherProfileResponse>::error(format!("Database error: {e}"))),
            )
        }
    }
}

/// GET /api/teacher/profile/picture
///
/// Returns the raw image bytes of the teacher's profile picture.
pub async fn get_picture(State(app_state): State<AppState>, user: AuthUser) -> Response {
    match teacher::Entity::find_by_id(user.id()).one(app_state.db()).await {
        Ok(Some(t)) => {
            serve_profile_picture(AccountKind::Teacher, t.id, t.profile_picture.as_deref()).await
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Teacher not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
        )
            .into_response(),
    }
}

/// GET /api/teacher/classes
///
/// Lists the teacher's classes with their roster sizes, ordered by name.
pub async fn list_classes(State(app_state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    match class::Model::summaries_for_teacher(app_state.db(), user.id()).await {
        Ok(classes) => (
            StatusCode::OK,
            Json(ApiResponse::success(classes, "Classes retrieved successfully")),
        ),
        Err(e) => {
            tracing::error!("Failed to list classes of teacher {}: {:?}", user.id(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<ClassSummary>>::error(format!("Database error: {e}"))),
            )
        }
    }
}

/// GET /api/teacher/classes/{class_id}/students
///
/// ### Responses
/// - `200 OK` with the roster ordered by last name, first name
/// - `403 Forbidden` when the class is missing or owned by another teacher
pub async fn list_class_students(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(class_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    if let Err(e) = authorize_class(db, user.id(), class_id).await {
        return attendance_error(e).into_response();
    }

    match class::Model::roster(db, class_id).await {
        Ok(students) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                students.into_iter().map(StudentSummary::from).collect::<Vec<_>>(),
                "Students retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Vec<StudentSummary>>::error(format!("Database error: {e}"))),
        )
            .into_response(),
    }
}

/// GET /api/teacher/subjects
///
/// Lists the teacher's subjects with key codes and enrollment counts, ordered by subject code.
pub async fn list_subjects(State(app_state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    match subject::Model::summaries_for_teacher(app_state.db(), user.id()).await {
        Ok(subjects) => (
            StatusCode::OK,
            Json(ApiResponse::success(subjects, "Subjects retrieved successfully")),
        ),
        Err(e) => {
            tracing::error!("Failed to list subjects of teacher {}: {:?}", user.id(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<SubjectSummary>>::error(format!("Database error: {e}"))),
            )
        }
    }
}

/// GET /api/teacher/subjects/{subject_id}/students
pub async fn list_subject_students(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(subject_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    if let Err(e) = authorize_subject(db, user.id(), subject_id).await {
        return attendance_error(e).into_response();
    }

    match subject::Model::roster(db, subject_id).await {
        Ok(students) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                students.into_iter().map(StudentSummary::from).collect::<Vec<_>>(),
                "Students retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Vec<StudentSummary>>::error(format!("Database error: {e}"))),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub date: Option<String>,
}

/// GET /api/teacher/subjects/{subject_id}/attendance?date=YYYY-MM-DD
///
/// Without `date`, every recorded day is returned.
pub async fn list_subject_attendance(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(subject_id): Path<i64>,
    Query(query): Query<AttendanceQuery>,
) -> Response {
    match subject_attendance_for(app_state.db(), user.id(), subject_id, query.date.as_deref()).await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::<Vec<SubjectAttendanceRow>>::success(
                rows,
                "Attendance retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => attendance_error(e).into_response(),
    }
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::attendance_record::StudentAttendanceRow;
use db::models::class::{self, StudentClass};
use db::models::student;
use db::models::subject::{self, StudentSubject};
use sea_orm::EntityTrait;
use serde::Serialize;
use services::attendance::student_class_attendance;
use url::Url;
use util::config;
use util::paths::AccountKind;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, attendance_error};
use crate::routes::common::serve_profile_picture;

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfileResponse {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub student_id: String,
    pub course: String,
    pub username: String,
    pub has_profile_picture: bool,
}

impl From<student::Model> for StudentProfileResponse {
    fn from(s: student::Model) -> Self {
        Self {
            id: s.id,
            has_profile_picture: s.profile_picture.is_some(),
            first_name: s.first_name,
            middle_name: s.middle_name,
            last_name: s.last_name,
            student_id: s.student_number,
            course: s.course,
            username: s.username,
        }
    }
}

/// GET /api/student/profile
pub async fn get_profile(State(app_state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    match student::Entity::find_by_id(user.id()).one(app_state.db()).await {
        Ok(Some(s)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                StudentProfileResponse::from(s),
                "Profile retrieved successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<StudentProfileResponse>::error("Student not found")),
        ),
        Err(e) => {
            tracing::error!("Failed to load student {}: {:?}", user.id(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<StudentProfileResponse>::error(format!("Database error: {e}"))),
            )
        }
    }
}

/// GET /api/student/profile/picture
pub async fn get_picture(State(app_state): State<AppState>, user: AuthUser) -> Response {
    match student::Entity::find_by_id(user.id()).one(app_state.db()).await {
        Ok(Some(s)) => {
            serve_profile_picture(AccountKind::Student, s.id, s.profile_picture.as_deref()).await
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Student not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentClassResponse {
    pub id: i64,
    pub name: String,
    pub schedule: String,
    pub teacher: String,
}

impl From<StudentClass> for StudentClassResponse {
    fn from(c: StudentClass) -> Self {
        Self {
            teacher: format!("{} {}", c.teacher_first_name, c.teacher_last_name),
            id: c.id,
            name: c.name,
            schedule: c.schedule,
        }
    }
}

/// GET /api/student/classes
///
/// Classes whose roster includes the student, with the teacher's display name.
pub async fn list_classes(State(app_state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    match class::Model::for_student(app_state.db(), user.id()).await {
        Ok(classes) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                classes
                    .into_iter()
                    .map(StudentClassResponse::from)
                    .collect::<Vec<_>>(),
                "Classes retrieved successfully",
            )),
        ),
        Err(e) => {
            tracing::error!("Failed to list classes of student {}: {:?}", user.id(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<StudentClassResponse>>::error(format!(
                    "Database error: {e}"
                ))),
            )
        }
    }
}

async fn attendance_listing(app_state: &AppState, student_id: i64, class_id: Option<i64>) -> Response {
    match student_class_attendance(app_state.db(), student_id, class_id).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::<Vec<StudentAttendanceRow>>::success(
                rows,
                "Attendance retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => attendance_error(e).into_response(),
    }
}

/// GET /api/student/attendance
///
/// All of the student's class attendance, newest first.
pub async fn list_attendance(State(app_state): State<AppState>, user: AuthUser) -> Response {
    attendance_listing(&app_state, user.id(), None).await
}

/// GET /api/student/attendance/{class_id}
pub async fn list_class_attendance(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(class_id): Path<i64>,
) -> Response {
    attendance_listing(&app_state, user.id(), Some(class_id)).await
}

/// GET /api/student/subjects
pub async fn list_subjects(State(app_state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    match subject::Model::for_student(app_state.db(), user.id()).await {
        Ok(subjects) => (
            StatusCode::OK,
            Json(ApiResponse::success(subjects, "Subjects retrieved successfully")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Vec<StudentSubject>>::error(format!("Database error: {e}"))),
        ),
    }
}

/// Content encoded into the check-in QR code.
#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub id: i64,
    pub student_id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub course: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeResponse {
    pub payload: QrPayload,
    pub image_url: String,
}

/// Builds the image URL of the configured QR rendering service for `content`.
pub fn qr_image_url(base: &str, content: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(base, &[("size", "200x200"), ("data", content)])
}

/// GET /api/student/qr-code
///
/// Returns the check-in payload and a URL rendering it as a QR image. Only available
/// once the student has uploaded a profile picture.
///
/// ### Responses
/// - `200 OK` with `{ payload, imageUrl }`
/// - `400 Bad Request` when no profile picture exists
pub async fn qr_code(State(app_state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    let s = match student::Entity::find_by_id(user.id()).one(app_state.db()).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<QrCodeResponse>::error("Student not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<QrCodeResponse>::error(format!("Database error: {e}"))),
            );
        }
    };

    if s.profile_picture.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<QrCodeResponse>::error(
                "Upload a profile picture before generating a QR code",
            )),
        );
    }

    let payload = QrPayload {
        id: s.id,
        student_id: s.student_number,
        first_name: s.first_name,
        middle_name: s.middle_name,
        last_name: s.last_name,
        course: s.course,
    };

    let image_url = serde_json::to_string(&payload)
        .map_err(|e| e.to_string())
        .and_then(|content| {
            qr_image_url(&config::qr_service_url(), &content).map_err(|e| e.to_string())
        });

    match image_url {
        Ok(image_url) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                QrCodeResponse {
                    payload,
                    image_url: image_url.to_string(),
                },
                "QR code generated successfully",
            )),
        ),
        Err(e) => {
            tracing::error!("Could not build QR URL: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<QrCodeResponse>::error("QR service is misconfigured")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::qr_image_url;

    #[test]
    fn qr_url_encodes_payload_as_query() {
        let url = qr_image_url(
            "https://api.qrserver.com/v1/create-qr-code/",
            r#"{"id":1,"firstName":"Ann"}"#,
        )
        .unwrap();

        assert_eq!(url.host_str(), Some("api.qrserver.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("size".into(), "200x200".into()));
        assert_eq!(pairs[1], ("data".into(), r#"{"id":1,"firstName":"Ann"}"#.into()));
    }
}

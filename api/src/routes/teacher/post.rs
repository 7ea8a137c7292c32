use axum::{
    Json,
    extract::{Multipart, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::{class, class_student, student, subject, teacher};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use services::attendance::{
    self, AttendanceError, ClassAttendanceRequest, SubjectAttendanceRequest, authorize_class,
    authorize_subject,
};
use util::paths::AccountKind;
use util::state::AppState;
use validator::Validate;

use super::get::TeacherProfileResponse;
use crate::auth::AuthUser;
use crate::response::{ApiResponse, attendance_error};
use crate::routes::common::{
    ProfilePictureResponse, format_validation_errors, json_rejection_message,
    store_profile_picture,
};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 32, message = "Phone number is too long"))]
    pub phone: Option<String>,
}

/// POST /api/teacher/profile/update
///
/// Replaces the teacher's contact details. Omitted or blank fields are cleared.
pub async fn update_profile(
    State(app_state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<TeacherProfileResponse>::error(format_validation_errors(&e))),
        );
    }

    let email = req.email.as_deref().map(str::trim).filter(|v| !v.is_empty());
    let phone = req.phone.as_deref().map(str::trim).filter(|v| !v.is_empty());

    match teacher::Model::update_contact(app_state.db(), user.id(), email, phone).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TeacherProfileResponse::from(updated),
                "Profile updated successfully",
            )),
        ),
        Err(e) => {
            tracing::error!("Failed to update teacher {} profile: {:?}", user.id(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<TeacherProfileResponse>::error(format!("Database error: {e}"))),
            )
        }
    }
}

/// POST /api/teacher/profile/upload-picture
///
/// Multipart upload with a single `file` field (JPEG, PNG or GIF, at most 2 MiB).
pub async fn upload_picture(
    State(app_state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let filename = match store_profile_picture(AccountKind::Teacher, user.id(), &mut multipart).await {
        Ok(filename) => filename,
        Err((status, message)) => {
            return (status, Json(ApiResponse::<ProfilePictureResponse>::error(message)));
        }
    };

    match teacher::Model::set_profile_picture(app_state.db(), user.id(), Some(filename.clone())).await {
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

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 1, max = 100, message = "Class name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Schedule is required"))]
    pub schedule: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreatedClass {
    pub class_id: i64,
}

/// POST /api/teacher/classes
///
/// ### Request Body
/// ```json
/// { "name": "Grade 7 - Rizal", "schedule": "MWF 8:00-9:00" }
/// ```
///
/// ### Responses
/// - `201 Created` with `{ classId }`
/// - `400 Bad Request` when a field is missing or empty
pub async fn create_class(
    State(app_state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateClassRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<CreatedClass>::error(json_rejection_message(&rejection))),
            );
        }
    };
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<CreatedClass>::error(format_validation_errors(&e))),
        );
    }

    match class::Model::create(app_state.db(), user.id(), req.name.trim(), req.schedule.trim()).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                CreatedClass { class_id: created.id },
                "Class created successfully",
            )),
        ),
        Err(e) => {
            tracing::error!("Failed to create class for teacher {}: {:?}", user.id(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<CreatedClass>::error(format!("Database error: {e}"))),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentRequest {
    pub student_id: i64,
}

/// POST /api/teacher/classes/{class_id}/students
///
/// Puts an existing student account on the class roster.
///
/// ### Responses
/// - `201 Created`
/// - `403 Forbidden` when the class is missing or owned by another teacher
/// - `404 Not Found` when the student does not exist
/// - `409 Conflict` when the student is already on the roster
pub async fn add_class_student(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(class_id): Path<i64>,
    Json(req): Json<AddStudentRequest>,
) -> Response {
    let db = app_state.db();
    if let Err(e) = authorize_class(db, user.id(), class_id).await {
        return attendance_error(e).into_response();
    }

    match student::Entity::find_by_id(req.student_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Student not found")),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
            )
                .into_response();
        }
    }

    match class_student::Model::exists(db, class_id, req.student_id).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::<()>::error("Student is already in this class")),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(format!("Database error: {e}"))),
            )
                .into_response();
        }
    }

    match class_student::Model::add(db, class_id, req.student_id).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(ApiResponse::success((), "Student added to class")),
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
pub struct RecordedCount {
    pub recorded: usize,
}

/// POST /api/teacher/classes/{class_id}/attendance
///
/// Records a whole class roster for one day in a single transaction.
///
/// ### Request Body
/// ```json
/// {
///   "date": "2024-03-01",
///   "attendanceRecords": [
///     { "studentId": 4, "status": "present" },
///     { "studentId": 5, "status": "absent", "notes": "sick" }
///   ]
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ recorded }`
/// - `400 Bad Request` (`kind: invalid_input`)
/// - `403 Forbidden` (`kind: not_found_or_forbidden`)
/// - `500 Internal Server Error` (`kind: recording_failed`); nothing was written
pub async fn record_class_attendance(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(class_id): Path<i64>,
    payload: Result<Json<ClassAttendanceRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return attendance_error(AttendanceError::invalid(json_rejection_message(&rejection)))
                .into_response();
        }
    };

    match attendance::record_class_attendance(app_state.db(), user.id(), class_id, &req).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                RecordedCount { recorded: outcome.recorded },
                format!("{} attendance records recorded", outcome.recorded),
            )),
        )
            .into_response(),
        Err(e) => attendance_error(e).into_response(),
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 32, message = "Subject code is required"))]
    pub subject_code: String,
    #[validate(length(min = 1, max = 255, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 100, message = "Schedule is required"))]
    pub schedule: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSubject {
    pub subject_id: i64,
}

/// POST /api/teacher/subjects
///
/// New subjects have no key code until one is generated.
pub async fn create_subject(
    State(app_state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateSubjectRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<CreatedSubject>::error(json_rejection_message(&rejection))),
            );
        }
    };
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<CreatedSubject>::error(format_validation_errors(&e))),
        );
    }

    match subject::Model::create(
        app_state.db(),
        user.id(),
        req.subject_code.trim(),
        req.description.trim(),
        req.schedule.trim(),
    )
    .await
    {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                CreatedSubject { subject_id: created.id },
                "Subject created successfully",
            )),
        ),
        Err(e) => {
            tracing::error!("Failed to create subject for teacher {}: {:?}", user.id(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<CreatedSubject>::error(format!("Database error: {e}"))),
            )
        }
    }
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyCodeResponse {
    pub key_code: String,
}

/// POST /api/teacher/subjects/{subject_id}/generate-key
///
/// Replaces the subject's key code with a fresh random one. Students holding the
/// old code can no longer find the subject.
pub async fn generate_key(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(subject_id): Path<i64>,
) -> Response {
    let db = app_state.db();
    let owned = match authorize_subject(db, user.id(), subject_id).await {
        Ok(owned) => owned,
        Err(e) => return attendance_error(e).into_response(),
    };

    match owned.regenerate_key_code(db).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                KeyCodeResponse {
                    key_code: updated.key_code.unwrap_or_default(),
                },
                "Key code generated successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Key generation for subject {} failed: {:?}", subject_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<KeyCodeResponse>::error(format!("Database error: {e}"))),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpsertResponse {
    pub id: i64,
    pub outcome: &'static str,
}

/// POST /api/teacher/subjects/{subject_id}/attendance
///
/// Records one student's attendance for a subject and day, overwriting an earlier
/// mark for the same day.
///
/// ### Request Body
/// ```json
/// { "studentId": 4, "date": "2024-04-10", "status": "absent", "notes": "called in sick" }
/// ```
///
/// ### Responses
/// - `201 Created` with `{ id, outcome: "created" }`
/// - `200 OK` with `{ id, outcome: "updated" }`
/// - `400`, `403`, `500` as for class attendance
pub async fn record_subject_attendance(
    State(app_state): State<AppState>,
    user: AuthUser,
    Path(subject_id): Path<i64>,
    payload: Result<Json<SubjectAttendanceRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return attendance_error(AttendanceError::invalid(json_rejection_message(&rejection)))
                .into_response();
        }
    };

    match attendance::record_subject_attendance(app_state.db(), user.id(), subject_id, &req).await {
        Ok(outcome) => {
            let status = if outcome.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (
                status,
                Json(ApiResponse::success(
                    UpsertResponse {
                        id: outcome.id,
                        outcome: outcome.outcome(),
                    },
                    format!("Attendance {}", outcome.outcome()),
                )),
            )
                .into_response()
        }
        Err(e) => attendance_error(e).into_response(),
    }
}

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::student::{self, NewStudent};
use db::models::teacher::{self, NewTeacher};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::auth::{UserType, generate_jwt};
use crate::response::ApiResponse;
use crate::routes::common::{format_validation_errors, json_rejection_message};

lazy_static::lazy_static! {
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9_.]{3,32}$").unwrap();
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    pub middle_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    pub user_type: UserType,

    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username must be 3-32 letters, digits, dots or underscores"
    ))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub faculty_id: Option<String>,
    pub student_id: Option<String>,
    pub course: Option<String>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredAccount {
    pub id: i64,
    pub username: String,
    pub user_type: String,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_duplicate(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// POST /api/register
///
/// Creates a teacher or student account.
///
/// ### Request Body
/// ```json
/// {
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "userType": "teacher",
///   "username": "ada",
///   "password": "secret1",
///   "facultyId": "F-001"
/// }
/// ```
/// Students send `studentId` and `course` instead of `facultyId`.
///
/// ### Responses
/// - `201 Created` with `{ id, username, userType }`
/// - `400 Bad Request` (validation failure or missing role fields)
/// - `409 Conflict` (username taken)
/// - `500 Internal Server Error`
pub async fn register(
    State(app_state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> impl IntoResponse {
    let db = app_state.db();

    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<RegisteredAccount>::error(json_rejection_message(&rejection))),
            );
        }
    };

    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<RegisteredAccount>::error(format_validation_errors(&e))),
        );
    }

    let taken = match req.user_type {
        UserType::Teacher => teacher::Model::find_by_username(db, &req.username)
            .await
            .map(|t| t.is_some()),
        UserType::Student => student::Model::find_by_username(db, &req.username)
            .await
            .map(|s| s.is_some()),
    };
    match taken {
        Ok(false) => {}
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::<RegisteredAccount>::error("Username is already taken")),
            );
        }
        Err(e) => {
            tracing::error!("Username lookup failed: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<RegisteredAccount>::error(format!("Database error: {e}"))),
            );
        }
    }

    let created = match req.user_type {
        UserType::Teacher => {
            let Some(faculty_id) = non_blank(&req.faculty_id) else {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<RegisteredAccount>::error("Faculty ID is required for teachers")),
                );
            };
            teacher::Model::create(
                db,
                NewTeacher {
                    first_name: req.first_name.trim(),
                    middle_name: non_blank(&req.middle_name),
                    last_name: req.last_name.trim(),
                    faculty_id,
                    username: &req.username,
                    password: &req.password,
                },
            )
            .await
            .map(|t| t.id)
        }
        UserType::Student => {
            let (Some(student_number), Some(course)) =
                (non_blank(&req.student_id), non_blank(&req.course))
            else {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<RegisteredAccount>::error(
                        "Student ID and course are required for students",
                    )),
                );
            };
            student::Model::create(
                db,
                NewStudent {
                    first_name: req.first_name.trim(),
                    middle_name: non_blank(&req.middle_name),
                    last_name: req.last_name.trim(),
                    student_number,
                    course,
                    username: &req.username,
                    password: &req.password,
                },
            )
            .await
            .map(|s| s.id)
        }
    };

    match created {
        Ok(id) => {
            tracing::info!("Registered {} account {} ({})", req.user_type.as_str(), id, req.username);
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    RegisteredAccount {
                        id,
                        username: req.username,
                        user_type: req.user_type.as_str().to_string(),
                    },
                    "User registered successfully",
                )),
            )
        }
        Err(e) if is_duplicate(&e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<RegisteredAccount>::error("Username is already taken")),
        ),
        Err(e) => {
            tracing::error!("Registration failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<RegisteredAccount>::error(format!("Database error: {e}"))),
            )
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub user_type: UserType,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: LoginUser,
}

/// POST /api/login
///
/// Verifies credentials against the account table named by `userType` and issues a JWT.
///
/// ### Responses
/// - `200 OK` with `{ token, expiresAt, user: { id, firstName, lastName, userType } }`
/// - `400 Bad Request` (malformed body)
/// - `401 Unauthorized` (unknown username or wrong password)
/// - `500 Internal Server Error`
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let db = app_state.db();

    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<LoginResponse>::error(json_rejection_message(&rejection))),
            );
        }
    };

    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<LoginResponse>::error(format_validation_errors(&e))),
        );
    }

    let verified = match req.user_type {
        UserType::Teacher => teacher::Model::verify(db, &req.username, &req.password)
            .await
            .map(|t| t.map(|t| (t.id, t.first_name, t.last_name))),
        UserType::Student => student::Model::verify(db, &req.username, &req.password)
            .await
            .map(|s| s.map(|s| (s.id, s.first_name, s.last_name))),
    };

    let (id, first_name, last_name) = match verified {
        Ok(Some(account)) => account,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<LoginResponse>::error("Invalid username or password")),
            );
        }
        Err(e) => {
            tracing::error!("Login lookup failed: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<LoginResponse>::error(format!("Database error: {e}"))),
            );
        }
    };

    let (token, expires_at) = match generate_jwt(id, req.user_type) {
        Ok(issued) => issued,
        Err(e) => {
            tracing::error!("Token encoding failed: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<LoginResponse>::error("Failed to issue token")),
            );
        }
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            LoginResponse {
                token,
                expires_at,
                user: LoginUser {
                    id,
                    first_name,
                    last_name,
                    user_type: req.user_type.as_str().to_string(),
                },
            },
            "Login successful",
        )),
    )
}

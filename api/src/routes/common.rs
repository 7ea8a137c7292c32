//! Helpers shared by the teacher and student route groups.

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use db::models::student;
use serde::Serialize;
use util::paths::{AccountKind, ensure_parent_dir, profile_path};
use validator::ValidationErrors;

use crate::response::ApiResponse;

pub const MAX_PICTURE_BYTES: usize = 2 * 1024 * 1024;
const ALLOWED_PICTURE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
];

/// Joins the messages of all failed validation rules.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Describes why a JSON body could not be read.
pub fn json_rejection_message(rejection: &JsonRejection) -> String {
    format!("Invalid request body: {}", rejection.body_text())
}

/// A roster entry as returned to teachers.
#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub student_id: String,
    pub course: String,
}

impl From<student::Model> for StudentSummary {
    fn from(s: student::Model) -> Self {
        Self {
            id: s.id,
            first_name: s.first_name,
            middle_name: s.middle_name,
            last_name: s.last_name,
            student_id: s.student_number,
            course: s.course,
        }
    }
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureResponse {
    pub profile_picture: String,
}

/// Reads the `file` field of a multipart upload and writes it to the account's
/// profile folder. Returns the stored file name.
pub async fn store_profile_picture(
    kind: AccountKind,
    account_id: i64,
    multipart: &mut Multipart,
) -> Result<String, (StatusCode, String)> {
    let mut upload: Option<(&'static str, Bytes)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err((StatusCode::BAD_REQUEST, format!("Malformed upload: {e}"))),
        };
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let Some((_, ext)) = ALLOWED_PICTURE_TYPES
            .iter()
            .find(|(mime, _)| *mime == content_type)
        else {
            return Err((
                StatusCode::BAD_REQUEST,
                "File type not supported. Use JPEG, PNG or GIF.".into(),
            ));
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read upload: {e}")))?;
        if bytes.len() > MAX_PICTURE_BYTES {
            return Err((StatusCode::BAD_REQUEST, "File too large. Maximum is 2 MiB.".into()));
        }
        upload = Some((*ext, bytes));
    }

    let Some((ext, bytes)) = upload else {
        return Err((StatusCode::BAD_REQUEST, "No file uploaded.".into()));
    };

    let filename = format!("avatar.{ext}");
    let path = profile_path(kind, account_id, &filename);
    ensure_parent_dir(&path).map_err(|e| {
        tracing::error!("Could not create profile folder for {:?} {}: {}", kind, account_id, e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store file".to_string())
    })?;

    // a previous picture may have a different extension
    for (_, other) in ALLOWED_PICTURE_TYPES.iter().filter(|(_, other)| *other != ext) {
        let _ = tokio::fs::remove_file(profile_path(kind, account_id, &format!("avatar.{other}"))).await;
    }

    tokio::fs::write(&path, &bytes).await.map_err(|e| {
        tracing::error!("Failed to write {}: {}", path.display(), e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store file".to_string())
    })?;

    Ok(filename)
}

/// Removes a stored picture. A file that is already gone is not an error.
pub async fn remove_profile_picture(
    kind: AccountKind,
    account_id: i64,
    filename: &str,
) -> std::io::Result<()> {
    match tokio::fs::remove_file(profile_path(kind, account_id, filename)).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Streams a stored picture back with a guessed content type.
pub async fn serve_profile_picture(
    kind: AccountKind,
    account_id: i64,
    filename: Option<&str>,
) -> Response {
    let Some(filename) = filename else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("No profile picture set")),
        )
            .into_response();
    };

    let fs_path = profile_path(kind, account_id, filename);
    let buffer = match tokio::fs::read(&fs_path).await {
        Ok(buffer) => buffer,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Profile picture file missing")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Failed to read {}: {}", fs_path.display(), e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to read profile picture")),
            )
                .into_response();
        }
    };

    let mime = mime_guess::from_path(&fs_path)
        .first_or_octet_stream()
        .to_string();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&mime)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );

    (StatusCode::OK, headers, buffer).into_response()
}

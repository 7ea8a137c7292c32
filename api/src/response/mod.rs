use axum::{Json, http::StatusCode};
use serde::Serialize;
use services::{AttendanceError, ErrorKind};

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// - `T` is the type of the `data` payload.
/// - `success` tells whether the operation succeeded.
/// - `message` is a human-readable context string.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response with a message and default `data`.
    ///
    /// `T` must implement `Default`, since error responses carry no useful data.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// `data` payload of a failed attendance operation.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFoundOrForbidden => StatusCode::FORBIDDEN,
        ErrorKind::RecordingFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Renders an attendance error as an envelope with its kind and matching status.
///
/// Store failures are logged with their cause; the client only sees the summary.
pub fn attendance_error(err: AttendanceError) -> (StatusCode, Json<ApiResponse<ErrorBody>>) {
    let kind = err.kind();
    let message = match &err {
        AttendanceError::InvalidInput(message) => message.clone(),
        AttendanceError::NotFoundOrForbidden => {
            "Not found or you do not have access to it".to_string()
        }
        AttendanceError::RecordingFailed { message, .. } => {
            tracing::error!("{}", err);
            message.clone()
        }
    };

    (
        status_for(kind),
        Json(ApiResponse {
            success: false,
            data: ErrorBody { kind },
            message,
        }),
    )
}

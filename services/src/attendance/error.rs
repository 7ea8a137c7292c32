use std::time::Duration;

use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The class or subject does not exist or belongs to another teacher.
    #[error("not found or not owned by the requesting teacher")]
    NotFoundOrForbidden,

    #[error("{message}: {source}")]
    RecordingFailed {
        message: String,
        #[source]
        source: DbErr,
    },
}

/// Stable, serializable discriminant of [`AttendanceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFoundOrForbidden,
    RecordingFailed,
}

impl AttendanceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn recording(message: impl Into<String>, source: DbErr) -> Self {
        Self::RecordingFailed {
            message: message.into(),
            source,
        }
    }

    pub(crate) fn timed_out(operation: &str, limit: Duration) -> Self {
        Self::recording(
            format!("{operation} timed out"),
            DbErr::Custom(format!("no completion within {}s", limit.as_secs())),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFoundOrForbidden => ErrorKind::NotFoundOrForbidden,
            Self::RecordingFailed { .. } => ErrorKind::RecordingFailed,
        }
    }
}

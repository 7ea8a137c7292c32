mod bulk;
mod error;
mod guard;
pub mod input;
mod reads;
mod upsert;

pub use bulk::{BulkOutcome, ClassAttendanceRequest, record_class_attendance};
pub use error::{AttendanceError, ErrorKind};
pub use guard::{authorize_class, authorize_subject};
pub use reads::{student_class_attendance, subject_attendance_for};
pub use upsert::{SubjectAttendanceRequest, UpsertOutcome, record_subject_attendance};

use std::future::Future;

use util::config;

/// Runs `work` under the configured attendance timeout.
///
/// Elapsing drops the future, which drops any open transaction and rolls it back.
async fn within_deadline<T, F>(operation: &str, work: F) -> Result<T, AttendanceError>
where
    F: Future<Output = Result<T, AttendanceError>>,
{
    let limit = config::attendance_timeout();
    match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("{operation} exceeded {}s and was abandoned", limit.as_secs());
            Err(AttendanceError::timed_out(operation, limit))
        }
    }
}

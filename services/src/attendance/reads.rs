use db::models::attendance_record::{self, StudentAttendanceRow};
use db::models::subject_attendance_record::{self, SubjectAttendanceRow};
use sea_orm::DatabaseConnection;

use super::{AttendanceError, authorize_subject, input};

/// Subject attendance of an owned subject, optionally restricted to one day.
pub async fn subject_attendance_for(
    db: &DatabaseConnection,
    teacher_id: i64,
    subject_id: i64,
    date: Option<&str>,
) -> Result<Vec<SubjectAttendanceRow>, AttendanceError> {
    let date = date
        .filter(|d| !d.trim().is_empty())
        .map(input::parse_date)
        .transpose()?;

    authorize_subject(db, teacher_id, subject_id).await?;

    subject_attendance_record::Model::list_for_subject(db, subject_id, date)
        .await
        .map_err(|e| {
            AttendanceError::recording(format!("failed to load attendance of subject {subject_id}"), e)
        })
}

/// A student's class attendance, newest first.
pub async fn student_class_attendance(
    db: &DatabaseConnection,
    student_id: i64,
    class_id: Option<i64>,
) -> Result<Vec<StudentAttendanceRow>, AttendanceError> {
    attendance_record::Model::for_student(db, student_id, class_id)
        .await
        .map_err(|e| {
            AttendanceError::recording(format!("failed to load attendance of student {student_id}"), e)
        })
}

use db::models::{class, subject};
use sea_orm::DatabaseConnection;

use super::AttendanceError;

/// Resolves a class owned by `teacher_id`. Missing and foreign classes are reported the same way.
pub async fn authorize_class(
    db: &DatabaseConnection,
    teacher_id: i64,
    class_id: i64,
) -> Result<class::Model, AttendanceError> {
    match class::Model::find_owned(db, class_id, teacher_id).await {
        Ok(Some(class)) => Ok(class),
        Ok(None) => Err(AttendanceError::NotFoundOrForbidden),
        Err(err) => Err(AttendanceError::recording(
            format!("failed to look up class {class_id}"),
            err,
        )),
    }
}

/// Resolves a subject owned by `teacher_id`.
pub async fn authorize_subject(
    db: &DatabaseConnection,
    teacher_id: i64,
    subject_id: i64,
) -> Result<subject::Model, AttendanceError> {
    match subject::Model::find_owned(db, subject_id, teacher_id).await {
        Ok(Some(subject)) => Ok(subject),
        Ok(None) => Err(AttendanceError::NotFoundOrForbidden),
        Err(err) => Err(AttendanceError::recording(
            format!("failed to look up subject {subject_id}"),
            err,
        )),
    }
}

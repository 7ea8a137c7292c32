use chrono::NaiveDate;
use db::models::AttendanceStatus;
use db::models::subject_attendance_record::Model as SubjectAttendance;
use sea_orm::{DatabaseConnection, SqlErr};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{AttendanceError, authorize_subject, input, within_deadline};

/// Raw body of a single subject attendance write.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAttendanceRequest {
    pub student_id: Option<Value>,
    pub date: Option<Value>,
    pub status: Option<Value>,
    pub notes: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    pub id: i64,
    pub created: bool,
}

impl UpsertOutcome {
    pub fn outcome(&self) -> &'static str {
        if self.created { "created" } else { "updated" }
    }
}

struct SubjectMark {
    subject_id: i64,
    student_id: i64,
    teacher_id: i64,
    date: NaiveDate,
    status: AttendanceStatus,
    notes: Option<String>,
}

/// Writes the attendance of one student for one subject and day.
///
/// An existing row for the same (subject, student, date) is overwritten; otherwise
/// a new row is inserted. Enrollment of the student is not checked.
pub async fn record_subject_attendance(
    db: &DatabaseConnection,
    teacher_id: i64,
    subject_id: i64,
    request: &SubjectAttendanceRequest,
) -> Result<UpsertOutcome, AttendanceError> {
    let mark = SubjectMark {
        subject_id,
        teacher_id,
        student_id: input::student_id(request.student_id.as_ref())?,
        date: input::date(request.date.as_ref())?,
        status: input::status(request.status.as_ref())?,
        notes: input::notes(request.notes.as_ref())?,
    };

    let outcome = within_deadline("subject attendance write", async {
        authorize_subject(db, teacher_id, subject_id).await?;
        upsert(db, &mark).await
    })
    .await?;

    info!(
        "Subject {} attendance for student {} on {} {} (row {})",
        subject_id,
        mark.student_id,
        mark.date,
        outcome.outcome(),
        outcome.id
    );
    Ok(outcome)
}

async fn upsert(db: &DatabaseConnection, mark: &SubjectMark) -> Result<UpsertOutcome, AttendanceError> {
    let existing = SubjectAttendance::find_for(db, mark.subject_id, mark.student_id, mark.date)
        .await
        .map_err(|e| AttendanceError::recording("failed to look up subject attendance", e))?;

    match existing {
        Some(row) => overwrite(db, row.id, mark).await,
        None => insert_or_merge(db, mark).await,
    }
}

/// Inserts a new row. Losing a race to a concurrent insert of the same key turns
/// this write into an update of the row that won.
async fn insert_or_merge(
    db: &DatabaseConnection,
    mark: &SubjectMark,
) -> Result<UpsertOutcome, AttendanceError> {
    let inserted = SubjectAttendance::insert_with(
        db,
        mark.subject_id,
        mark.student_id,
        mark.teacher_id,
        mark.date,
        mark.status,
        mark.notes.clone(),
    )
    .await;

    match inserted {
        Ok(row) => Ok(UpsertOutcome {
            id: row.id,
            created: true,
        }),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            debug!(
                "Concurrent subject attendance insert for student {} on {}; updating instead",
                mark.student_id, mark.date
            );
            let winner =
                SubjectAttendance::find_for(db, mark.subject_id, mark.student_id, mark.date)
                    .await
                    .map_err(|e| {
                        AttendanceError::recording("failed to re-read subject attendance", e)
                    })?;
            match winner {
                Some(row) => overwrite(db, row.id, mark).await,
                // the winning row was deleted between our insert and the re-read;
                // the unique violation is still the failure that stopped this write
                None => Err(AttendanceError::recording(
                    "subject attendance conflicted with a row that no longer exists",
                    err,
                )),
            }
        }
        Err(err) => Err(AttendanceError::recording(
            format!("failed to record subject attendance for student {}", mark.student_id),
            err,
        )),
    }
}

async fn overwrite(
    db: &DatabaseConnection,
    id: i64,
    mark: &SubjectMark,
) -> Result<UpsertOutcome, AttendanceError> {
    SubjectAttendance::overwrite(db, id, mark.status, mark.notes.clone())
        .await
        .map_err(|e| AttendanceError::recording(format!("failed to update subject attendance {id}"), e))?;

    Ok(UpsertOutcome { id, created: false })
}

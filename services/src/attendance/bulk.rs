use chrono::NaiveDate;
use db::models::attendance_record::{self, NewAttendance};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use super::input::{self, RosterEntry};
use super::{AttendanceError, authorize_class, within_deadline};

/// Raw body of a class attendance submission. Fields stay untyped until validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAttendanceRequest {
    pub date: Option<Value>,
    pub attendance_records: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub recorded: usize,
}

/// Records one attendance row per roster entry, all or nothing.
///
/// Input is validated before anything touches the store. The ownership check and the
/// transaction share one deadline; a failed insert or an elapsed deadline rolls back
/// every row written so far.
pub async fn record_class_attendance(
    db: &DatabaseConnection,
    teacher_id: i64,
    class_id: i64,
    request: &ClassAttendanceRequest,
) -> Result<BulkOutcome, AttendanceError> {
    let date = input::date(request.date.as_ref())?;
    let roster = input::roster(request.attendance_records.as_ref())?;

    let outcome = within_deadline("class attendance transaction", async move {
        authorize_class(db, teacher_id, class_id).await?;
        write_roster(db, teacher_id, class_id, date, roster).await
    })
    .await?;

    info!(
        "Recorded {} attendance rows for class {} on {} (teacher {})",
        outcome.recorded, class_id, date, teacher_id
    );
    Ok(outcome)
}

async fn write_roster(
    db: &DatabaseConnection,
    teacher_id: i64,
    class_id: i64,
    date: NaiveDate,
    roster: Vec<RosterEntry>,
) -> Result<BulkOutcome, AttendanceError> {
    let txn = db
        .begin()
        .await
        .map_err(|e| AttendanceError::recording("failed to start attendance transaction", e))?;

    let recorded = roster.len();
    for entry in roster {
        let student_id = entry.student_id;
        let insert = attendance_record::Model::insert_with(
            &txn,
            NewAttendance {
                student_id,
                teacher_id,
                class_id,
                date,
                status: entry.status,
                notes: entry.notes,
            },
        )
        .await;

        if let Err(err) = insert {
            warn!(
                "Rolling back attendance for class {} on {}: student {} failed: {}",
                class_id, date, student_id, err
            );
            if let Err(rollback_err) = txn.rollback().await {
                error!("Rollback of class {} attendance failed: {:?}", class_id, rollback_err);
            }
            return Err(AttendanceError::recording(
                format!("failed to record attendance for student {student_id}"),
                err,
            ));
        }
    }

    txn.commit()
        .await
        .map_err(|e| AttendanceError::recording("failed to commit attendance transaction", e))?;

    Ok(BulkOutcome { recorded })
}

//! Validation of raw attendance payloads. Everything here runs before the store is touched.

use std::str::FromStr;

use chrono::NaiveDate;
use db::models::AttendanceStatus;
use serde_json::Value;

use super::AttendanceError;

/// A validated roster entry of a bulk class submission.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

/// Parses a required `YYYY-MM-DD` calendar date.
pub fn date(raw: Option<&Value>) -> Result<NaiveDate, AttendanceError> {
    let text = match raw {
        Some(Value::String(text)) if !text.trim().is_empty() => text.trim(),
        Some(Value::String(_)) | None => return Err(AttendanceError::invalid("date is required")),
        Some(_) => return Err(AttendanceError::invalid("date must be a string")),
    };
    parse_date(text)
}

pub fn parse_date(text: &str) -> Result<NaiveDate, AttendanceError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| AttendanceError::invalid(format!("'{text}' is not a YYYY-MM-DD date")))
}

pub fn status(raw: Option<&Value>) -> Result<AttendanceStatus, AttendanceError> {
    match raw {
        Some(Value::String(text)) => AttendanceStatus::from_str(text).map_err(|_| {
            AttendanceError::invalid(format!(
                "status '{text}' must be one of present, absent, late"
            ))
        }),
        None | Some(Value::Null) => Err(AttendanceError::invalid("status is required")),
        Some(_) => Err(AttendanceError::invalid("status must be a string")),
    }
}

pub fn student_id(raw: Option<&Value>) -> Result<i64, AttendanceError> {
    match raw {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| AttendanceError::invalid("studentId must be an integer")),
        None => Err(AttendanceError::invalid("studentId is required")),
    }
}

/// Optional free text. Blank notes are stored as null.
pub fn notes(raw: Option<&Value>) -> Result<Option<String>, AttendanceError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(AttendanceError::invalid("notes must be a string")),
    }
}

/// Validates the whole roster up front; one bad entry rejects the submission.
pub fn roster(raw: Option<&Value>) -> Result<Vec<RosterEntry>, AttendanceError> {
    let entries = match raw {
        None | Some(Value::Null) => {
            return Err(AttendanceError::invalid("attendanceRecords is required"));
        }
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(AttendanceError::invalid("attendanceRecords must be an array")),
    };

    if entries.is_empty() {
        return Err(AttendanceError::invalid("attendanceRecords must not be empty"));
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let Value::Object(fields) = entry else {
                return Err(AttendanceError::invalid(format!(
                    "attendanceRecords[{index}] must be an object"
                )));
            };
            let at = |err: AttendanceError| match err {
                AttendanceError::InvalidInput(message) => {
                    AttendanceError::invalid(format!("attendanceRecords[{index}]: {message}"))
                }
                other => other,
            };

            Ok(RosterEntry {
                student_id: student_id(fields.get("studentId")).map_err(at)?,
                status: status(fields.get("status")).map_err(at)?,
                notes: notes(fields.get("notes")).map_err(at)?,
            })
        })
        .collect()
}

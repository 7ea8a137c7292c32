//! Attendance recording workflow shared by the HTTP layer.
//!
//! Handlers hand raw request bodies to [`attendance`], which validates them,
//! checks that the caller owns the class or subject, and persists the records.

pub mod attendance;

pub use attendance::{AttendanceError, ErrorKind};

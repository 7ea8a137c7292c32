pub mod attendance_record;
pub mod class;
pub mod class_student;
pub mod student;
pub mod subject;
pub mod subject_attendance_record;
pub mod subject_student;
pub mod teacher;

pub use attendance_record::AttendanceStatus;

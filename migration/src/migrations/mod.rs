pub mod m202403010001_create_teachers;
pub mod m202403010002_create_students;
pub mod m202403010003_create_classes;
pub mod m202403010004_create_subjects;
pub mod m202403010005_create_attendance;

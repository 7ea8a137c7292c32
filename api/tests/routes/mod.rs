mod auth_test;
mod guards_test;
mod health_test;
mod student_test;
mod teacher_attendance_test;
mod teacher_classes_test;
mod teacher_subjects_test;

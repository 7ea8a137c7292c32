#![allow(dead_code)]

use db::models::student::{self, NewStudent};
use db::models::teacher::{self, NewTeacher};
use db::models::{class, class_student, subject, subject_student};
use sea_orm::DatabaseConnection;

pub async fn teacher(db: &DatabaseConnection, username: &str) -> teacher::Model {
    teacher::Model::create(
        db,
        NewTeacher {
            first_name: "Terry",
            middle_name: None,
            last_name: username,
            faculty_id: "FAC-1",
            username,
            password: "password",
        },
    )
    .await
    .unwrap()
}

pub async fn student(db: &DatabaseConnection, username: &str, last_name: &str) -> student::Model {
    student::Model::create(
        db,
        NewStudent {
            first_name: username,
            middle_name: None,
            last_name,
            student_number: &format!("SN-{username}"),
            course: "BSIT",
            username,
            password: "password",
        },
    )
    .await
    .unwrap()
}

/// A class owned by `teacher_id` with the given students on its roster.
pub async fn class_with(
    db: &DatabaseConnection,
    teacher_id: i64,
    students: &[&student::Model],
) -> class::Model {
    let class = class::Model::create(db, teacher_id, "Homeroom", "Mon 08:00").await.unwrap();
    for s in students {
        class_student::Model::add(db, class.id, s.id).await.unwrap();
    }
    class
}

pub async fn subject_with(
    db: &DatabaseConnection,
    teacher_id: i64,
    students: &[&student::Model],
) -> subject::Model {
    let subject = subject::Model::create(db, teacher_id, "CS101", "Programming", "TTh 10:00")
        .await
        .unwrap();
    for s in students {
        subject_student::Model::enroll(db, subject.id, s.id).await.unwrap();
    }
    subject
}

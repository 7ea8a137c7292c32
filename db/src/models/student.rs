use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryFilter;
use serde::Serialize;

use crate::password::{hash_password, verify_password};

/// Represents a student account in the `students` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// School-issued student number (distinct from the row id).
    pub student_number: String,
    pub course: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::class_student::Entity")]
    ClassStudents,
    #[sea_orm(has_many = "super::subject_student::Entity")]
    SubjectStudents,
}

impl Related<super::class_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassStudents.def()
    }
}

impl Related<super::subject_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectStudents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Registration input for a student account.
#[derive(Debug, Clone)]
pub struct NewStudent<'a> {
    pub first_name: &'a str,
    pub middle_name: Option<&'a str>,
    pub last_name: &'a str,
    pub student_number: &'a str,
    pub course: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl Model {
    pub async fn create(db: &DbConn, new: NewStudent<'_>) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            first_name: Set(new.first_name.to_owned()),
            middle_name: Set(new.middle_name.map(str::to_owned)),
            last_name: Set(new.last_name.to_owned()),
            student_number: Set(new.student_number.to_owned()),
            course: Set(new.course.to_owned()),
            username: Set(new.username.to_owned()),
            password_hash: Set(hash_password(new.password)?),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_username(db: &DbConn, username: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await
    }

    /// Returns the student only when the password matches.
    pub async fn verify(db: &DbConn, username: &str, password: &str) -> Result<Option<Model>, DbErr> {
        let student = Self::find_by_username(db, username).await?;
        Ok(student.filter(|s| verify_password(&s.password_hash, password)))
    }

    pub async fn set_profile_picture(
        db: &DbConn,
        id: i64,
        file_name: Option<String>,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            id: Set(id),
            profile_picture: Set(file_name),
            ..Default::default()
        };

        active_model.update(db).await
    }
}

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryFilter;
use serde::Serialize;

use crate::password::{hash_password, verify_password};

/// Represents a teacher account in the `teachers` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Staff identifier issued by the school.
    pub faculty_id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// File name under the teacher's profile directory.
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Registration input for a teacher account.
#[derive(Debug, Clone)]
pub struct NewTeacher<'a> {
    pub first_name: &'a str,
    pub middle_name: Option<&'a str>,
    pub last_name: &'a str,
    pub faculty_id: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl Model {
    pub async fn create(db: &DbConn, new: NewTeacher<'_>) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            first_name: Set(new.first_name.to_owned()),
            middle_name: Set(new.middle_name.map(str::to_owned)),
            last_name: Set(new.last_name.to_owned()),
            faculty_id: Set(new.faculty_id.to_owned()),
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

    /// Returns the teacher only when the password matches.
    pub async fn verify(db: &DbConn, username: &str, password: &str) -> Result<Option<Model>, DbErr> {
        let teacher = Self::find_by_username(db, username).await?;
        Ok(teacher.filter(|t| verify_password(&t.password_hash, password)))
    }

    pub async fn update_contact(
        db: &DbConn,
        id: i64,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            id: Set(id),
            email: Set(email.map(str::to_owned)),
            phone: Set(phone.map(str::to_owned)),
            ..Default::default()
        };

        active_model.update(db).await
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

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    FromQueryResult, JoinType, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use serde::Serialize;

use super::{student, subject_attendance_record, subject_student, teacher};

pub const KEY_CODE_LEN: usize = 6;
const KEY_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const KEY_CODE_ATTEMPTS: usize = 8;

/// A teacher-owned course unit that students join with a key code.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subject_code: String,
    pub description: String,
    pub schedule: String,
    #[sea_orm(unique)]
    pub key_code: Option<String>,
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,
    #[sea_orm(has_many = "super::subject_student::Entity")]
    SubjectStudents,
    #[sea_orm(has_many = "super::subject_attendance_record::Entity")]
    Attendance,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::subject_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectStudents.def()
    }
}

impl Related<super::subject_attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub id: i64,
    pub subject_code: String,
    pub description: String,
    pub schedule: String,
    pub key_code: Option<String>,
    pub student_count: i64,
}

/// An enrolled subject as listed for a student.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSubject {
    pub id: i64,
    pub subject_code: String,
    pub description: String,
    pub schedule: String,
    pub teacher_first_name: String,
    pub teacher_last_name: String,
}

/// Fields a teacher may change on a subject. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct SubjectChanges {
    pub subject_code: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<String>,
}

impl SubjectChanges {
    pub fn is_empty(&self) -> bool {
        self.subject_code.is_none() && self.description.is_none() && self.schedule.is_none()
    }
}

/// Produces a random key code of [`KEY_CODE_LEN`] characters from `[A-Z0-9]`.
pub fn generate_key_code() -> String {
    let mut rng = rand::thread_rng();
    (0..KEY_CODE_LEN)
        .map(|_| KEY_CODE_CHARSET[rng.gen_range(0..KEY_CODE_CHARSET.len())] as char)
        .collect()
}

impl Model {
    pub async fn create(
        db: &DbConn,
        teacher_id: i64,
        subject_code: &str,
        description: &str,
        schedule: &str,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            subject_code: Set(subject_code.to_owned()),
            description: Set(description.to_owned()),
            schedule: Set(schedule.to_owned()),
            key_code: Set(None),
            teacher_id: Set(teacher_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_owned<C>(conn: &C, id: i64, teacher_id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::Id.eq(id))
            .filter(Column::TeacherId.eq(teacher_id))
            .one(conn)
            .await
    }

    pub async fn find_by_key_code(db: &DbConn, key_code: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::KeyCode.eq(key_code.trim().to_uppercase()))
            .one(db)
            .await
    }

    pub async fn apply_changes(self, db: &DbConn, changes: SubjectChanges) -> Result<Model, DbErr> {
        let mut active_model: ActiveModel = self.into();
        if let Some(code) = changes.subject_code {
            active_model.subject_code = Set(code);
        }
        if let Some(description) = changes.description {
            active_model.description = Set(description);
        }
        if let Some(schedule) = changes.schedule {
            active_model.schedule = Set(schedule);
        }
        active_model.update(db).await
    }

    /// Deletes the subject together with its enrollments and attendance rows.
    pub async fn delete_with_dependents(self, db: &DbConn) -> Result<(), DbErr> {
        let txn = db.begin().await?;

        subject_attendance_record::Entity::delete_many()
            .filter(subject_attendance_record::Column::SubjectId.eq(self.id))
            .exec(&txn)
            .await?;
        subject_student::Entity::delete_many()
            .filter(subject_student::Column::SubjectId.eq(self.id))
            .exec(&txn)
            .await?;
        Entity::delete_by_id(self.id).exec(&txn).await?;

        txn.commit().await
    }

    /// Assigns a fresh key code, retrying when the random code is already taken.
    pub async fn regenerate_key_code(self, db: &DbConn) -> Result<Model, DbErr> {
        let id = self.id;
        for _ in 0..KEY_CODE_ATTEMPTS {
            let code = generate_key_code();
            if Entity::find()
                .filter(Column::KeyCode.eq(code.as_str()))
                .one(db)
                .await?
                .is_some()
            {
                continue;
            }

            let active_model = ActiveModel {
                id: Set(id),
                key_code: Set(Some(code)),
                ..Default::default()
            };
            match active_model.update(db).await {
                Ok(updated) => return Ok(updated),
                Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    continue;
                }
                Err(err) => return Err(err),
            }
        }

        Err(DbErr::Custom(format!(
            "no free key code after {KEY_CODE_ATTEMPTS} attempts"
        )))
    }

    pub async fn summaries_for_teacher(
        db: &DbConn,
        teacher_id: i64,
    ) -> Result<Vec<SubjectSummary>, DbErr> {
        Entity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::SubjectCode)
            .column(Column::Description)
            .column(Column::Schedule)
            .column(Column::KeyCode)
            .column_as(
                Expr::expr(Func::count(Expr::col((
                    subject_student::Entity,
                    subject_student::Column::StudentId,
                )))),
                "student_count",
            )
            .join(JoinType::LeftJoin, Relation::SubjectStudents.def())
            .filter(Column::TeacherId.eq(teacher_id))
            .group_by(Column::Id)
            .order_by_asc(Column::SubjectCode)
            .into_model::<SubjectSummary>()
            .all(db)
            .await
    }

    pub async fn for_student(db: &DbConn, student_id: i64) -> Result<Vec<StudentSubject>, DbErr> {
        Entity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::SubjectCode)
            .column(Column::Description)
            .column(Column::Schedule)
            .column_as(teacher::Column::FirstName, "teacher_first_name")
            .column_as(teacher::Column::LastName, "teacher_last_name")
            .join(JoinType::InnerJoin, Relation::SubjectStudents.def())
            .join(JoinType::InnerJoin, Relation::Teacher.def())
            .filter(subject_student::Column::StudentId.eq(student_id))
            .order_by_asc(Column::SubjectCode)
            .into_model::<StudentSubject>()
            .all(db)
            .await
    }

    pub async fn roster(db: &DbConn, subject_id: i64) -> Result<Vec<student::Model>, DbErr> {
        student::Entity::find()
            .join(JoinType::InnerJoin, student::Relation::SubjectStudents.def())
            .filter(subject_student::Column::SubjectId.eq(subject_id))
            .order_by_asc(student::Column::LastName)
            .order_by_asc(student::Column::FirstName)
            .all(db)
            .await
    }
}

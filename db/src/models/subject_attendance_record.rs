use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{FromQueryResult, JoinType, QueryOrder, QuerySelect};
use serde::Serialize;

pub use super::attendance_record::AttendanceStatus;
use super::student;

/// Subject-scoped attendance; at most one row per (subject, student, date).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "subject_attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub subject_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A subject attendance row joined with the student's name.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAttendanceRow {
    pub id: i64,
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub student_number: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub async fn find_for<C>(
        conn: &C,
        subject_id: i64,
        student_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Date.eq(date))
            .one(conn)
            .await
    }

    pub async fn insert_with<C>(
        conn: &C,
        subject_id: i64,
        student_id: i64,
        teacher_id: i64,
        date: NaiveDate,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let active_model = ActiveModel {
            student_id: Set(student_id),
            teacher_id: Set(teacher_id),
            subject_id: Set(subject_id),
            date: Set(date),
            status: Set(status),
            notes: Set(notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active_model.insert(conn).await
    }

    /// Replaces status and notes of an existing row and bumps `updated_at`.
    pub async fn overwrite<C>(
        conn: &C,
        id: i64,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let active_model = ActiveModel {
            id: Set(id),
            status: Set(status),
            notes: Set(notes),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        active_model.update(conn).await
    }

    /// Ordered by student last name, then first name.
    pub async fn list_for_subject(
        db: &DbConn,
        subject_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Vec<SubjectAttendanceRow>, DbErr> {
        let mut query = Entity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::StudentId)
            .column(student::Column::FirstName)
            .column(student::Column::LastName)
            .column(student::Column::StudentNumber)
            .column(Column::Date)
            .column(Column::Status)
            .column(Column::Notes)
            .column(Column::UpdatedAt)
            .join(JoinType::InnerJoin, Relation::Student.def())
            .filter(Column::SubjectId.eq(subject_id));

        if let Some(date) = date {
            query = query.filter(Column::Date.eq(date));
        }

        query
            .order_by_asc(student::Column::LastName)
            .order_by_asc(student::Column::FirstName)
            .order_by_desc(Column::Date)
            .into_model::<SubjectAttendanceRow>()
            .all(db)
            .await
    }
}

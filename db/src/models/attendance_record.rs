use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::DeriveActiveEnum;
use sea_orm::entity::prelude::*;
use sea_orm::{FromQueryResult, JoinType, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::class;

/// Class-scoped attendance. Re-submitting a roster appends new rows.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,

    #[sea_orm(string_value = "late")]
    Late,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id",
        on_delete = "Cascade"
    )]
    Class,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One attendance row as a student sees it, with the class name attached.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendanceRow {
    pub id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

/// Values for a single class attendance row.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub student_id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

impl Model {
    /// Inserts on any connection, so callers can run it inside a transaction.
    pub async fn insert_with<C>(conn: &C, new: NewAttendance) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let active_model = ActiveModel {
            student_id: Set(new.student_id),
            teacher_id: Set(new.teacher_id),
            class_id: Set(new.class_id),
            date: Set(new.date),
            status: Set(new.status),
            notes: Set(new.notes),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active_model.insert(conn).await
    }

    pub async fn count_for_class_date(
        db: &DbConn,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.eq(date))
            .count(db)
            .await
    }

    /// Newest first; `class_id` narrows the listing to one class.
    pub async fn for_student(
        db: &DbConn,
        student_id: i64,
        class_id: Option<i64>,
    ) -> Result<Vec<StudentAttendanceRow>, DbErr> {
        let mut query = Entity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::ClassId)
            .column_as(class::Column::Name, "class_name")
            .column(Column::Date)
            .column(Column::Status)
            .column(Column::Notes)
            .join(JoinType::InnerJoin, Relation::Class.def())
            .filter(Column::StudentId.eq(student_id));

        if let Some(class_id) = class_id {
            query = query.filter(Column::ClassId.eq(class_id));
        }

        query
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .into_model::<StudentAttendanceRow>()
            .all(db)
            .await
    }
}

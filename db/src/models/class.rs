use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{FromQueryResult, JoinType, QueryOrder, QuerySelect};
use serde::Serialize;

use super::{class_student, student, teacher};

/// A recurring teacher-led session with a student roster.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub schedule: String,
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
    #[sea_orm(has_many = "super::class_student::Entity")]
    ClassStudents,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::class_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassStudents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A teacher's class with its roster size.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub id: i64,
    pub name: String,
    pub schedule: String,
    pub student_count: i64,
}

/// A class as seen from an enrolled student.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentClass {
    pub id: i64,
    pub name: String,
    pub schedule: String,
    pub teacher_first_name: String,
    pub teacher_last_name: String,
}

impl Model {
    pub async fn create(
        db: &DbConn,
        teacher_id: i64,
        name: &str,
        schedule: &str,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            name: Set(name.to_owned()),
            schedule: Set(schedule.to_owned()),
            teacher_id: Set(teacher_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    /// Looks the class up by id and owner in one query; a class owned by someone
    /// else is indistinguishable from a missing one.
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

    pub async fn summaries_for_teacher(
        db: &DbConn,
        teacher_id: i64,
    ) -> Result<Vec<ClassSummary>, DbErr> {
        Entity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::Name)
            .column(Column::Schedule)
            .column_as(
                Expr::expr(Func::count(Expr::col((
                    class_student::Entity,
                    class_student::Column::StudentId,
                )))),
                "student_count",
            )
            .join(JoinType::LeftJoin, Relation::ClassStudents.def())
            .filter(Column::TeacherId.eq(teacher_id))
            .group_by(Column::Id)
            .order_by_asc(Column::Name)
            .into_model::<ClassSummary>()
            .all(db)
            .await
    }

    pub async fn for_student(db: &DbConn, student_id: i64) -> Result<Vec<StudentClass>, DbErr> {
        Entity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::Name)
            .column(Column::Schedule)
            .column_as(teacher::Column::FirstName, "teacher_first_name")
            .column_as(teacher::Column::LastName, "teacher_last_name")
            .join(JoinType::InnerJoin, Relation::ClassStudents.def())
            .join(JoinType::InnerJoin, Relation::Teacher.def())
            .filter(class_student::Column::StudentId.eq(student_id))
            .order_by_asc(Column::Name)
            .into_model::<StudentClass>()
            .all(db)
            .await
    }

    /// Students on the roster, ordered by last name then first name.
    pub async fn roster(db: &DbConn, class_id: i64) -> Result<Vec<student::Model>, DbErr> {
        student::Entity::find()
            .join(JoinType::InnerJoin, student::Relation::ClassStudents.def())
            .filter(class_student::Column::ClassId.eq(class_id))
            .order_by_asc(student::Column::LastName)
            .order_by_asc(student::Column::FirstName)
            .all(db)
            .await
    }
}

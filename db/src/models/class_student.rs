use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

/// Roster membership of a student in a class.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub class_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id",
        on_delete = "Cascade"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn add(db: &DbConn, class_id: i64, student_id: i64) -> Result<Model, DbErr> {
        ActiveModel {
            class_id: Set(class_id),
            student_id: Set(student_id),
        }
        .insert(db)
        .await
    }

    pub async fn exists(db: &DbConn, class_id: i64, student_id: i64) -> Result<bool, DbErr> {
        Ok(Entity::find_by_id((class_id, student_id))
            .one(db)
            .await?
            .is_some())
    }
}

use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202403010001_create_teachers::Migration),
            Box::new(migrations::m202403010002_create_students::Migration),
            Box::new(migrations::m202403010003_create_classes::Migration),
            Box::new(migrations::m202403010004_create_subjects::Migration),
            Box::new(migrations::m202403010005_create_attendance::Migration),
        ]
    }
}

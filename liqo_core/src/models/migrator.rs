use sea_orm_migration::prelude::*;

mod m20260825_000001_create_users_table;
mod m20260825_000002_create_groups_table;
mod m20260825_000003_create_mentees_table;
mod m20260825_000004_create_group_mentor_histories_table;
mod m20260825_000005_create_mentee_group_histories_table;
mod m20260825_000006_create_meetings_table;
mod m20260825_000007_create_attendances_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260825_000001_create_users_table::Migration),
            Box::new(m20260825_000002_create_groups_table::Migration),
            Box::new(m20260825_000003_create_mentees_table::Migration),
            Box::new(m20260825_000004_create_group_mentor_histories_table::Migration),
            Box::new(m20260825_000005_create_mentee_group_histories_table::Migration),
            Box::new(m20260825_000006_create_meetings_table::Migration),
            Box::new(m20260825_000007_create_attendances_table::Migration),
        ]
    }
}

#[cfg(test)]
use sea_orm::{Database, DbErr};

#[tokio::test]
async fn test_migrations_okay() -> Result<(), DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema_manager = SchemaManager::new(&db);

    Migrator::refresh(&db).await?;

    assert!(schema_manager.has_table("user").await?);
    assert!(schema_manager.has_table("group").await?);
    assert!(schema_manager.has_table("mentee").await?);
    assert!(schema_manager.has_table("group_mentor_history").await?);
    assert!(schema_manager.has_table("mentee_group_history").await?);
    assert!(schema_manager.has_table("meeting").await?);
    assert!(schema_manager.has_table("attendance").await?);

    Ok(())
}

use chrono::Utc;
use sea_orm::{Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use crate::{
    entity::prelude::*,
    ids::{GroupId, MenteeId, UserId},
    models::migrator::Migrator,
};

/// Create a fresh in-memory SQLite database with all migrations applied.
/// Each call returns an isolated database instance.
pub(crate) async fn setup_test_db() -> DatabaseConnection {
    init_tracing();

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Install a compact subscriber so failing tests show the service logs.
/// Safe to call from every test; only the first call wins.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}

pub(crate) async fn insert_user(db: &DatabaseConnection, role: Role) -> UserId {
    let user_id = UserId::new();
    let user = UserActiveModel {
        id: Set(user_id),
        name: Set(format!("Test User {}", user_id)), // Unique name
        email: Set(None),
        role: Set(role),
        blocked_at: Set(None),
        block_reason: Set(None),
        blocked_by: Set(None),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
    };
    User::insert(user).exec(db).await.unwrap();
    user_id
}

pub(crate) async fn insert_group(db: &DatabaseConnection, mentor: Option<UserId>) -> GroupId {
    let group_id = GroupId::new();
    let group = GroupActiveModel {
        id: Set(group_id),
        name: Set(format!("Test Group {}", group_id)),
        description: Set("Test".to_string()),
        current_mentor: Set(mentor),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
    };
    Group::insert(group).exec(db).await.unwrap();
    group_id
}

pub(crate) async fn insert_mentee(db: &DatabaseConnection, group: GroupId) -> MenteeId {
    let mentee_id = MenteeId::new();
    let mentee = MenteeActiveModel {
        id: Set(mentee_id),
        full_name: Set(format!("Test Mentee {}", mentee_id)),
        gender: Set("female".to_string()),
        status: Set(MenteeStatus::Active),
        current_group: Set(group),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
    };
    Mentee::insert(mentee).exec(db).await.unwrap();
    mentee_id
}

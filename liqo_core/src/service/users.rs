use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    entity::prelude::*,
    error::{CoreError, EntityKind},
    ids::UserId,
    service::guard,
};

#[derive(Clone)]
pub struct UsersService {
    db: DatabaseConnection,
}

impl UsersService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_user(
        &self,
        name: String,
        email: Option<String>,
        role: Role,
    ) -> Result<UserModel, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("user name must not be empty".to_owned()));
        }

        let user = UserActiveModel {
            id: Set(UserId::new()),
            name: Set(name),
            email: Set(email),
            role: Set(role),
            blocked_at: Set(None),
            block_reason: Set(None),
            blocked_by: Set(None),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
        };

        let user = User::insert(user).exec_with_returning(&self.db).await?;
        info!(user_id = %user.id, ?role, "user created");
        Ok(user)
    }

    /// Get an active user by ID
    pub async fn get_user(&self, user_id: UserId) -> Result<UserModel, CoreError> {
        guard::require_user(&self.db, user_id).await
    }

    /// List all active users
    pub async fn list_users(&self) -> Result<Vec<UserModel>, CoreError> {
        let users = User::find()
            .filter(UserColumn::DeletedAt.is_null())
            .all(&self.db)
            .await?;

        Ok(users)
    }

    /// List active, unblocked users holding the mentor role
    pub async fn list_mentors(&self) -> Result<Vec<UserModel>, CoreError> {
        let mentors = User::find()
            .filter(UserColumn::Role.eq(Role::Mentor))
            .filter(UserColumn::DeletedAt.is_null())
            .filter(UserColumn::BlockedAt.is_null())
            .all(&self.db)
            .await?;

        Ok(mentors)
    }

    /// Block a user account. Requires an admin actor; the target must be
    /// active and not already blocked.
    pub async fn block_user(
        &self,
        user_id: UserId,
        reason: String,
        acting_user: UserId,
    ) -> Result<UserModel, CoreError> {
        guard::require_actor(&self.db, acting_user, Role::Admin).await?;
        let user = guard::require_user(&self.db, user_id).await?;

        if user.is_blocked() {
            return Err(CoreError::Validation("user is already blocked".to_owned()));
        }

        let mut active = user.into_active_model();
        active.blocked_at = Set(Some(Utc::now()));
        active.block_reason = Set(Some(reason));
        active.blocked_by = Set(Some(acting_user));
        let user = active.update(&self.db).await?;

        info!(user_id = %user.id, blocked_by = %acting_user, "user blocked");
        Ok(user)
    }

    pub async fn unblock_user(
        &self,
        user_id: UserId,
        acting_user: UserId,
    ) -> Result<UserModel, CoreError> {
        guard::require_actor(&self.db, acting_user, Role::Admin).await?;
        let user = guard::require_user(&self.db, user_id).await?;

        if !user.is_blocked() {
            return Err(CoreError::Validation("user is not blocked".to_owned()));
        }

        let mut active = user.into_active_model();
        active.blocked_at = Set(None);
        active.block_reason = Set(None);
        active.blocked_by = Set(None);
        let user = active.update(&self.db).await?;

        info!(user_id = %user.id, "user unblocked");
        Ok(user)
    }

    /// Tombstone a user. History rows keep referencing the tombstoned
    /// account, so audit trails stay reconstructible.
    pub async fn soft_delete(&self, user_id: UserId) -> Result<UserModel, CoreError> {
        let user = guard::require_user(&self.db, user_id).await?;

        let mut active = user.into_active_model();
        active.deleted_at = Set(Some(Utc::now()));
        Ok(active.update(&self.db).await?)
    }

    pub async fn restore(&self, user_id: UserId) -> Result<UserModel, CoreError> {
        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::User))?;

        if !user.is_deleted() {
            return Err(CoreError::NotDeleted(EntityKind::User));
        }

        let mut active = user.into_active_model();
        active.deleted_at = Set(None);
        Ok(active.update(&self.db).await?)
    }

    /// Irreversibly remove an already-tombstoned user. Admin only. History
    /// rows naming the user keep their content; actor and `from_mentor`
    /// references go null at the FK level.
    pub async fn hard_delete(
        &self,
        user_id: UserId,
        acting_user: UserId,
    ) -> Result<(), CoreError> {
        guard::require_actor(&self.db, acting_user, Role::Admin).await?;

        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::User))?;

        if !user.is_deleted() {
            return Err(CoreError::NotDeleted(EntityKind::User));
        }

        User::delete_by_id(user_id).exec(&self.db).await?;
        info!(%user_id, "user hard-deleted");
        Ok(())
    }
}

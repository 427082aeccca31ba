use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    entity::prelude::*,
    error::{CoreError, EntityKind},
    ids::{GroupId, UserId},
    service::guard,
};

#[derive(Clone)]
pub struct GroupsService {
    db: DatabaseConnection,
}

impl GroupsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a group, optionally with a founding mentor.
    ///
    /// The founding mentor sets the pointer directly without a history row;
    /// the first reassignment will record it as `from_mentor`.
    pub async fn create_group(
        &self,
        name: String,
        description: String,
        founding_mentor: Option<UserId>,
    ) -> Result<GroupModel, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("group name must not be empty".to_owned()));
        }

        if let Some(mentor_id) = founding_mentor {
            guard::require_mentor(&self.db, mentor_id).await?;
        }

        let group = GroupActiveModel {
            id: Set(GroupId::new()),
            name: Set(name),
            description: Set(description),
            current_mentor: Set(founding_mentor),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
        };

        let group = Group::insert(group).exec_with_returning(&self.db).await?;
        info!(group_id = %group.id, "group created");
        Ok(group)
    }

    /// Get an active group by ID
    pub async fn get_group(&self, group_id: GroupId) -> Result<GroupModel, CoreError> {
        guard::require_group(&self.db, group_id).await
    }

    /// List all active groups
    pub async fn list_groups(&self) -> Result<Vec<GroupModel>, CoreError> {
        let groups = Group::find()
            .filter(GroupColumn::DeletedAt.is_null())
            .all(&self.db)
            .await?;

        Ok(groups)
    }

    /// List active mentees currently assigned to a group
    pub async fn list_roster(&self, group_id: GroupId) -> Result<Vec<MenteeModel>, CoreError> {
        guard::require_group(&self.db, group_id).await?;

        let mentees = Mentee::find()
            .filter(MenteeColumn::CurrentGroup.eq(group_id))
            .filter(MenteeColumn::DeletedAt.is_null())
            .all(&self.db)
            .await?;

        Ok(mentees)
    }

    /// Tombstone a group. Mentees and history keep their references; the
    /// group just drops out of default queries until restored.
    pub async fn soft_delete(&self, group_id: GroupId) -> Result<GroupModel, CoreError> {
        let group = guard::require_group(&self.db, group_id).await?;

        let mut active = group.into_active_model();
        active.deleted_at = Set(Some(Utc::now()));
        Ok(active.update(&self.db).await?)
    }

    pub async fn restore(&self, group_id: GroupId) -> Result<GroupModel, CoreError> {
        let group = Group::find_by_id(group_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Group))?;

        if !group.is_deleted() {
            return Err(CoreError::NotDeleted(EntityKind::Group));
        }

        let mut active = group.into_active_model();
        active.deleted_at = Set(None);
        Ok(active.update(&self.db).await?)
    }

    /// Irreversibly remove an already-tombstoned group. Admin only.
    /// Meetings cascade away with their attendance; the group's own mentor
    /// history goes with it. Fails at the FK level while any mentee still
    /// points at the group.
    pub async fn hard_delete(
        &self,
        group_id: GroupId,
        acting_user: UserId,
    ) -> Result<(), CoreError> {
        guard::require_actor(&self.db, acting_user, Role::Admin).await?;

        let group = Group::find_by_id(group_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Group))?;

        if !group.is_deleted() {
            return Err(CoreError::NotDeleted(EntityKind::Group));
        }

        Group::delete_by_id(group_id).exec(&self.db).await?;
        info!(%group_id, "group hard-deleted");
        Ok(())
    }
}

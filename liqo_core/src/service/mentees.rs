use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    entity::prelude::*,
    error::{CoreError, EntityKind},
    ids::{GroupId, MenteeId, UserId},
    service::guard,
};

#[derive(Clone)]
pub struct MenteesService {
    db: DatabaseConnection,
}

impl MenteesService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a mentee into a group.
    ///
    /// Like a founding mentor, the initial assignment sets the pointer
    /// without a history row; the first move records this group as
    /// `from_group`.
    pub async fn create_mentee(
        &self,
        full_name: String,
        gender: String,
        group_id: GroupId,
        status: MenteeStatus,
    ) -> Result<MenteeModel, CoreError> {
        if full_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "mentee full name must not be empty".to_owned(),
            ));
        }
        guard::require_gender(&gender)?;
        guard::require_group(&self.db, group_id).await?;

        let mentee = MenteeActiveModel {
            id: Set(MenteeId::new()),
            full_name: Set(full_name),
            gender: Set(gender),
            status: Set(status),
            current_group: Set(group_id),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
        };

        let mentee = Mentee::insert(mentee).exec_with_returning(&self.db).await?;
        info!(mentee_id = %mentee.id, %group_id, "mentee registered");
        Ok(mentee)
    }

    /// Get an active mentee by ID
    pub async fn get_mentee(&self, mentee_id: MenteeId) -> Result<MenteeModel, CoreError> {
        guard::require_mentee(&self.db, mentee_id).await
    }

    /// List all active mentees
    pub async fn list_mentees(&self) -> Result<Vec<MenteeModel>, CoreError> {
        let mentees = Mentee::find()
            .filter(MenteeColumn::DeletedAt.is_null())
            .all(&self.db)
            .await?;

        Ok(mentees)
    }

    pub async fn set_status(
        &self,
        mentee_id: MenteeId,
        status: MenteeStatus,
    ) -> Result<MenteeModel, CoreError> {
        let mentee = guard::require_mentee(&self.db, mentee_id).await?;

        let mut active = mentee.into_active_model();
        active.status = Set(status);
        Ok(active.update(&self.db).await?)
    }

    /// Update name/gender. The gender invariant holds on every write, not
    /// just on creation.
    pub async fn update_details(
        &self,
        mentee_id: MenteeId,
        full_name: String,
        gender: String,
    ) -> Result<MenteeModel, CoreError> {
        if full_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "mentee full name must not be empty".to_owned(),
            ));
        }
        guard::require_gender(&gender)?;
        let mentee = guard::require_mentee(&self.db, mentee_id).await?;

        let mut active = mentee.into_active_model();
        active.full_name = Set(full_name);
        active.gender = Set(gender);
        Ok(active.update(&self.db).await?)
    }

    pub async fn soft_delete(&self, mentee_id: MenteeId) -> Result<MenteeModel, CoreError> {
        let mentee = guard::require_mentee(&self.db, mentee_id).await?;

        let mut active = mentee.into_active_model();
        active.deleted_at = Set(Some(Utc::now()));
        Ok(active.update(&self.db).await?)
    }

    pub async fn restore(&self, mentee_id: MenteeId) -> Result<MenteeModel, CoreError> {
        let mentee = Mentee::find_by_id(mentee_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Mentee))?;

        if !mentee.is_deleted() {
            return Err(CoreError::NotDeleted(EntityKind::Mentee));
        }

        let mut active = mentee.into_active_model();
        active.deleted_at = Set(None);
        Ok(active.update(&self.db).await?)
    }

    /// Irreversibly remove an already-tombstoned mentee. Admin only. The
    /// mentee's move history and attendance cascade away with the row.
    pub async fn hard_delete(
        &self,
        mentee_id: MenteeId,
        acting_user: UserId,
    ) -> Result<(), CoreError> {
        guard::require_actor(&self.db, acting_user, Role::Admin).await?;

        let mentee = Mentee::find_by_id(mentee_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Mentee))?;

        if !mentee.is_deleted() {
            return Err(CoreError::NotDeleted(EntityKind::Mentee));
        }

        Mentee::delete_by_id(mentee_id).exec(&self.db).await?;
        info!(%mentee_id, "mentee hard-deleted");
        Ok(())
    }
}

//! The membership transition engine.
//!
//! The two state-changing operations — reassigning a group's mentor and
//! moving a mentee between groups — each run as one transaction that appends
//! an immutable history row and compare-and-sets the entity's current-state
//! pointer. The history timeline is the source of truth; the pointer is a
//! cache of the last committed transition and can be rebuilt from the
//! timeline with the resync operations.

use chrono::Utc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info};

use crate::{
    entity::prelude::*,
    error::{CoreError, EntityKind},
    ids::{GroupId, MenteeId, UserId},
    service::guard,
};

/// Result of a transition request.
///
/// Asking for a state the entity is already in is not an error and produces
/// no history row; callers can tell the two apart without inspecting errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome<T> {
    /// The transition committed; carries the freshly written history row.
    Changed(T),
    /// The entity was already in the requested state.
    Unchanged,
}

impl<T> TransitionOutcome<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn changed(self) -> Option<T> {
        match self {
            Self::Changed(row) => Some(row),
            Self::Unchanged => None,
        }
    }
}

#[derive(Clone)]
pub struct MembershipService {
    db: DatabaseConnection,
}

impl MembershipService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reassign a group's mentor.
    ///
    /// Writes a `group_mentor_history` row and updates the group pointer in
    /// one transaction. Reassigning to the incumbent mentor returns
    /// [`TransitionOutcome::Unchanged`] without touching the database.
    pub async fn reassign_mentor(
        &self,
        group_id: GroupId,
        new_mentor: UserId,
        acting_user: UserId,
        notes: Option<String>,
    ) -> Result<TransitionOutcome<GroupMentorHistoryModel>, CoreError> {
        guard::require_actor(&self.db, acting_user, Role::Mentor).await?;
        let group = guard::require_group(&self.db, group_id).await?;
        guard::require_mentor(&self.db, new_mentor).await?;

        if group.current_mentor == Some(new_mentor) {
            debug!(%group_id, %new_mentor, "mentor unchanged, skipping transition");
            return Ok(TransitionOutcome::Unchanged);
        }

        let row = self
            .apply_reassign(group_id, group.current_mentor, new_mentor, acting_user, notes)
            .await?;

        info!(%group_id, %new_mentor, history_id = row.id, "mentor reassigned");
        Ok(TransitionOutcome::Changed(row))
    }

    /// The transactional tail of [`reassign_mentor`](Self::reassign_mentor):
    /// append the history row, then compare-and-set the pointer against the
    /// mentor observed at precondition time. A stale observation means a
    /// concurrent transition won; the whole transaction rolls back.
    pub(crate) async fn apply_reassign(
        &self,
        group_id: GroupId,
        observed_mentor: Option<UserId>,
        new_mentor: UserId,
        acting_user: UserId,
        notes: Option<String>,
    ) -> Result<GroupMentorHistoryModel, CoreError> {
        let txn = self.db.begin().await?;

        let history = GroupMentorHistoryActiveModel {
            id: NotSet,
            group_id: Set(group_id),
            from_mentor: Set(observed_mentor),
            to_mentor: Set(new_mentor),
            changed_at: Set(Utc::now()),
            changed_by: Set(Some(acting_user)),
            notes: Set(notes),
            deleted_at: Set(None),
        };
        let row = GroupMentorHistory::insert(history)
            .exec_with_returning(&txn)
            .await?;

        let pointer_matches: SimpleExpr = match observed_mentor {
            Some(mentor) => GroupColumn::CurrentMentor.eq(mentor),
            None => GroupColumn::CurrentMentor.is_null(),
        };
        let update = Group::update_many()
            .col_expr(GroupColumn::CurrentMentor, Expr::value(new_mentor))
            .filter(GroupColumn::Id.eq(group_id))
            .filter(pointer_matches)
            .exec(&txn)
            .await?;

        if update.rows_affected == 0 {
            txn.rollback().await?;
            return Err(CoreError::ConcurrentModification);
        }

        txn.commit().await?;
        Ok(row)
    }

    /// Move a mentee to another group.
    ///
    /// Mirrors [`reassign_mentor`](Self::reassign_mentor) over
    /// `mentee_group_history` and the mentee's `current_group` pointer.
    pub async fn move_mentee(
        &self,
        mentee_id: MenteeId,
        new_group: GroupId,
        acting_user: UserId,
        notes: Option<String>,
    ) -> Result<TransitionOutcome<MenteeGroupHistoryModel>, CoreError> {
        guard::require_actor(&self.db, acting_user, Role::Mentor).await?;
        let mentee = guard::require_mentee(&self.db, mentee_id).await?;
        guard::require_group(&self.db, new_group).await?;

        if mentee.current_group == new_group {
            debug!(%mentee_id, %new_group, "group unchanged, skipping transition");
            return Ok(TransitionOutcome::Unchanged);
        }

        let row = self
            .apply_move(mentee_id, mentee.current_group, new_group, acting_user, notes)
            .await?;

        info!(%mentee_id, %new_group, history_id = row.id, "mentee moved");
        Ok(TransitionOutcome::Changed(row))
    }

    pub(crate) async fn apply_move(
        &self,
        mentee_id: MenteeId,
        observed_group: GroupId,
        new_group: GroupId,
        acting_user: UserId,
        notes: Option<String>,
    ) -> Result<MenteeGroupHistoryModel, CoreError> {
        let txn = self.db.begin().await?;

        let history = MenteeGroupHistoryActiveModel {
            id: NotSet,
            mentee_id: Set(mentee_id),
            from_group: Set(Some(observed_group)),
            to_group: Set(new_group),
            moved_at: Set(Utc::now()),
            moved_by: Set(Some(acting_user)),
            notes: Set(notes),
            deleted_at: Set(None),
        };
        let row = MenteeGroupHistory::insert(history)
            .exec_with_returning(&txn)
            .await?;

        let update = Mentee::update_many()
            .col_expr(MenteeColumn::CurrentGroup, Expr::value(new_group))
            .filter(MenteeColumn::Id.eq(mentee_id))
            .filter(MenteeColumn::CurrentGroup.eq(observed_group))
            .exec(&txn)
            .await?;

        if update.rows_affected == 0 {
            txn.rollback().await?;
            return Err(CoreError::ConcurrentModification);
        }

        txn.commit().await?;
        Ok(row)
    }

    /// Timeline of mentor reassignments for a group, oldest first.
    ///
    /// The returned [`Select`] is the lazy form of the timeline — it can be
    /// `.all()`d, paginated, or streamed, and re-running it restarts the
    /// sequence. Ordering is `changed_at` ascending with the insertion-order
    /// id as tie-break.
    pub fn group_timeline_query(
        group_id: GroupId,
        include_deleted: bool,
    ) -> Select<GroupMentorHistory> {
        let mut query =
            GroupMentorHistory::find().filter(GroupMentorHistoryColumn::GroupId.eq(group_id));
        if !include_deleted {
            query = query.filter(GroupMentorHistoryColumn::DeletedAt.is_null());
        }
        query
            .order_by_asc(GroupMentorHistoryColumn::ChangedAt)
            .order_by_asc(GroupMentorHistoryColumn::Id)
    }

    pub async fn group_timeline(
        &self,
        group_id: GroupId,
        include_deleted: bool,
    ) -> Result<Vec<GroupMentorHistoryModel>, CoreError> {
        Ok(Self::group_timeline_query(group_id, include_deleted)
            .all(&self.db)
            .await?)
    }

    /// Timeline of group moves for a mentee, oldest first.
    pub fn mentee_timeline_query(
        mentee_id: MenteeId,
        include_deleted: bool,
    ) -> Select<MenteeGroupHistory> {
        let mut query =
            MenteeGroupHistory::find().filter(MenteeGroupHistoryColumn::MenteeId.eq(mentee_id));
        if !include_deleted {
            query = query.filter(MenteeGroupHistoryColumn::DeletedAt.is_null());
        }
        query
            .order_by_asc(MenteeGroupHistoryColumn::MovedAt)
            .order_by_asc(MenteeGroupHistoryColumn::Id)
    }

    pub async fn mentee_timeline(
        &self,
        mentee_id: MenteeId,
        include_deleted: bool,
    ) -> Result<Vec<MenteeGroupHistoryModel>, CoreError> {
        Ok(Self::mentee_timeline_query(mentee_id, include_deleted)
            .all(&self.db)
            .await?)
    }

    /// Current mentor of a group, derived from the timeline.
    ///
    /// Falls back to the stored pointer only when no non-deleted history row
    /// exists (a group created with a founding mentor and never reassigned).
    /// A pointer that disagrees with the timeline is ignored.
    pub async fn current_mentor(&self, group_id: GroupId) -> Result<Option<UserId>, CoreError> {
        let group = Group::find_by_id(group_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Group))?;

        derived_current_mentor(&self.db, &group).await
    }

    /// Current group of a mentee, derived the same way as
    /// [`current_mentor`](Self::current_mentor).
    pub async fn current_group(&self, mentee_id: MenteeId) -> Result<GroupId, CoreError> {
        let mentee = Mentee::find_by_id(mentee_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Mentee))?;

        derived_current_group(&self.db, &mentee).await
    }

    /// Recompute a group's mentor pointer from its timeline and persist it.
    /// Returns the value the pointer now holds.
    pub async fn resync_group_pointer(
        &self,
        group_id: GroupId,
    ) -> Result<Option<UserId>, CoreError> {
        let group = Group::find_by_id(group_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Group))?;

        let derived = derived_current_mentor(&self.db, &group).await?;
        if group.current_mentor != derived {
            info!(%group_id, "repairing diverged mentor pointer");
            self.apply_group_resync(group_id, group.current_mentor, derived)
                .await?;
        }
        Ok(derived)
    }

    /// Compare-and-set tail of [`resync_group_pointer`]: only overwrite the
    /// pointer value the derivation was based on. If a concurrent transition
    /// moved the pointer in between, this resync is stale and must not
    /// clobber the newer value.
    pub(crate) async fn apply_group_resync(
        &self,
        group_id: GroupId,
        observed_mentor: Option<UserId>,
        derived_mentor: Option<UserId>,
    ) -> Result<(), CoreError> {
        let pointer_matches: SimpleExpr = match observed_mentor {
            Some(mentor) => GroupColumn::CurrentMentor.eq(mentor),
            None => GroupColumn::CurrentMentor.is_null(),
        };
        let update = Group::update_many()
            .col_expr(GroupColumn::CurrentMentor, Expr::value(derived_mentor))
            .filter(GroupColumn::Id.eq(group_id))
            .filter(pointer_matches)
            .exec(&self.db)
            .await?;

        if update.rows_affected == 0 {
            return Err(CoreError::ConcurrentModification);
        }
        Ok(())
    }

    pub async fn resync_mentee_pointer(&self, mentee_id: MenteeId) -> Result<GroupId, CoreError> {
        let mentee = Mentee::find_by_id(mentee_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Mentee))?;

        let derived = derived_current_group(&self.db, &mentee).await?;
        if mentee.current_group != derived {
            info!(%mentee_id, "repairing diverged group pointer");
            self.apply_mentee_resync(mentee_id, mentee.current_group, derived)
                .await?;
        }
        Ok(derived)
    }

    pub(crate) async fn apply_mentee_resync(
        &self,
        mentee_id: MenteeId,
        observed_group: GroupId,
        derived_group: GroupId,
    ) -> Result<(), CoreError> {
        let update = Mentee::update_many()
            .col_expr(MenteeColumn::CurrentGroup, Expr::value(derived_group))
            .filter(MenteeColumn::Id.eq(mentee_id))
            .filter(MenteeColumn::CurrentGroup.eq(observed_group))
            .exec(&self.db)
            .await?;

        if update.rows_affected == 0 {
            return Err(CoreError::ConcurrentModification);
        }
        Ok(())
    }

    /// Soft-delete a mentor-history row (correction workflow). The row keeps
    /// its content and drops out of default timelines; the group pointer may
    /// now diverge until [`resync_group_pointer`](Self::resync_group_pointer)
    /// runs.
    pub async fn redact_group_history(&self, history_id: i64) -> Result<(), CoreError> {
        let row = GroupMentorHistory::find_by_id(history_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::HistoryRow))?;

        if row.deleted_at.is_some() {
            return Err(CoreError::DeletedEntity(EntityKind::HistoryRow));
        }

        let mut active = row.into_active_model();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn restore_group_history(&self, history_id: i64) -> Result<(), CoreError> {
        let row = GroupMentorHistory::find_by_id(history_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::HistoryRow))?;

        if row.deleted_at.is_none() {
            return Err(CoreError::NotDeleted(EntityKind::HistoryRow));
        }

        let mut active = row.into_active_model();
        active.deleted_at = Set(None);
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn redact_mentee_history(&self, history_id: i64) -> Result<(), CoreError> {
        let row = MenteeGroupHistory::find_by_id(history_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::HistoryRow))?;

        if row.deleted_at.is_some() {
            return Err(CoreError::DeletedEntity(EntityKind::HistoryRow));
        }

        let mut active = row.into_active_model();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn restore_mentee_history(&self, history_id: i64) -> Result<(), CoreError> {
        let row = MenteeGroupHistory::find_by_id(history_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::HistoryRow))?;

        if row.deleted_at.is_none() {
            return Err(CoreError::NotDeleted(EntityKind::HistoryRow));
        }

        let mut active = row.into_active_model();
        active.deleted_at = Set(None);
        active.update(&self.db).await?;
        Ok(())
    }
}

/// Timeline-derived mentor for a group; pointer fallback when the timeline
/// is empty. Shared with the meetings service, which snapshots the mentor at
/// meeting time.
pub(crate) async fn derived_current_mentor<C>(
    db: &C,
    group: &GroupModel,
) -> Result<Option<UserId>, CoreError>
where
    C: ConnectionTrait,
{
    let latest = GroupMentorHistory::find()
        .filter(GroupMentorHistoryColumn::GroupId.eq(group.id))
        .filter(GroupMentorHistoryColumn::DeletedAt.is_null())
        .order_by_desc(GroupMentorHistoryColumn::ChangedAt)
        .order_by_desc(GroupMentorHistoryColumn::Id)
        .one(db)
        .await?;

    Ok(match latest {
        Some(row) => Some(row.to_mentor),
        None => group.current_mentor,
    })
}

pub(crate) async fn derived_current_group<C>(
    db: &C,
    mentee: &MenteeModel,
) -> Result<GroupId, CoreError>
where
    C: ConnectionTrait,
{
    let latest = MenteeGroupHistory::find()
        .filter(MenteeGroupHistoryColumn::MenteeId.eq(mentee.id))
        .filter(MenteeGroupHistoryColumn::DeletedAt.is_null())
        .order_by_desc(MenteeGroupHistoryColumn::MovedAt)
        .order_by_desc(MenteeGroupHistoryColumn::Id)
        .one(db)
        .await?;

    Ok(match latest {
        Some(row) => row.to_group,
        None => mentee.current_group,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_group, insert_mentee, insert_user, setup_test_db};
    use chrono::{TimeZone, Utc};

    async fn setup() -> (MembershipService, DatabaseConnection) {
        let db = setup_test_db().await;
        (MembershipService::new(db.clone()), db)
    }

    #[tokio::test]
    async fn test_founding_mentor_without_history_is_current() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let group = insert_group(&db, Some(mentor_a)).await;

        // No transition yet, so the pointer is the only record
        let timeline = service.group_timeline(group, false).await.unwrap();
        assert!(timeline.is_empty(), "founding mentor writes no history row");

        let current = service.current_mentor(group).await.unwrap();
        assert_eq!(current, Some(mentor_a), "fallback to stored pointer");
    }

    #[tokio::test]
    async fn test_reassign_mentor_appends_history_and_moves_pointer() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let mentor_b = insert_user(&db, Role::Mentor).await;
        let admin = insert_user(&db, Role::Admin).await;
        let group = insert_group(&db, Some(mentor_a)).await;

        let outcome = service
            .reassign_mentor(group, mentor_b, admin, None)
            .await
            .unwrap();

        let row = outcome.changed().expect("transition should commit");
        assert_eq!(row.from_mentor, Some(mentor_a));
        assert_eq!(row.to_mentor, mentor_b);
        assert_eq!(row.changed_by, Some(admin));

        assert_eq!(service.current_mentor(group).await.unwrap(), Some(mentor_b));

        let stored = Group::find_by_id(group).one(&db).await.unwrap().unwrap();
        assert_eq!(stored.current_mentor, Some(mentor_b), "pointer updated");
    }

    #[tokio::test]
    async fn test_reassign_to_incumbent_is_a_no_op() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let admin = insert_user(&db, Role::Admin).await;
        let group = insert_group(&db, Some(mentor_a)).await;

        let outcome = service
            .reassign_mentor(group, mentor_a, admin, None)
            .await
            .unwrap();

        assert!(outcome.is_unchanged());
        let timeline = service.group_timeline(group, false).await.unwrap();
        assert!(timeline.is_empty(), "no-op must not write history");
    }

    #[tokio::test]
    async fn test_reassign_to_non_mentor_fails() {
        let (service, db) = setup().await;
        let admin = insert_user(&db, Role::Admin).await;
        let group = insert_group(&db, None).await;

        let result = service.reassign_mentor(group, admin, admin, None).await;
        assert!(matches!(
            result,
            Err(CoreError::RoleViolation {
                required: Role::Mentor
            })
        ));
    }

    #[tokio::test]
    async fn test_move_mentee_records_timeline() {
        let (service, db) = setup().await;
        let mentor = insert_user(&db, Role::Mentor).await;
        let g1 = insert_group(&db, Some(mentor)).await;
        let g2 = insert_group(&db, Some(mentor)).await;
        let mentee = insert_mentee(&db, g1).await;

        let outcome = service
            .move_mentee(mentee, g2, mentor, Some("reassigned for balance".to_owned()))
            .await
            .unwrap();

        let row = outcome.changed().expect("move should commit");
        assert_eq!(row.from_group, Some(g1));
        assert_eq!(row.to_group, g2);
        assert_eq!(row.notes.as_deref(), Some("reassigned for balance"));

        let timeline = service.mentee_timeline(mentee, false).await.unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(service.current_group(mentee).await.unwrap(), g2);
    }

    #[tokio::test]
    async fn test_move_mentee_to_same_group_is_a_no_op() {
        let (service, db) = setup().await;
        let mentor = insert_user(&db, Role::Mentor).await;
        let g1 = insert_group(&db, Some(mentor)).await;
        let g2 = insert_group(&db, Some(mentor)).await;
        let mentee = insert_mentee(&db, g1).await;

        service.move_mentee(mentee, g2, mentor, None).await.unwrap();
        let outcome = service.move_mentee(mentee, g2, mentor, None).await.unwrap();

        assert!(outcome.is_unchanged());
        let timeline = service.mentee_timeline(mentee, false).await.unwrap();
        assert_eq!(timeline.len(), 1, "repeat move must not append history");
    }

    #[tokio::test]
    async fn test_move_into_soft_deleted_group_fails() {
        let (service, db) = setup().await;
        let mentor = insert_user(&db, Role::Mentor).await;
        let g1 = insert_group(&db, Some(mentor)).await;
        let g2 = insert_group(&db, Some(mentor)).await;
        let mentee = insert_mentee(&db, g1).await;

        let group = Group::find_by_id(g2).one(&db).await.unwrap().unwrap();
        let mut active = group.into_active_model();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&db).await.unwrap();

        let result = service.move_mentee(mentee, g2, mentor, None).await;
        assert!(matches!(
            result,
            Err(CoreError::DeletedEntity(EntityKind::Group))
        ));
    }

    #[tokio::test]
    async fn test_stale_pointer_observation_rolls_back() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let mentor_b = insert_user(&db, Role::Mentor).await;
        let mentor_c = insert_user(&db, Role::Mentor).await;
        let admin = insert_user(&db, Role::Admin).await;
        let group = insert_group(&db, Some(mentor_a)).await;

        // Simulate losing the race: the pointer observed before the
        // transaction (mentor_b) no longer matches the stored value.
        let result = service
            .apply_reassign(group, Some(mentor_b), mentor_c, admin, None)
            .await;
        assert!(matches!(result, Err(CoreError::ConcurrentModification)));

        // The aborted transition must leave no trace: no history row, and
        // the pointer still holds the pre-operation value.
        let timeline = service.group_timeline(group, true).await.unwrap();
        assert!(timeline.is_empty(), "rolled-back history row persisted");
        let stored = Group::find_by_id(group).one(&db).await.unwrap().unwrap();
        assert_eq!(stored.current_mentor, Some(mentor_a));
    }

    #[tokio::test]
    async fn test_stale_mentee_observation_rolls_back() {
        let (service, db) = setup().await;
        let mentor = insert_user(&db, Role::Mentor).await;
        let g1 = insert_group(&db, Some(mentor)).await;
        let g2 = insert_group(&db, Some(mentor)).await;
        let g3 = insert_group(&db, Some(mentor)).await;
        let mentee = insert_mentee(&db, g1).await;

        let result = service.apply_move(mentee, g2, g3, mentor, None).await;
        assert!(matches!(result, Err(CoreError::ConcurrentModification)));

        let timeline = service.mentee_timeline(mentee, true).await.unwrap();
        assert!(timeline.is_empty());
        assert_eq!(service.current_group(mentee).await.unwrap(), g1);
    }

    #[tokio::test]
    async fn test_timeline_orders_equal_timestamps_by_insertion() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let mentor_b = insert_user(&db, Role::Mentor).await;
        let group = insert_group(&db, None).await;

        // Two rows sharing one timestamp, inserted directly
        let instant = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        for mentor in [mentor_a, mentor_b] {
            let row = GroupMentorHistoryActiveModel {
                id: NotSet,
                group_id: Set(group),
                from_mentor: Set(None),
                to_mentor: Set(mentor),
                changed_at: Set(instant),
                changed_by: Set(None),
                notes: Set(None),
                deleted_at: Set(None),
            };
            GroupMentorHistory::insert(row).exec(&db).await.unwrap();
        }

        let timeline = service.group_timeline(group, false).await.unwrap();
        assert_eq!(timeline.len(), 2);
        assert!(timeline[0].id < timeline[1].id, "insertion order tie-break");
        assert_eq!(timeline[0].to_mentor, mentor_a);
        assert_eq!(timeline[1].to_mentor, mentor_b);

        // Latest-by-insertion wins the derived state
        assert_eq!(service.current_mentor(group).await.unwrap(), Some(mentor_b));
    }

    #[tokio::test]
    async fn test_timeline_trumps_diverged_pointer() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let mentor_b = insert_user(&db, Role::Mentor).await;
        let admin = insert_user(&db, Role::Admin).await;
        let group = insert_group(&db, Some(mentor_a)).await;

        service
            .reassign_mentor(group, mentor_b, admin, None)
            .await
            .unwrap();

        // Out-of-band correction: point the cache somewhere stale
        let stored = Group::find_by_id(group).one(&db).await.unwrap().unwrap();
        let mut active = stored.into_active_model();
        active.current_mentor = Set(Some(mentor_a));
        active.update(&db).await.unwrap();

        // Derived state follows the timeline, not the pointer
        assert_eq!(service.current_mentor(group).await.unwrap(), Some(mentor_b));

        // Resync repairs the cache
        let resynced = service.resync_group_pointer(group).await.unwrap();
        assert_eq!(resynced, Some(mentor_b));
        let stored = Group::find_by_id(group).one(&db).await.unwrap().unwrap();
        assert_eq!(stored.current_mentor, Some(mentor_b));
    }

    #[tokio::test]
    async fn test_stale_resync_does_not_clobber_newer_pointer() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let mentor_b = insert_user(&db, Role::Mentor).await;
        let group = insert_group(&db, Some(mentor_b)).await;

        // A resync that observed the pointer before a concurrent transition
        // committed must fail instead of writing its stale derivation
        let result = service
            .apply_group_resync(group, Some(mentor_a), None)
            .await;
        assert!(matches!(result, Err(CoreError::ConcurrentModification)));

        let stored = Group::find_by_id(group).one(&db).await.unwrap().unwrap();
        assert_eq!(stored.current_mentor, Some(mentor_b), "pointer untouched");
    }

    #[tokio::test]
    async fn test_redact_latest_row_then_resync() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let mentor_b = insert_user(&db, Role::Mentor).await;
        let admin = insert_user(&db, Role::Admin).await;
        let group = insert_group(&db, None).await;

        let first = service
            .reassign_mentor(group, mentor_a, admin, None)
            .await
            .unwrap()
            .changed()
            .unwrap();
        let second = service
            .reassign_mentor(group, mentor_b, admin, None)
            .await
            .unwrap()
            .changed()
            .unwrap();

        service.redact_group_history(second.id).await.unwrap();

        // Default timeline hides the redacted row; audit view keeps it
        let timeline = service.group_timeline(group, false).await.unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].id, first.id);
        let audit = service.group_timeline(group, true).await.unwrap();
        assert_eq!(audit.len(), 2);

        // Derived state rolls back to the surviving row; resync repairs the pointer
        assert_eq!(service.current_mentor(group).await.unwrap(), Some(mentor_a));
        assert_eq!(
            service.resync_group_pointer(group).await.unwrap(),
            Some(mentor_a)
        );

        // Restore brings the redacted row back
        service.restore_group_history(second.id).await.unwrap();
        assert_eq!(service.current_mentor(group).await.unwrap(), Some(mentor_b));
    }

    #[tokio::test]
    async fn test_history_rows_reject_content_mutation() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let mentor_b = insert_user(&db, Role::Mentor).await;
        let admin = insert_user(&db, Role::Admin).await;
        let group = insert_group(&db, None).await;

        let row = service
            .reassign_mentor(group, mentor_a, admin, None)
            .await
            .unwrap()
            .changed()
            .unwrap();

        let mut active = row.clone().into_active_model();
        active.to_mentor = Set(mentor_b);
        let result = active.update(&db).await;
        assert!(result.is_err(), "content mutation must be rejected");

        let stored = GroupMentorHistory::find_by_id(row.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.to_mentor, mentor_a);
    }

    #[tokio::test]
    async fn test_blocked_actor_cannot_transition() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let mentor_b = insert_user(&db, Role::Mentor).await;
        let admin = insert_user(&db, Role::Admin).await;
        let group = insert_group(&db, Some(mentor_a)).await;

        let actor = User::find_by_id(mentor_a).one(&db).await.unwrap().unwrap();
        let mut active = actor.into_active_model();
        active.blocked_at = Set(Some(Utc::now()));
        active.block_reason = Set(Some("test".to_owned()));
        active.blocked_by = Set(Some(admin));
        active.update(&db).await.unwrap();

        let result = service.reassign_mentor(group, mentor_b, mentor_a, None).await;
        assert!(matches!(result, Err(CoreError::RoleViolation { .. })));
    }

    #[tokio::test]
    async fn test_blocked_mentor_cannot_be_assigned() {
        let (service, db) = setup().await;
        let mentor_a = insert_user(&db, Role::Mentor).await;
        let mentor_b = insert_user(&db, Role::Mentor).await;
        let admin = insert_user(&db, Role::Admin).await;
        let group = insert_group(&db, Some(mentor_a)).await;

        let target = User::find_by_id(mentor_b).one(&db).await.unwrap().unwrap();
        let mut active = target.into_active_model();
        active.blocked_at = Set(Some(Utc::now()));
        active.block_reason = Set(Some("on leave".to_owned()));
        active.blocked_by = Set(Some(admin));
        active.update(&db).await.unwrap();

        let result = service.reassign_mentor(group, mentor_b, admin, None).await;
        assert!(matches!(
            result,
            Err(CoreError::RoleViolation {
                required: Role::Mentor
            })
        ));

        // The rejected assignment leaves no trace
        let timeline = service.group_timeline(group, true).await.unwrap();
        assert!(timeline.is_empty());
        assert_eq!(service.current_mentor(group).await.unwrap(), Some(mentor_a));
    }

    #[tokio::test]
    async fn test_missing_group_is_not_found() {
        let (service, db) = setup().await;
        let mentor = insert_user(&db, Role::Mentor).await;

        let result = service
            .reassign_mentor(GroupId::new(), mentor, mentor, None)
            .await;
        assert!(matches!(
            result,
            Err(CoreError::NotFound(EntityKind::Group))
        ));
    }
}

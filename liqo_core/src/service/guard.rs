//! Existence, tombstone, and capability checks shared by every service.
//!
//! Each mutating operation runs exactly one capability check through
//! [`require_actor`] instead of re-deriving authorization at call sites.

use sea_orm::ConnectionTrait;

use crate::{
    entity::prelude::*,
    error::{CoreError, EntityKind},
    ids::{GroupId, MeetingId, MenteeId, UserId},
};

/// Fetch a user that must exist and be active.
pub(crate) async fn require_user<C>(db: &C, id: UserId) -> Result<UserModel, CoreError>
where
    C: ConnectionTrait,
{
    let user = User::find_by_id(id)
        .one(db)
        .await?
        .ok_or(CoreError::NotFound(EntityKind::User))?;

    if user.is_deleted() {
        return Err(CoreError::DeletedEntity(EntityKind::User));
    }
    Ok(user)
}

/// Fetch the acting user and verify it may perform an operation that
/// requires `required`. Blocked accounts lose their agency entirely and are
/// rejected the same way as an insufficient role.
pub(crate) async fn require_actor<C>(
    db: &C,
    id: UserId,
    required: Role,
) -> Result<UserModel, CoreError>
where
    C: ConnectionTrait,
{
    let user = require_user(db, id).await?;

    if user.is_blocked() || !user.role.satisfies(required) {
        return Err(CoreError::RoleViolation { required });
    }
    Ok(user)
}

/// Fetch a user that must be an active, unblocked mentor — the only valid
/// target of a mentor assignment.
pub(crate) async fn require_mentor<C>(db: &C, id: UserId) -> Result<UserModel, CoreError>
where
    C: ConnectionTrait,
{
    let user = require_user(db, id).await?;

    if user.is_blocked() || user.role != Role::Mentor {
        return Err(CoreError::RoleViolation {
            required: Role::Mentor,
        });
    }
    Ok(user)
}

pub(crate) async fn require_group<C>(db: &C, id: GroupId) -> Result<GroupModel, CoreError>
where
    C: ConnectionTrait,
{
    let group = Group::find_by_id(id)
        .one(db)
        .await?
        .ok_or(CoreError::NotFound(EntityKind::Group))?;

    if group.is_deleted() {
        return Err(CoreError::DeletedEntity(EntityKind::Group));
    }
    Ok(group)
}

pub(crate) async fn require_mentee<C>(db: &C, id: MenteeId) -> Result<MenteeModel, CoreError>
where
    C: ConnectionTrait,
{
    let mentee = Mentee::find_by_id(id)
        .one(db)
        .await?
        .ok_or(CoreError::NotFound(EntityKind::Mentee))?;

    if mentee.is_deleted() {
        return Err(CoreError::DeletedEntity(EntityKind::Mentee));
    }
    Ok(mentee)
}

pub(crate) async fn require_meeting<C>(db: &C, id: MeetingId) -> Result<MeetingModel, CoreError>
where
    C: ConnectionTrait,
{
    let meeting = Meeting::find_by_id(id)
        .one(db)
        .await?
        .ok_or(CoreError::NotFound(EntityKind::Meeting))?;

    if meeting.is_deleted() {
        return Err(CoreError::DeletedEntity(EntityKind::Meeting));
    }
    Ok(meeting)
}

/// Non-empty after trimming; mentee records must always carry a gender.
pub(crate) fn require_gender(gender: &str) -> Result<(), CoreError> {
    if gender.trim().is_empty() {
        return Err(CoreError::Validation(
            "mentee gender must not be empty".to_owned(),
        ));
    }
    Ok(())
}

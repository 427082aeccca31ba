use sea_orm::DbErr;
use std::fmt;
use thiserror::Error;

use crate::entity::user::Role;

/// Which table a failed lookup or lifecycle operation was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Group,
    Mentee,
    Meeting,
    Attendance,
    HistoryRow,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Group => "group",
            EntityKind::Mentee => "mentee",
            EntityKind::Meeting => "meeting",
            EntityKind::Attendance => "attendance",
            EntityKind::HistoryRow => "history row",
        };
        f.write_str(name)
    }
}

/// Error taxonomy shared by every service in this crate.
///
/// No-op transitions are not errors; they come back as
/// [`TransitionOutcome::Unchanged`](crate::service::membership::TransitionOutcome).
/// The HTTP layer owns user-facing text and maps these variants to status
/// codes; nothing here is formatted for end users.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("fatal database error")]
    Db(#[from] DbErr),

    #[error("{0} not found")]
    NotFound(EntityKind),

    #[error("{0} is soft-deleted")]
    DeletedEntity(EntityKind),

    #[error("actor or target lacks required role {required:?}")]
    RoleViolation { required: Role },

    #[error("{0} is not soft-deleted")]
    NotDeleted(EntityKind),

    #[error("concurrent modification, caller should retry")]
    ConcurrentModification,

    #[error("validation failed: {0}")]
    Validation(String),
}

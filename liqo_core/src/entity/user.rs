use crate::ids::UserId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Role {
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "mentor")]
    Mentor,
}

impl Role {
    /// Whether this role may administer accounts (block/unblock, hard delete).
    pub fn can_administer(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    /// Whether this role covers an operation gated on `required`.
    /// Roles are strictly ordered: super_admin > admin > mentor.
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::Mentor => true,
            Role::Admin => self.can_administer(),
            Role::SuperAdmin => matches!(self, Self::SuperAdmin),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,

    /// Set together with `block_reason`/`blocked_by` while the account is
    /// blocked, all three cleared on unblock.
    pub blocked_at: Option<DateTimeUtc>,
    pub block_reason: Option<String>,
    pub blocked_by: Option<UserId>,

    pub created_at: DateTimeUtc,
    /// Soft-delete tombstone.
    pub deleted_at: Option<DateTimeUtc>,
}

impl Model {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

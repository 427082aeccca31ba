use crate::ids::{GroupId, UserId};
use sea_orm::entity::prelude::*;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

/// One mentor reassignment on a group, append-only.
///
/// The integer key doubles as the tie-break for rows sharing a `changed_at`
/// timestamp: timeline order is `changed_at ASC, id ASC`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_mentor_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: GroupId,
    /// `None` means the group had no mentor before this transition.
    pub from_mentor: Option<UserId>,
    pub to_mentor: UserId,
    pub changed_at: DateTimeUtc,
    /// Nullable only so a hard-deleted actor leaves the row intact.
    pub changed_by: Option<UserId>,
    pub notes: Option<String>,

    /// Correction tombstone, the only column that may change after insert.
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id"
    )]
    Group,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    // Audit rows are immutable: after insert, only the tombstone may change.
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert
            && (self.group_id.is_set()
                || self.from_mentor.is_set()
                || self.to_mentor.is_set()
                || self.changed_at.is_set()
                || self.changed_by.is_set()
                || self.notes.is_set())
        {
            return Err(DbErr::Custom(
                "group_mentor_history rows are immutable".to_owned(),
            ));
        }
        Ok(self)
    }
}

use crate::ids::{GroupId, MenteeId, UserId};
use sea_orm::entity::prelude::*;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

/// One mentee move between groups, append-only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mentee_group_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub mentee_id: MenteeId,
    /// `None` means the mentee was newly assigned with no prior group.
    pub from_group: Option<GroupId>,
    pub to_group: GroupId,
    pub moved_at: DateTimeUtc,
    pub moved_by: Option<UserId>,
    pub notes: Option<String>,

    /// Correction tombstone, the only column that may change after insert.
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mentee::Entity",
        from = "Column::MenteeId",
        to = "super::mentee::Column::Id"
    )]
    Mentee,
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::ToGroup",
        to = "super::group::Column::Id"
    )]
    ToGroup,
}

impl Related<super::mentee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mentee.def()
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
            && (self.mentee_id.is_set()
                || self.from_group.is_set()
                || self.to_group.is_set()
                || self.moved_at.is_set()
                || self.moved_by.is_set()
                || self.notes.is_set())
        {
            return Err(DbErr::Custom(
                "mentee_group_history rows are immutable".to_owned(),
            ));
        }
        Ok(self)
    }
}

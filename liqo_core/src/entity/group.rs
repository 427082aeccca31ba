use crate::ids::{GroupId, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: GroupId,
    pub name: String,
    pub description: String,

    /// Cache of the latest mentor assignment. The mentor-history timeline is
    /// the source of truth; this column only stands alone for groups created
    /// with a founding mentor and no transition yet.
    pub current_mentor: Option<UserId>,

    pub created_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

impl Model {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CurrentMentor",
        to = "super::user::Column::Id"
    )]
    Mentor,
    #[sea_orm(has_many = "super::mentee::Entity")]
    Mentees,
    #[sea_orm(has_many = "super::meeting::Entity")]
    Meetings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mentor.def()
    }
}

impl Related<super::mentee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mentees.def()
    }
}

impl Related<super::meeting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meetings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

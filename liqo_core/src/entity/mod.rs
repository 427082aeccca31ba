// SeaORM entities for the Jejak Liqo data model: identity, groups, mentees,
// meetings/attendance, and the two append-only history tables.

pub mod attendance;
pub mod group;
pub mod group_mentor_history;
pub mod meeting;
pub mod mentee;
pub mod mentee_group_history;
pub mod user;

#[cfg(test)]
mod tests;

pub mod prelude {
    // Re-export all entities for convenience
    pub use super::attendance::{
        ActiveModel as AttendanceActiveModel, AttendanceStatus, Column as AttendanceColumn,
        Entity as Attendance, Model as AttendanceModel,
    };
    pub use super::group::{
        ActiveModel as GroupActiveModel, Column as GroupColumn, Entity as Group,
        Model as GroupModel,
    };
    pub use super::group_mentor_history::{
        ActiveModel as GroupMentorHistoryActiveModel, Column as GroupMentorHistoryColumn,
        Entity as GroupMentorHistory, Model as GroupMentorHistoryModel,
    };
    pub use super::meeting::{
        ActiveModel as MeetingActiveModel, Column as MeetingColumn, Entity as Meeting,
        MeetingKind, Model as MeetingModel,
    };
    pub use super::mentee::{
        ActiveModel as MenteeActiveModel, Column as MenteeColumn, Entity as Mentee,
        MenteeStatus, Model as MenteeModel,
    };
    pub use super::mentee_group_history::{
        ActiveModel as MenteeGroupHistoryActiveModel, Column as MenteeGroupHistoryColumn,
        Entity as MenteeGroupHistory, Model as MenteeGroupHistoryModel,
    };
    pub use super::user::{
        ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
        Role,
    };

    // Re-export commonly used SeaORM types and traits
    pub use sea_orm::prelude::DateTimeUtc;
    pub use sea_orm::{
        ActiveModelTrait,
        ActiveValue,

        ColumnTrait,
        ConnectionTrait,

        // Database and connection types
        Database,
        DatabaseConnection,
        DbConn,
        // Common result types
        DbErr,
        Delete,

        // Core traits
        EntityTrait,
        Insert,
        IntoActiveModel,
        ModelTrait,
        NotSet,
        PaginatorTrait,
        QueryFilter,
        QueryOrder,
        QuerySelect,
        Related,
        RelationTrait,
        // Query builders
        Select,
        // Active model helpers
        Set,
        TransactionTrait,

        Unchanged,
        Update,
    };
}

use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260825_000004_create_group_mentor_histories_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupMentorHistory::Table)
                    .col(
                        ColumnDef::new(GroupMentorHistory::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GroupMentorHistory::GroupId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GroupMentorHistory::FromMentor).uuid().null())
                    .col(
                        ColumnDef::new(GroupMentorHistory::ToMentor)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupMentorHistory::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GroupMentorHistory::ChangedBy).uuid().null())
                    .col(ColumnDef::new(GroupMentorHistory::Notes).string().null())
                    .col(
                        ColumnDef::new(GroupMentorHistory::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_mentor_history_group_id")
                            .from(GroupMentorHistory::Table, GroupMentorHistory::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_mentor_history_from_mentor")
                            .from(GroupMentorHistory::Table, GroupMentorHistory::FromMentor)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_mentor_history_to_mentor")
                            .from(GroupMentorHistory::Table, GroupMentorHistory::ToMentor)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_mentor_history_changed_by")
                            .from(GroupMentorHistory::Table, GroupMentorHistory::ChangedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Timeline reads are always (group_id, changed_at, id)
        manager
            .create_index(
                Index::create()
                    .name("idx_group_mentor_histories_group_changed")
                    .table(GroupMentorHistory::Table)
                    .col(GroupMentorHistory::GroupId)
                    .col(GroupMentorHistory::ChangedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GroupMentorHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum GroupMentorHistory {
    Table,
    Id,
    GroupId,
    FromMentor,
    ToMentor,
    ChangedAt,
    ChangedBy,
    Notes,
    DeletedAt,
}

#[derive(Iden)]
enum Group {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

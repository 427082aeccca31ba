use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260825_000005_create_mentee_group_histories_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenteeGroupHistory::Table)
                    .col(
                        ColumnDef::new(MenteeGroupHistory::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MenteeGroupHistory::MenteeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MenteeGroupHistory::FromGroup).uuid().null())
                    .col(
                        ColumnDef::new(MenteeGroupHistory::ToGroup)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenteeGroupHistory::MovedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MenteeGroupHistory::MovedBy).uuid().null())
                    .col(ColumnDef::new(MenteeGroupHistory::Notes).string().null())
                    .col(
                        ColumnDef::new(MenteeGroupHistory::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentee_group_history_mentee_id")
                            .from(MenteeGroupHistory::Table, MenteeGroupHistory::MenteeId)
                            .to(Mentee::Table, Mentee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentee_group_history_from_group")
                            .from(MenteeGroupHistory::Table, MenteeGroupHistory::FromGroup)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentee_group_history_to_group")
                            .from(MenteeGroupHistory::Table, MenteeGroupHistory::ToGroup)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentee_group_history_moved_by")
                            .from(MenteeGroupHistory::Table, MenteeGroupHistory::MovedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Timeline reads are always (mentee_id, moved_at, id)
        manager
            .create_index(
                Index::create()
                    .name("idx_mentee_group_histories_mentee_moved")
                    .table(MenteeGroupHistory::Table)
                    .col(MenteeGroupHistory::MenteeId)
                    .col(MenteeGroupHistory::MovedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenteeGroupHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MenteeGroupHistory {
    Table,
    Id,
    MenteeId,
    FromGroup,
    ToGroup,
    MovedAt,
    MovedBy,
    Notes,
    DeletedAt,
}

#[derive(Iden)]
enum Mentee {
    Table,
    Id,
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

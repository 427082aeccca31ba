use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260825_000006_create_meetings_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meeting::Table)
                    .col(ColumnDef::new(Meeting::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Meeting::GroupId).uuid().not_null())
                    .col(ColumnDef::new(Meeting::MentorId).uuid().null())
                    .col(
                        ColumnDef::new(Meeting::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Meeting::Kind).string_len(20).not_null())
                    .col(ColumnDef::new(Meeting::Topic).string().not_null())
                    .col(ColumnDef::new(Meeting::Place).string().null())
                    .col(ColumnDef::new(Meeting::Notes).string().null())
                    .col(
                        ColumnDef::new(Meeting::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Meeting::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meeting_group_id")
                            .from(Meeting::Table, Meeting::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meeting_mentor_id")
                            .from(Meeting::Table, Meeting::MentorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meetings_group_id")
                    .table(Meeting::Table)
                    .col(Meeting::GroupId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Meeting::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Meeting {
    Table,
    Id,
    GroupId,
    MentorId,
    Date,
    Kind,
    Topic,
    Place,
    Notes,
    CreatedAt,
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

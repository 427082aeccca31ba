use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260825_000007_create_attendances_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::MeetingId).uuid().not_null())
                    .col(ColumnDef::new(Attendance::MenteeId).uuid().not_null())
                    .col(ColumnDef::new(Attendance::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Attendance::Notes).string().null())
                    .col(
                        ColumnDef::new(Attendance::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attendance::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_meeting_id")
                            .from(Attendance::Table, Attendance::MeetingId)
                            .to(Meeting::Table, Meeting::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_mentee_id")
                            .from(Attendance::Table, Attendance::MenteeId)
                            .to(Mentee::Table, Mentee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One attendance row per (meeting, mentee)
        manager
            .create_index(
                Index::create()
                    .name("idx_attendances_meeting_mentee_unique")
                    .table(Attendance::Table)
                    .col(Attendance::MeetingId)
                    .col(Attendance::MenteeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendances_mentee_id")
                    .table(Attendance::Table)
                    .col(Attendance::MenteeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Attendance {
    Table,
    Id,
    MeetingId,
    MenteeId,
    Status,
    Notes,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Meeting {
    Table,
    Id,
}

#[derive(Iden)]
enum Mentee {
    Table,
    Id,
}

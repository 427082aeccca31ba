use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260825_000003_create_mentees_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mentee::Table)
                    .col(ColumnDef::new(Mentee::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Mentee::FullName).string().not_null())
                    .col(ColumnDef::new(Mentee::Gender).string().not_null())
                    .col(ColumnDef::new(Mentee::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Mentee::CurrentGroup).uuid().not_null())
                    .col(
                        ColumnDef::new(Mentee::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Mentee::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentee_current_group")
                            .from(Mentee::Table, Mentee::CurrentGroup)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_mentees_current_group")
                    .table(Mentee::Table)
                    .col(Mentee::CurrentGroup)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mentee::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Mentee {
    Table,
    Id,
    FullName,
    Gender,
    Status,
    CurrentGroup,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Group {
    Table,
    Id,
}

//! Create `developer` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Developer::Table)
                    .if_not_exists()
                    .col(uuid(Developer::Id).primary_key())
                    .col(string_len(Developer::Name, 64).unique_key().not_null())
                    .col(text(Developer::Description).not_null())
                    .col(timestamp_with_time_zone(Developer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Developer::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Developer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Developer { Table, Id, Name, Description, CreatedAt, UpdatedAt }

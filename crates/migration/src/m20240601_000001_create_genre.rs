//! Create `genre` table.
//!
//! Catalog taxonomy; games reference it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(uuid(Genre::Id).primary_key())
                    .col(string_len(Genre::Name, 64).unique_key().not_null())
                    .col(text(Genre::Description).not_null())
                    .col(timestamp_with_time_zone(Genre::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Genre::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Genre::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Genre { Table, Id, Name, Description, CreatedAt, UpdatedAt }

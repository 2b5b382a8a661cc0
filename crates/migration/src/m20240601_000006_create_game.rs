//! Create `game` table with FKs to `genre` and `developer`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .if_not_exists()
                    .col(uuid(Game::Id).primary_key())
                    .col(string_len(Game::Name, 128).not_null())
                    .col(text(Game::Description).not_null())
                    .col(integer(Game::Year).not_null())
                    .col(string_len(Game::Grade, 16).not_null())
                    .col(uuid(Game::GenreId).not_null())
                    .col(uuid(Game::DeveloperId).not_null())
                    .col(ColumnDef::new(Game::PhotoPath).string_len(255).null())
                    .col(timestamp_with_time_zone(Game::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Game::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_genre")
                            .from(Game::Table, Game::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_developer")
                            .from(Game::Table, Game::DeveloperId)
                            .to(Developer::Table, Developer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Game::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
    Name,
    Description,
    Year,
    Grade,
    GenreId,
    DeveloperId,
    PhotoPath,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Genre { Table, Id }

#[derive(DeriveIden)]
enum Developer { Table, Id }

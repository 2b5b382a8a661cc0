use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Game: lookup by genre and developer
        manager
            .create_index(
                Index::create()
                    .name("idx_game_genre")
                    .table(Game::Table)
                    .col(Game::GenreId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_game_developer")
                    .table(Game::Table)
                    .col(Game::DeveloperId)
                    .to_owned(),
            )
            .await?;

        // Game: keyword search and sort both hit the name column
        manager
            .create_index(
                Index::create()
                    .name("idx_game_name")
                    .table(Game::Table)
                    .col(Game::Name)
                    .to_owned(),
            )
            .await?;

        // Address: lookup by owning user
        manager
            .create_index(
                Index::create()
                    .name("idx_address_user")
                    .table(Address::Table)
                    .col(Address::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_game_genre").table(Game::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_game_developer").table(Game::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_game_name").table(Game::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_address_user").table(Address::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Game { Table, GenreId, DeveloperId, Name }

#[derive(DeriveIden)]
enum Address { Table, UserId }

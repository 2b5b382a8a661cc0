use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{address, db, developer, game, genre, user, user_credentials};

async fn connect_migrated() -> Result<Option<sea_orm::DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return Ok(None);
        }
    };
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

#[tokio::test]
async fn genre_create_and_find() -> Result<()> {
    let Some(db) = connect_migrated().await? else { return Ok(()) };

    let name = format!("genre_{}", Uuid::new_v4());
    let created = genre::create(&db, &name, "A test genre").await?;
    assert_eq!(created.name, name);
    assert_eq!(created.created_at, created.updated_at);

    assert!(genre::exists_by_name(&db, &name).await?);
    let found = genre::Entity::find_by_id(created.id).one(&db).await?;
    assert_eq!(found.map(|g| g.id), Some(created.id));

    genre::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn game_create_with_relations() -> Result<()> {
    let Some(db) = connect_migrated().await? else { return Ok(()) };

    let g = genre::create(&db, &format!("genre_{}", Uuid::new_v4()), "Genre desc").await?;
    let d = developer::create(&db, &format!("dev_{}", Uuid::new_v4()), "Dev desc").await?;

    let created = game::create(&db, "Chrono Trigger", "Time travel RPG", 1995, "A", g.id, d.id).await?;
    assert_eq!(created.genre_id, g.id);
    assert_eq!(created.developer_id, d.id);
    assert!(created.photo_path.is_none());

    let with_photo = game::set_photo_path(&db, created.id, "game/abc.png").await?;
    assert_eq!(with_photo.photo_path.as_deref(), Some("game/abc.png"));

    game::Entity::delete_by_id(created.id).exec(&db).await?;
    genre::Entity::delete_by_id(g.id).exec(&db).await?;
    developer::Entity::delete_by_id(d.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn user_with_credentials_and_address() -> Result<()> {
    let Some(db) = connect_migrated().await? else { return Ok(()) };

    let email = format!("u_{}@example.com", Uuid::new_v4());
    let u = user::create(&db, &email, "Test User").await?;

    let cred = user_credentials::upsert_password(&db, u.id, "$argon2id$fakehash".into(), "argon2").await?;
    assert_eq!(cred.user_id, u.id);

    // Second upsert must update, not insert
    let cred2 = user_credentials::upsert_password(&db, u.id, "$argon2id$other".into(), "argon2").await?;
    assert_eq!(cred2.id, cred.id);
    assert_eq!(cred2.password_hash, "$argon2id$other");

    let addr = address::upsert_for_user(
        &db,
        u.id,
        address::AddressInput {
            street: "Main St 1".into(),
            complement: None,
            neighborhood: "Center".into(),
            city: "Springfield".into(),
            state: "SP".into(),
            zip_code: "12345".into(),
        },
    )
    .await?;
    assert_eq!(addr.user_id, u.id);

    // FK cascade removes credentials and address
    user::hard_delete(&db, u.id).await?;
    assert!(user_credentials::find_by_user(&db, u.id).await?.is_none());
    assert!(address::find_by_user(&db, u.id).await?.is_none());
    Ok(())
}

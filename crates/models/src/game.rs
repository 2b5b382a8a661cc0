use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::{developer, genre};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub year: i32,
    pub grade: String,
    pub genre_id: Uuid,
    pub developer_id: Uuid,
    pub photo_path: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Genre,
    Developer,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Genre => Entity::belongs_to(genre::Entity)
                .from(Column::GenreId)
                .to(genre::Column::Id)
                .into(),
            Relation::Developer => Entity::belongs_to(developer::Entity)
                .from(Column::DeveloperId)
                .to(developer::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    let trimmed = name.trim();
    if trimmed.len() < 2 || trimmed.len() > 128 {
        return Err(errors::ModelError::Validation("name must be 2..=128 characters".into()));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), errors::ModelError> {
    if description.trim().len() < 3 {
        return Err(errors::ModelError::Validation("description must be at least 3 characters".into()));
    }
    Ok(())
}

pub fn validate_year(year: i32) -> Result<(), errors::ModelError> {
    if !(1950..=2100).contains(&year) {
        return Err(errors::ModelError::Validation("year must be in 1950..=2100".into()));
    }
    Ok(())
}

pub fn validate_grade(grade: &str) -> Result<(), errors::ModelError> {
    if grade.trim().is_empty() || grade.len() > 16 {
        return Err(errors::ModelError::Validation("grade required (max 16 characters)".into()));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
    year: i32,
    grade: &str,
    genre_id: Uuid,
    developer_id: Uuid,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_description(description)?;
    validate_year(year)?;
    validate_grade(grade)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        year: Set(year),
        grade: Set(grade.to_string()),
        genre_id: Set(genre_id),
        developer_id: Set(developer_id),
        photo_path: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Record where the uploaded photo landed on disk.
pub async fn set_photo_path(db: &DatabaseConnection, id: Uuid, path: &str) -> Result<Model, errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("game not found".into()))?
        .into();
    found.photo_path = Set(Some(path.to_string()));
    found.updated_at = Set(Utc::now().into());
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::developer::{self, Entity as DeveloperEntity};

use crate::errors::ServiceError;
use crate::export::{self, CellValue, Column};
use crate::pagination::{PageRequest, SortOrder};
use crate::patch::{merge, Patch};

/// Partial update for a developer; absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DeveloperPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Patch for DeveloperPatch {
    type Target = developer::Model;

    fn apply_to(self, target: &mut developer::Model) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(description) = self.description {
            target.description = description;
        }
    }
}

fn sort_column(field: &str) -> Result<developer::Column, ServiceError> {
    match field {
        "name" => Ok(developer::Column::Name),
        "description" => Ok(developer::Column::Description),
        "created_at" | "createdAt" => Ok(developer::Column::CreatedAt),
        "updated_at" | "updatedAt" => Ok(developer::Column::UpdatedAt),
        other => Err(ServiceError::Validation(format!("unknown sort field: {other}"))),
    }
}

pub async fn create(db: &DatabaseConnection, name: &str, description: &str) -> Result<developer::Model, ServiceError> {
    if developer::exists_by_name(db, name).await? {
        return Err(ServiceError::Validation("developer already exists".into()));
    }
    let created = developer::create(db, name, description).await?;
    info!(id = %created.id, name = %created.name, "created developer");
    Ok(created)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<Option<developer::Model>, ServiceError> {
    DeveloperEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Paged, sorted search over name and description; `None` lists everything.
pub async fn search(
    db: &DatabaseConnection,
    page: &PageRequest,
    keyword: Option<&str>,
) -> Result<Vec<developer::Model>, ServiceError> {
    let sort = sort_column(&page.sort)?;
    let mut finder = DeveloperEntity::find();
    if let Some(kw) = keyword {
        let pattern = format!("%{}%", kw);
        finder = finder.filter(
            Condition::any()
                .add(Expr::col(developer::Column::Name).ilike(pattern.clone()))
                .add(Expr::col(developer::Column::Description).ilike(pattern)),
        );
    }
    let finder = match page.order {
        SortOrder::Asc => finder.order_by_asc(sort).order_by_asc(developer::Column::Id),
        SortOrder::Desc => finder.order_by_desc(sort).order_by_desc(developer::Column::Id),
    };
    finder
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_by_id(
    db: &DatabaseConnection,
    id: Uuid,
    patch: DeveloperPatch,
) -> Result<developer::Model, ServiceError> {
    let Some(existing) = get(db, id).await? else {
        return Err(ServiceError::not_found("developer"));
    };

    if let Some(name) = patch.name.as_deref() {
        developer::validate_name(name)?;
        if name != existing.name && developer::exists_by_name(db, name).await? {
            return Err(ServiceError::Validation("developer already exists".into()));
        }
    }
    if let Some(description) = patch.description.as_deref() {
        developer::validate_description(description)?;
    }

    let mut merged = existing;
    merge(&mut merged, patch);

    let am = developer::ActiveModel {
        id: Unchanged(merged.id),
        name: Set(merged.name),
        description: Set(merged.description),
        created_at: Unchanged(merged.created_at),
        updated_at: Set(Utc::now().into()),
    };
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, "updated developer");
    Ok(updated)
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if get(db, id).await?.is_none() {
        return Err(ServiceError::not_found("developer"));
    }
    DeveloperEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %id, "deleted developer");
    Ok(())
}

static EXPORT_COLUMNS: [Column<developer::Model>; 4] = [
    Column { header: "Name", value: |d| CellValue::Text(d.name.clone()) },
    Column { header: "Description", value: |d| CellValue::Text(d.description.clone()) },
    Column { header: "Created At", value: |d| CellValue::Timestamp(d.created_at) },
    Column { header: "Updated At", value: |d| CellValue::Timestamp(d.updated_at) },
];

pub fn export_columns() -> &'static [Column<developer::Model>] {
    &EXPORT_COLUMNS
}

pub async fn export_to_xlsx(db: &DatabaseConnection) -> Result<Vec<u8>, ServiceError> {
    let rows = DeveloperEntity::find()
        .order_by_asc(developer::Column::Name)
        .order_by_asc(developer::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    export::to_workbook(&rows, export_columns())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn developer_crud() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let name = format!("svc_dev_{}", Uuid::new_v4().simple());
        let created = create(&db, &name, "Studio under test").await?;

        let patched = update_by_id(
            &db,
            created.id,
            DeveloperPatch { name: None, description: Some("Renamed studio".into()) },
        )
        .await?;
        assert_eq!(patched.name, name);
        assert_eq!(patched.description, "Renamed studio");

        delete_by_id(&db, created.id).await?;
        assert!(get(&db, created.id).await?.is_none());
        Ok(())
    }
}

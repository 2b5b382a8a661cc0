use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::genre::{self, Entity as GenreEntity};

use crate::errors::ServiceError;
use crate::export::{self, CellValue, Column};
use crate::pagination::{PageRequest, SortOrder};
use crate::patch::{merge, Patch};

/// Partial update for a genre; absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenrePatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Patch for GenrePatch {
    type Target = genre::Model;

    fn apply_to(self, target: &mut genre::Model) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(description) = self.description {
            target.description = description;
        }
    }
}

fn sort_column(field: &str) -> Result<genre::Column, ServiceError> {
    match field {
        "name" => Ok(genre::Column::Name),
        "description" => Ok(genre::Column::Description),
        "created_at" | "createdAt" => Ok(genre::Column::CreatedAt),
        "updated_at" | "updatedAt" => Ok(genre::Column::UpdatedAt),
        other => Err(ServiceError::Validation(format!("unknown sort field: {other}"))),
    }
}

/// Create a genre; the name must not already be taken.
pub async fn create(db: &DatabaseConnection, name: &str, description: &str) -> Result<genre::Model, ServiceError> {
    if genre::exists_by_name(db, name).await? {
        return Err(ServiceError::Validation("genre already exists".into()));
    }
    let created = genre::create(db, name, description).await?;
    info!(id = %created.id, name = %created.name, "created genre");
    Ok(created)
}

/// Get a genre by id.
pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<Option<genre::Model>, ServiceError> {
    GenreEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Paged, sorted search. `keyword` filters name and description
/// case-insensitively; `None` lists everything.
///
/// The id is always appended as a secondary sort key so equal sort keys page
/// deterministically.
pub async fn search(
    db: &DatabaseConnection,
    page: &PageRequest,
    keyword: Option<&str>,
) -> Result<Vec<genre::Model>, ServiceError> {
    let sort = sort_column(&page.sort)?;
    let mut finder = GenreEntity::find();
    if let Some(kw) = keyword {
        let pattern = format!("%{}%", kw);
        finder = finder.filter(
            Condition::any()
                .add(Expr::col(genre::Column::Name).ilike(pattern.clone()))
                .add(Expr::col(genre::Column::Description).ilike(pattern)),
        );
    }
    let finder = match page.order {
        SortOrder::Asc => finder.order_by_asc(sort).order_by_asc(genre::Column::Id),
        SortOrder::Desc => finder.order_by_desc(sort).order_by_desc(genre::Column::Id),
    };
    finder
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Apply a patch to an existing genre and persist the merged result.
pub async fn update_by_id(db: &DatabaseConnection, id: Uuid, patch: GenrePatch) -> Result<genre::Model, ServiceError> {
    let Some(existing) = get(db, id).await? else {
        return Err(ServiceError::not_found("genre"));
    };

    // Validate incoming values before the merge touches anything.
    if let Some(name) = patch.name.as_deref() {
        genre::validate_name(name)?;
        if name != existing.name && genre::exists_by_name(db, name).await? {
            return Err(ServiceError::Validation("genre already exists".into()));
        }
    }
    if let Some(description) = patch.description.as_deref() {
        genre::validate_description(description)?;
    }

    let mut merged = existing;
    merge(&mut merged, patch);

    let am = genre::ActiveModel {
        id: Unchanged(merged.id),
        name: Set(merged.name),
        description: Set(merged.description),
        created_at: Unchanged(merged.created_at),
        updated_at: Set(Utc::now().into()),
    };
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, "updated genre");
    Ok(updated)
}

/// Delete a genre by id.
pub async fn delete_by_id(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if get(db, id).await?.is_none() {
        return Err(ServiceError::not_found("genre"));
    }
    GenreEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %id, "deleted genre");
    Ok(())
}

/// Export column descriptor; order is the sheet's column order.
static EXPORT_COLUMNS: [Column<genre::Model>; 4] = [
    Column { header: "Name", value: |g| CellValue::Text(g.name.clone()) },
    Column { header: "Description", value: |g| CellValue::Text(g.description.clone()) },
    Column { header: "Created At", value: |g| CellValue::Timestamp(g.created_at) },
    Column { header: "Updated At", value: |g| CellValue::Timestamp(g.updated_at) },
];

pub fn export_columns() -> &'static [Column<genre::Model>] {
    &EXPORT_COLUMNS
}

/// Every genre, name-ordered, as one xlsx workbook.
pub async fn export_to_xlsx(db: &DatabaseConnection) -> Result<Vec<u8>, ServiceError> {
    let rows = GenreEntity::find()
        .order_by_asc(genre::Column::Name)
        .order_by_asc(genre::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    export::to_workbook(&rows, export_columns())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[test]
    fn export_columns_follow_entity_fields() {
        let headers: Vec<_> = export_columns().iter().map(|c| c.header).collect();
        assert_eq!(headers, ["Name", "Description", "Created At", "Updated At"]);

        let now = Utc::now().into();
        let g = genre::Model {
            id: Uuid::new_v4(),
            name: "RPG".into(),
            description: "Role playing".into(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!((export_columns()[0].value)(&g), CellValue::Text("RPG".into()));
        assert_eq!((export_columns()[1].value)(&g), CellValue::Text("Role playing".into()));
        assert_eq!((export_columns()[2].value)(&g), CellValue::Timestamp(now));
    }

    #[test]
    fn unknown_sort_field_is_a_validation_error() {
        assert!(matches!(sort_column("nope"), Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn genre_crud_and_search() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let marker = Uuid::new_v4().simple().to_string();
        let name = format!("svc_genre_{marker}");
        let created = create(&db, &name, "Genre under test").await?;
        assert_eq!(created.name, name);

        // duplicate name rejected
        assert!(matches!(
            create(&db, &name, "Again").await,
            Err(ServiceError::Validation(_))
        ));

        let page = PageRequest::new(0, 10, "name", SortOrder::Asc)?;
        let found = search(&db, &page, Some(&marker)).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);

        // keyword matching is case-insensitive
        let found_upper = search(&db, &page, Some(&marker.to_uppercase())).await?;
        assert_eq!(found_upper.len(), 1);

        let no_match = search(&db, &page, Some("zzz-no-match")).await?;
        assert!(no_match.is_empty());

        // patch description only; name must survive
        let updated = update_by_id(
            &db,
            created.id,
            GenrePatch { name: None, description: Some("New desc".into()) },
        )
        .await?;
        assert_eq!(updated.name, name);
        assert_eq!(updated.description, "New desc");
        assert_eq!(updated.created_at, created.created_at);

        delete_by_id(&db, created.id).await?;
        assert!(matches!(
            delete_by_id(&db, created.id).await,
            Err(ServiceError::NotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn pages_partition_the_result_set() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let marker = Uuid::new_v4().simple().to_string();
        let mut ids = Vec::new();
        for i in 0..5 {
            let g = create(&db, &format!("page_{marker}_{i}"), "Paging fixture").await?;
            ids.push(g.id);
        }

        let mut collected = Vec::new();
        for page_no in 0..3 {
            let page = PageRequest::new(page_no, 2, "name", SortOrder::Asc)?;
            let chunk = search(&db, &page, Some(&marker)).await?;
            assert!(chunk.len() <= 2);
            collected.extend(chunk.into_iter().map(|g| g.id));
        }
        // concatenated pages reconstruct the set with no duplicates or gaps
        assert_eq!(collected.len(), 5);
        let mut sorted = collected.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 5);

        for id in ids {
            delete_by_id(&db, id).await?;
        }
        Ok(())
    }
}

use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::address::{self, AddressInput};
use models::user::{self, Entity as UserEntity};

use crate::errors::ServiceError;
use crate::export::{self, CellValue, Column};
use crate::patch::{merge, Patch};
use crate::storage::photo_store::PhotoStore;

/// Partial update for the current user; absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Patch for UserPatch {
    type Target = user::Model;

    fn apply_to(self, target: &mut user::Model) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(email) = self.email {
            target.email = email;
        }
    }
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
    UserEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Apply a patch to an existing user and persist the merged result.
pub async fn update_by_id(db: &DatabaseConnection, id: Uuid, patch: UserPatch) -> Result<user::Model, ServiceError> {
    let Some(existing) = get(db, id).await? else {
        return Err(ServiceError::not_found("user"));
    };

    if let Some(name) = patch.name.as_deref() {
        user::validate_name(name)?;
    }
    if let Some(email) = patch.email.as_deref() {
        user::validate_email(email)?;
        if email != existing.email && user::find_by_email(db, email).await?.is_some() {
            return Err(ServiceError::Validation("email already in use".into()));
        }
    }

    let mut merged = existing;
    merge(&mut merged, patch);

    let am = user::ActiveModel {
        id: Unchanged(merged.id),
        email: Set(merged.email),
        name: Set(merged.name),
        photo_path: Unchanged(merged.photo_path),
        created_at: Unchanged(merged.created_at),
        updated_at: Set(Utc::now().into()),
    };
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, "updated user");
    Ok(updated)
}

/// Insert or replace the user's address.
pub async fn set_address(db: &DatabaseConnection, user_id: Uuid, input: AddressInput) -> Result<address::Model, ServiceError> {
    if get(db, user_id).await?.is_none() {
        return Err(ServiceError::not_found("user"));
    }
    let saved = address::upsert_for_user(db, user_id, input).await?;
    Ok(saved)
}

pub async fn get_address(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<address::Model>, ServiceError> {
    address::find_by_user(db, user_id)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Remove the account; credentials and address go with it via FK cascade.
pub async fn delete_by_id(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if get(db, id).await?.is_none() {
        return Err(ServiceError::not_found("user"));
    }
    user::hard_delete(db, id).await?;
    info!(id = %id, "deleted user");
    Ok(())
}

/// Store the uploaded photo and record its path on the user.
pub async fn upload_photo(
    db: &DatabaseConnection,
    store: &PhotoStore,
    id: Uuid,
    bytes: &[u8],
) -> Result<user::Model, ServiceError> {
    if get(db, id).await?.is_none() {
        return Err(ServiceError::not_found("user"));
    }
    let path = store.save("user", id, bytes).await?;
    let updated = user::set_photo_path(db, id, &path).await?;
    info!(id = %id, path = %path, "uploaded user photo");
    Ok(updated)
}

pub async fn download_photo(
    db: &DatabaseConnection,
    store: &PhotoStore,
    id: Uuid,
) -> Result<Vec<u8>, ServiceError> {
    let Some(found) = get(db, id).await? else {
        return Err(ServiceError::not_found("user"));
    };
    let Some(path) = found.photo_path else {
        return Err(ServiceError::not_found("user photo"));
    };
    store.read(&path).await
}

/// Export row: the account plus its (optional) address, flattened.
pub struct UserExportRow {
    pub user: user::Model,
    pub address: Option<address::Model>,
}

fn address_cell(row: &UserExportRow, pick: fn(&address::Model) -> &str) -> CellValue {
    match &row.address {
        Some(a) => CellValue::Text(pick(a).to_string()),
        None => CellValue::Empty,
    }
}

static EXPORT_COLUMNS: [Column<UserExportRow>; 11] = [
    Column { header: "Name", value: |r| CellValue::Text(r.user.name.clone()) },
    Column { header: "Email", value: |r| CellValue::Text(r.user.email.clone()) },
    Column { header: "Street", value: |r| address_cell(r, |a| &a.street) },
    Column {
        header: "Complement",
        value: |r| match r.address.as_ref().and_then(|a| a.complement.as_deref()) {
            Some(c) => CellValue::Text(c.to_string()),
            None => CellValue::Empty,
        },
    },
    Column { header: "Neighborhood", value: |r| address_cell(r, |a| &a.neighborhood) },
    Column { header: "City", value: |r| address_cell(r, |a| &a.city) },
    Column { header: "State", value: |r| address_cell(r, |a| &a.state) },
    Column { header: "Zip Code", value: |r| address_cell(r, |a| &a.zip_code) },
    Column {
        header: "Photo Path",
        value: |r| r.user.photo_path.clone().map_or(CellValue::Empty, CellValue::Text),
    },
    Column { header: "Created At", value: |r| CellValue::Timestamp(r.user.created_at) },
    Column { header: "Updated At", value: |r| CellValue::Timestamp(r.user.updated_at) },
];

pub fn export_columns() -> &'static [Column<UserExportRow>] {
    &EXPORT_COLUMNS
}

/// Every account with its address, name-ordered, as one xlsx workbook.
///
/// Password hashes are deliberately never part of the export.
pub async fn export_to_xlsx(db: &DatabaseConnection) -> Result<Vec<u8>, ServiceError> {
    let users = UserEntity::find()
        .order_by_asc(user::Column::Name)
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut rows = Vec::with_capacity(users.len());
    for u in users {
        let addr = get_address(db, u.id).await?;
        rows.push(UserExportRow { user: u, address: addr });
    }
    export::to_workbook(&rows, export_columns())
}

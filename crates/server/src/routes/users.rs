use axum::extract::{Host, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::address::AddressInput;
use models::user;
use service::auth::domain::ChangePasswordInput;
use service::export::export_filename;
use service::user::{self as user_service, UserPatch};

use crate::envelope::{message_only, ApiResponse};
use crate::errors::ApiError;
use crate::links::{link_entity, request_base, Linked};
use crate::routes::auth::{auth_service, AuthContext, ServerState};
use crate::routes::games::file_part;

const RESOURCE: &str = "users";

/// Partial update of the current user; an address, when present, replaces
/// the stored one wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<AddressInput>,
}

#[utoipa::path(get, path = "/api/v1/users/me", tag = "user",
    responses(
        (status = 200, description = "Current User"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(
    State(state): State<ServerState>,
    Host(host): Host,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<Linked<user::Model>>>, ApiError> {
    let Some(found) = user_service::get(&state.db, ctx.user_id).await? else {
        return Err(ApiError::not_found("user not found"));
    };
    let payload = link_entity(&request_base(&host), RESOURCE, found);
    Ok(Json(ApiResponse::new("Current user found!", payload)))
}

#[utoipa::path(patch, path = "/api/v1/users/me", tag = "user",
    request_body = crate::openapi::UpdateUserInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_me(
    State(state): State<ServerState>,
    Host(host): Host,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<ApiResponse<Linked<user::Model>>>, ApiError> {
    let patch = UserPatch { name: input.name, email: input.email };
    let updated = user_service::update_by_id(&state.db, ctx.user_id, patch).await?;
    if let Some(address) = input.address {
        user_service::set_address(&state.db, ctx.user_id, address).await?;
    }
    let payload = link_entity(&request_base(&host), RESOURCE, updated);
    Ok(Json(ApiResponse::new("User updated successfully!", payload)))
}

#[utoipa::path(delete, path = "/api/v1/users/me", tag = "user",
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn delete_me(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<Option<()>>>, ApiError> {
    user_service::delete_by_id(&state.db, ctx.user_id).await?;
    info!(user_id = %ctx.user_id, email = %ctx.email, "current user deleted");
    Ok(Json(message_only("User deleted successfully!")))
}

#[utoipa::path(put, path = "/api/v1/users/me/password", tag = "user",
    request_body = crate::openapi::ChangePasswordRequest,
    responses(
        (status = 200, description = "Password Changed"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<ChangePasswordInput>,
) -> Result<Json<ApiResponse<Option<()>>>, ApiError> {
    auth_service(&state).change_password(ctx.user_id, input).await?;
    Ok(Json(message_only("Password changed successfully!")))
}

#[utoipa::path(post, path = "/api/v1/users/me/password/reset", tag = "user",
    responses(
        (status = 200, description = "Password Reset"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn reset_password(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<Option<()>>>, ApiError> {
    auth_service(&state).reset_password(ctx.user_id).await?;
    Ok(Json(message_only("Password reset successfully!")))
}

#[utoipa::path(post, path = "/api/v1/users/uploadPhoto", tag = "user",
    responses(
        (status = 201, description = "Photo Uploaded"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn upload_photo(
    State(state): State<ServerState>,
    Host(host): Host,
    Extension(ctx): Extension<AuthContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Linked<user::Model>>>), ApiError> {
    let bytes = file_part(multipart).await?;
    let updated = user_service::upload_photo(&state.db, &state.photos, ctx.user_id, &bytes).await?;
    let payload = link_entity(&request_base(&host), RESOURCE, updated);
    Ok((StatusCode::CREATED, Json(ApiResponse::new("User photo uploaded successfully!", payload))))
}

#[utoipa::path(get, path = "/api/v1/users/downloadPhoto/{id}", tag = "user",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Image Stream"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn download_photo(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<([(header::HeaderName, String); 1], Vec<u8>), ApiError> {
    let bytes = user_service::download_photo(&state.db, &state.photos, id).await?;
    Ok(([(header::CONTENT_TYPE, "image/png".to_string())], bytes))
}

#[utoipa::path(get, path = "/api/v1/users/export/excel", tag = "user",
    responses(
        (status = 200, description = "Spreadsheet Stream"),
        (status = 500, description = "Export Failed")
    )
)]
pub async fn export_excel(
    State(state): State<ServerState>,
) -> Result<([(header::HeaderName, String); 2], Vec<u8>), ApiError> {
    let bytes = user_service::export_to_xlsx(&state.db).await?;
    let filename = export_filename(RESOURCE, Utc::now());
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename={filename}")),
        ],
        bytes,
    ))
}

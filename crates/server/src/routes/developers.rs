use axum::extract::{Host, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use models::developer;
use service::developer::{self as developer_service, DeveloperPatch};
use service::export::export_filename;

use crate::envelope::{message_only, ApiResponse};
use crate::errors::ApiError;
use crate::links::{link_collection, link_entity, request_base, Linked};
use crate::routes::auth::ServerState;
use crate::routes::genres::{ListQuery, SearchQuery};

const RESOURCE: &str = "developers";

#[derive(Debug, Deserialize)]
pub struct CreateDeveloperInput {
    pub name: String,
    pub description: String,
}

#[utoipa::path(post, path = "/api/v1/developers", tag = "developer",
    request_body = crate::openapi::CreateDeveloperInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Host(host): Host,
    Json(input): Json<CreateDeveloperInput>,
) -> Result<(StatusCode, Json<ApiResponse<Linked<developer::Model>>>), ApiError> {
    let created = developer_service::create(&state.db, &input.name, &input.description).await?;
    let payload = link_entity(&request_base(&host), RESOURCE, created);
    Ok((StatusCode::CREATED, Json(ApiResponse::new("Developer created successfully!", payload))))
}

#[utoipa::path(get, path = "/api/v1/developers/search", tag = "developer",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matches Found"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "No Matches")
    )
)]
pub async fn search(
    State(state): State<ServerState>,
    Host(host): Host,
    Query(q): Query<SearchQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Linked<developer::Model>>>>), ApiError> {
    if q.query.trim().is_empty() {
        return Err(ApiError::bad_request("Query parameter with the developer information is required!"));
    }
    let page = q.page_request()?;
    let found = developer_service::search(&state.db, &page, Some(q.query.trim())).await?;
    if found.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::new("No developers found with given keyword!", Vec::new())),
        ));
    }
    let payload = link_collection(&request_base(&host), RESOURCE, found);
    Ok((StatusCode::OK, Json(ApiResponse::new("Developers found with given keyword!", payload))))
}

#[utoipa::path(get, path = "/api/v1/developers", tag = "developer",
    params(ListQuery),
    responses(
        (status = 200, description = "Listed"),
        (status = 404, description = "Empty Catalog")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Host(host): Host,
    Query(q): Query<ListQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Linked<developer::Model>>>>), ApiError> {
    let page = q.page_request()?;
    let found = developer_service::search(&state.db, &page, None).await?;
    if found.is_empty() {
        return Ok((StatusCode::NOT_FOUND, Json(ApiResponse::new("No developers found!", Vec::new()))));
    }
    let payload = link_collection(&request_base(&host), RESOURCE, found);
    Ok((StatusCode::OK, Json(ApiResponse::new("All developers found!", payload))))
}

#[utoipa::path(get, path = "/api/v1/developers/{id}", tag = "developer",
    params(("id" = Uuid, Path, description = "Developer ID")),
    responses(
        (status = 200, description = "Found"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_by_id(
    State(state): State<ServerState>,
    Host(host): Host,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Linked<developer::Model>>>, ApiError> {
    let Some(found) = developer_service::get(&state.db, id).await? else {
        return Err(ApiError::not_found("developer not found"));
    };
    let payload = link_entity(&request_base(&host), RESOURCE, found);
    Ok(Json(ApiResponse::new("Developer found with given id!", payload)))
}

#[utoipa::path(patch, path = "/api/v1/developers/{id}", tag = "developer",
    params(("id" = Uuid, Path, description = "Developer ID")),
    request_body = crate::openapi::DeveloperPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Host(host): Host,
    Path(id): Path<Uuid>,
    Json(patch): Json<DeveloperPatch>,
) -> Result<Json<ApiResponse<Linked<developer::Model>>>, ApiError> {
    let updated = developer_service::update_by_id(&state.db, id, patch).await?;
    let payload = link_entity(&request_base(&host), RESOURCE, updated);
    Ok(Json(ApiResponse::new("Developer updated successfully!", payload)))
}

#[utoipa::path(delete, path = "/api/v1/developers/{id}", tag = "developer",
    params(("id" = Uuid, Path, description = "Developer ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<()>>>, ApiError> {
    developer_service::delete_by_id(&state.db, id).await?;
    Ok(Json(message_only("Developer deleted successfully!")))
}

#[utoipa::path(get, path = "/api/v1/developers/export/excel", tag = "developer",
    responses(
        (status = 200, description = "Spreadsheet Stream"),
        (status = 500, description = "Export Failed")
    )
)]
pub async fn export_excel(
    State(state): State<ServerState>,
) -> Result<([(header::HeaderName, String); 2], Vec<u8>), ApiError> {
    let bytes = developer_service::export_to_xlsx(&state.db).await?;
    let filename = export_filename(RESOURCE, Utc::now());
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename={filename}")),
        ],
        bytes,
    ))
}

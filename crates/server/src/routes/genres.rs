use axum::extract::{Host, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::genre;
use service::export::export_filename;
use service::genre::{self as genre_service, GenrePatch};
use service::pagination::{PageRequest, SortOrder};

use crate::envelope::{message_only, ApiResponse};
use crate::errors::ApiError;
use crate::links::{link_collection, link_entity, request_base, Linked};
use crate::routes::auth::ServerState;

const RESOURCE: &str = "genres";

#[derive(Debug, Deserialize)]
pub struct CreateGenreInput {
    pub name: String,
    pub description: String,
}

fn default_size() -> u32 { 10 }
fn default_sort() -> String { "name".into() }
fn default_direction() -> String { "asc".into() }

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_direction")]
    pub direction: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_direction")]
    pub direction: String,
}

impl ListQuery {
    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        let order = SortOrder::parse(&self.direction)?;
        Ok(PageRequest::new(self.page, self.size, self.sort.clone(), order)?)
    }
}

impl SearchQuery {
    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        let order = SortOrder::parse(&self.direction)?;
        Ok(PageRequest::new(self.page, self.size, self.sort.clone(), order)?)
    }
}

#[utoipa::path(post, path = "/api/v1/genres", tag = "genre",
    request_body = crate::openapi::CreateGenreInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Host(host): Host,
    Json(input): Json<CreateGenreInput>,
) -> Result<(StatusCode, Json<ApiResponse<Linked<genre::Model>>>), ApiError> {
    let created = genre_service::create(&state.db, &input.name, &input.description).await?;
    let payload = link_entity(&request_base(&host), RESOURCE, created);
    Ok((StatusCode::CREATED, Json(ApiResponse::new("Genre created successfully!", payload))))
}

#[utoipa::path(get, path = "/api/v1/genres/search", tag = "genre",
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
) -> Result<(StatusCode, Json<ApiResponse<Vec<Linked<genre::Model>>>>), ApiError> {
    if q.query.trim().is_empty() {
        return Err(ApiError::bad_request("Query parameter with the genre information is required!"));
    }
    let page = q.page_request()?;
    let found = genre_service::search(&state.db, &page, Some(q.query.trim())).await?;
    if found.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::new("No genres found with given keyword!", Vec::new())),
        ));
    }
    info!(count = found.len(), "genre search");
    let payload = link_collection(&request_base(&host), RESOURCE, found);
    Ok((StatusCode::OK, Json(ApiResponse::new("Genres found with given keyword!", payload))))
}

#[utoipa::path(get, path = "/api/v1/genres", tag = "genre",
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
) -> Result<(StatusCode, Json<ApiResponse<Vec<Linked<genre::Model>>>>), ApiError> {
    let page = q.page_request()?;
    let found = genre_service::search(&state.db, &page, None).await?;
    if found.is_empty() {
        return Ok((StatusCode::NOT_FOUND, Json(ApiResponse::new("No genres found!", Vec::new()))));
    }
    let payload = link_collection(&request_base(&host), RESOURCE, found);
    Ok((StatusCode::OK, Json(ApiResponse::new("All genres found!", payload))))
}

#[utoipa::path(get, path = "/api/v1/genres/{id}", tag = "genre",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Found"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_by_id(
    State(state): State<ServerState>,
    Host(host): Host,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Linked<genre::Model>>>, ApiError> {
    let Some(found) = genre_service::get(&state.db, id).await? else {
        return Err(ApiError::not_found("genre not found"));
    };
    let payload = link_entity(&request_base(&host), RESOURCE, found);
    Ok(Json(ApiResponse::new("Genre found with given id!", payload)))
}

#[utoipa::path(patch, path = "/api/v1/genres/{id}", tag = "genre",
    params(("id" = Uuid, Path, description = "Genre ID")),
    request_body = crate::openapi::GenrePatchDoc,
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
    Json(patch): Json<GenrePatch>,
) -> Result<Json<ApiResponse<Linked<genre::Model>>>, ApiError> {
    let updated = genre_service::update_by_id(&state.db, id, patch).await?;
    let payload = link_entity(&request_base(&host), RESOURCE, updated);
    Ok(Json(ApiResponse::new("Genre updated successfully!", payload)))
}

#[utoipa::path(delete, path = "/api/v1/genres/{id}", tag = "genre",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<()>>>, ApiError> {
    genre_service::delete_by_id(&state.db, id).await?;
    Ok(Json(message_only("Genre deleted successfully!")))
}

#[utoipa::path(get, path = "/api/v1/genres/export/excel", tag = "genre",
    responses(
        (status = 200, description = "Spreadsheet Stream"),
        (status = 500, description = "Export Failed")
    )
)]
pub async fn export_excel(
    State(state): State<ServerState>,
) -> Result<([(header::HeaderName, String); 2], Vec<u8>), ApiError> {
    let bytes = genre_service::export_to_xlsx(&state.db).await?;
    let filename = export_filename(RESOURCE, Utc::now());
    info!(%filename, size = bytes.len(), "genre export");
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename={filename}")),
        ],
        bytes,
    ))
}

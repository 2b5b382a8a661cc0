use axum::extract::{Host, Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::Json;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use models::game;
use service::export::export_filename;
use service::game::{self as game_service, GameInput, GamePatch};

use crate::envelope::{message_only, ApiResponse};
use crate::errors::ApiError;
use crate::links::{link_collection, link_entity, request_base, Linked};
use crate::routes::auth::ServerState;
use crate::routes::genres::{ListQuery, SearchQuery};

const RESOURCE: &str = "games";

/// Pull the `file` part out of a multipart upload.
pub(crate) async fn file_part(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("could not read file part: {e}")))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError::bad_request("multipart field 'file' is required"))
}

#[utoipa::path(post, path = "/api/v1/games", tag = "game",
    request_body = crate::openapi::CreateGameInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Host(host): Host,
    Json(input): Json<GameInput>,
) -> Result<(StatusCode, Json<ApiResponse<Linked<game::Model>>>), ApiError> {
    let created = game_service::create(&state.db, input).await?;
    let payload = link_entity(&request_base(&host), RESOURCE, created);
    Ok((StatusCode::CREATED, Json(ApiResponse::new("Game created successfully!", payload))))
}

#[utoipa::path(get, path = "/api/v1/games/search", tag = "game",
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
) -> Result<(StatusCode, Json<ApiResponse<Vec<Linked<game::Model>>>>), ApiError> {
    if q.query.trim().is_empty() {
        return Err(ApiError::bad_request("Query parameter with the game information is required!"));
    }
    let page = q.page_request()?;
    let found = game_service::search(&state.db, &page, Some(q.query.trim())).await?;
    if found.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::new("No game found with given information's!", Vec::new())),
        ));
    }
    let payload = link_collection(&request_base(&host), RESOURCE, found);
    Ok((StatusCode::OK, Json(ApiResponse::new("Games found with given information's!", payload))))
}

#[utoipa::path(get, path = "/api/v1/games", tag = "game",
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
) -> Result<(StatusCode, Json<ApiResponse<Vec<Linked<game::Model>>>>), ApiError> {
    let page = q.page_request()?;
    let found = game_service::search(&state.db, &page, None).await?;
    if found.is_empty() {
        return Ok((StatusCode::NOT_FOUND, Json(ApiResponse::new("No games found!", Vec::new()))));
    }
    let payload = link_collection(&request_base(&host), RESOURCE, found);
    Ok((StatusCode::OK, Json(ApiResponse::new("All games found!", payload))))
}

#[utoipa::path(get, path = "/api/v1/games/{id}", tag = "game",
    params(("id" = Uuid, Path, description = "Game ID")),
    responses(
        (status = 200, description = "Found"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_by_id(
    State(state): State<ServerState>,
    Host(host): Host,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Linked<game::Model>>>, ApiError> {
    let Some(found) = game_service::get(&state.db, id).await? else {
        return Err(ApiError::not_found("game not found"));
    };
    let payload = link_entity(&request_base(&host), RESOURCE, found);
    Ok(Json(ApiResponse::new("Game found with given id!", payload)))
}

#[utoipa::path(patch, path = "/api/v1/games/{id}", tag = "game",
    params(("id" = Uuid, Path, description = "Game ID")),
    request_body = crate::openapi::GamePatchDoc,
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
    Json(patch): Json<GamePatch>,
) -> Result<Json<ApiResponse<Linked<game::Model>>>, ApiError> {
    let updated = game_service::update_by_id(&state.db, id, patch).await?;
    let payload = link_entity(&request_base(&host), RESOURCE, updated);
    Ok(Json(ApiResponse::new("Game updated successfully!", payload)))
}

#[utoipa::path(delete, path = "/api/v1/games/{id}", tag = "game",
    params(("id" = Uuid, Path, description = "Game ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Option<()>>>, ApiError> {
    game_service::delete_by_id(&state.db, id).await?;
    Ok(Json(message_only("Game deleted successfully!")))
}

#[utoipa::path(post, path = "/api/v1/games/uploadPhoto/{id}", tag = "game",
    params(("id" = Uuid, Path, description = "Game ID")),
    responses(
        (status = 201, description = "Photo Uploaded"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn upload_photo(
    State(state): State<ServerState>,
    Host(host): Host,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Linked<game::Model>>>), ApiError> {
    let bytes = file_part(multipart).await?;
    let updated = game_service::upload_photo(&state.db, &state.photos, id, &bytes).await?;
    info!(id = %id, size = bytes.len(), "game photo upload");
    let payload = link_entity(&request_base(&host), RESOURCE, updated);
    Ok((StatusCode::CREATED, Json(ApiResponse::new("Game photo uploaded successfully!", payload))))
}

#[utoipa::path(get, path = "/api/v1/games/downloadPhoto/{id}", tag = "game",
    params(("id" = Uuid, Path, description = "Game ID")),
    responses(
        (status = 200, description = "Image Stream"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn download_photo(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<([(header::HeaderName, String); 1], Vec<u8>), ApiError> {
    let bytes = game_service::download_photo(&state.db, &state.photos, id).await?;
    Ok(([(header::CONTENT_TYPE, "image/png".to_string())], bytes))
}

#[utoipa::path(get, path = "/api/v1/games/export/excel", tag = "game",
    responses(
        (status = 200, description = "Spreadsheet Stream"),
        (status = 500, description = "Export Failed")
    )
)]
pub async fn export_excel(
    State(state): State<ServerState>,
) -> Result<([(header::HeaderName, String); 2], Vec<u8>), ApiError> {
    let bytes = game_service::export_to_xlsx(&state.db).await?;
    let filename = export_filename(RESOURCE, Utc::now());
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename={filename}")),
        ],
        bytes,
    ))
}

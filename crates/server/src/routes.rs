use axum::routing::{get, post, put};
use axum::{middleware, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi;

pub mod auth;
pub mod genres;
pub mod developers;
pub mod games;
pub mod users;

use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service Healthy"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health + auth are public, every
/// catalog route sits behind the bearer middleware.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        // auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        // genres
        .route("/api/v1/genres", post(genres::create).get(genres::list))
        .route("/api/v1/genres/search", get(genres::search))
        .route("/api/v1/genres/export/excel", get(genres::export_excel))
        .route(
            "/api/v1/genres/:id",
            get(genres::get_by_id).patch(genres::update).delete(genres::remove),
        )
        // developers
        .route("/api/v1/developers", post(developers::create).get(developers::list))
        .route("/api/v1/developers/search", get(developers::search))
        .route("/api/v1/developers/export/excel", get(developers::export_excel))
        .route(
            "/api/v1/developers/:id",
            get(developers::get_by_id).patch(developers::update).delete(developers::remove),
        )
        // games
        .route("/api/v1/games", post(games::create).get(games::list))
        .route("/api/v1/games/search", get(games::search))
        .route("/api/v1/games/export/excel", get(games::export_excel))
        .route("/api/v1/games/uploadPhoto/:id", post(games::upload_photo))
        .route("/api/v1/games/downloadPhoto/:id", get(games::download_photo))
        .route(
            "/api/v1/games/:id",
            get(games::get_by_id).patch(games::update).delete(games::remove),
        )
        // users (current-user operations)
        .route(
            "/api/v1/users/me",
            get(users::me).patch(users::update_me).delete(users::delete_me),
        )
        .route("/api/v1/users/me/password", put(users::change_password))
        .route("/api/v1/users/me/password/reset", post(users::reset_password))
        .route("/api/v1/users/uploadPhoto", post(users::upload_photo))
        .route("/api/v1/users/downloadPhoto/:id", get(users::download_photo))
        .route("/api/v1/users/export/excel", get(users::export_excel))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token))
        .with_state(state);

    api.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

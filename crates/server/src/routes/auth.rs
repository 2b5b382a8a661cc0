use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::{AuthUser, LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::storage::photo_store::PhotoStore;

use crate::envelope::ApiResponse;
use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub photos: PhotoStore,
}

/// The authenticated caller, placed in request extensions by the bearer
/// middleware.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

pub(crate) fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: state.db.clone() }),
        AuthConfig {
            jwt_secret: Some(state.auth.jwt_secret.clone()),
            password_algorithm: "argon2".into(),
        },
    )
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub token: String,
}

#[utoipa::path(post, path = "/api/v1/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 201, description = "Registered"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Conflict")
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<ApiResponse<AuthUser>>), ApiError> {
    models::user::validate_email(&input.email).map_err(|e| ApiError::bad_request(e.to_string()))?;
    models::user::validate_name(&input.name).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let user = auth_service(&state).register(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new("User registered successfully!", user))))
}

#[utoipa::path(post, path = "/api/v1/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged In"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<ApiResponse<LoginOutput>>), ApiError> {
    let session = auth_service(&state).login(input).await?;
    let user = session.user;
    let Some(token) = session.token else {
        return Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "token generation failed"));
    };

    let mut cookie = Cookie::new("auth_token", token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(axum_extra::extract::cookie::SameSite::Lax);
    let jar = jar.add(cookie);

    let out = LoginOutput { user_id: user.id, email: user.email, name: user.name, token };
    Ok((jar, Json(ApiResponse::new("User logged in successfully!", out))))
}

#[utoipa::path(post, path = "/api/v1/auth/logout", tag = "auth",
    responses((status = 200, description = "Logged Out"))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<Option<()>>>) {
    let jar = jar.remove(Cookie::from("auth_token"));
    (jar, Json(crate::envelope::message_only("User logged out successfully!")))
}

/// Bearer middleware: everything except health checks, login/register, API
/// docs and CORS preflight requires a valid token. The token comes from the
/// `Authorization` header, with the `auth_token` cookie as fallback.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path();
    let method = req.method().clone();

    if path == "/health"
        || path == "/api/v1/auth/login"
        || path == "/api/v1/auth/register"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == axum::http::Method::OPTIONS
    {
        return Ok(next.run(req).await);
    }

    let token = {
        let authz = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if let Some(h) = authz {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(ApiError::new(StatusCode::UNAUTHORIZED, "invalid Authorization header"));
            }
            h[prefix.len()..].to_string()
        } else {
            let cookie_header = req
                .headers()
                .get(axum::http::header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");

            let mut token_val: Option<String> = None;
            for part in cookie_header.split(';') {
                let kv = part.trim();
                if let Some(rest) = kv.strip_prefix("auth_token=") {
                    token_val = Some(rest.to_string());
                    break;
                }
            }

            match token_val {
                Some(t) if !t.is_empty() => t,
                _ => {
                    tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
                    return Err(ApiError::new(StatusCode::UNAUTHORIZED, "authentication required"));
                }
            }
        }
    };

    match auth_service(&state).verify_token(&token) {
        Ok(claims) => {
            let user_id = Uuid::parse_str(&claims.uid)
                .map_err(|_| ApiError::new(StatusCode::UNAUTHORIZED, "invalid token subject"))?;
            req.extensions_mut().insert(AuthContext { user_id, email: claims.sub });
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(ApiError::new(StatusCode::UNAUTHORIZED, "invalid or expired token"))
        }
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;

use crate::envelope::ApiResponse;

/// An error already translated to a status code; the body keeps the uniform
/// `{message, payload}` shape with a `null` payload.
///
/// All status mapping lives here so handlers can use `?` and stay thin.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "request failed");
        }
        let body = ApiResponse::new(self.message, serde_json::Value::Null);
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let status = match &e {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Model(ModelError::Validation(_)) => StatusCode::BAD_REQUEST,
            ServiceError::Export(_)
            | ServiceError::Db(_)
            | ServiceError::Storage(_)
            | ServiceError::Model(ModelError::Db(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let status = match &e {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Unauthorized | AuthError::TokenError(_) => StatusCode::UNAUTHORIZED,
            AuthError::HashError(_) | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_spec_status_codes() {
        assert_eq!(ApiError::from(ServiceError::Validation("bad".into())).status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ServiceError::not_found("genre")).status, StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(ServiceError::Export("boom".into())).status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::from(ServiceError::Db("down".into())).status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_map_to_spec_status_codes() {
        assert_eq!(ApiError::from(AuthError::Unauthorized).status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::TokenError("expired".into())).status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::Conflict).status, StatusCode::CONFLICT);
    }

    #[test]
    fn storage_error_message_carries_the_cause() {
        let e = ApiError::from(ServiceError::Db("connection refused".into()));
        assert!(e.message.contains("connection refused"));
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::AuthError;
use thiserror::Error;
use tracing::error;

/// Collaborator fault surfaced to the HTTP caller.
///
/// Negative login outcomes never take this path; they are returned as a
/// regular envelope by the route.
#[derive(Debug)]
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::Repository(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::HashError(_) | AuthError::TokenError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.0.code();
        if self.0.is_downstream() {
            error!(error = %self.0, code, "login request failed downstream");
        }
        // Internal detail stays in the log.
        let msg = if status.is_server_error() { "internal error".to_string() } else { self.0.to_string() };
        (status, Json(serde_json::json!({"error": msg, "code": code}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

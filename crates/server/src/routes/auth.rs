use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use service::auth::{AuthResult, CredentialStore, LoginHandler, LoginRequest, TokenIssuer};

use crate::errors::ApiError;

pub const AUTH_COOKIE: &str = "auth_token";

pub type SharedLoginHandler = Arc<LoginHandler<dyn CredentialStore, dyn TokenIssuer>>;

#[derive(Clone)]
pub struct ServerState {
    pub login: SharedLoginHandler,
    /// Mark the auth cookie `Secure`; off for plain-HTTP local runs.
    pub secure_cookies: bool,
}

/// Authenticate and return the outcome envelope.
///
/// Success answers 200 and also sets the access token as an `HttpOnly` cookie;
/// invalid credentials answer 401 with the generic failure envelope.
#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequestDoc, responses(
    (status = 200, description = "Logged in", body = crate::openapi::AuthResultDoc),
    (status = 401, description = "Invalid credentials", body = crate::openapi::AuthResultDoc),
    (status = 503, description = "Credential store unavailable")
))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResult>), ApiError> {
    let result = state.login.handle(input).await?;
    let Some(payload) = result.data() else {
        return Ok((StatusCode::UNAUTHORIZED, jar, Json(result)));
    };

    let mut cookie = Cookie::new(AUTH_COOKIE, payload.access_token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.secure_cookies);
    cookie.set_same_site(SameSite::Lax);
    Ok((StatusCode::OK, jar.add(cookie), Json(result)))
}

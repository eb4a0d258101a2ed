use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::auth::{
    messages::Locale,
    token::TokenConfig,
    CredentialStore, InMemoryCredentialStore, JwtTokenIssuer, LoginHandler, TokenIssuer, UserRecord,
};

use crate::errors::StartupError;
use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load config from `CONFIG_PATH` (default `config.toml`).
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_config_from(&path)
}

/// Load and validate config from `path`. Only a missing file falls back to env vars
/// (`SERVER_HOST`, `SERVER_PORT`, `JWT_SECRET`); an unreadable or malformed file is an error.
pub fn load_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let mut cfg = match configs::load_from_file(path) {
        Ok(cfg) => cfg,
        Err(e) if configs::is_missing_file(&e) => {
            warn!(%path, "config file not found, using environment");
            let mut cfg = AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Some(port) = env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
                cfg.server.port = port;
            }
            cfg
        }
        Err(e) => return Err(e.context(format!("failed to load {path}"))),
    };
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

/// Wire the credential store, token issuer and login handler from config.
pub fn build_state(cfg: &AppConfig) -> Result<auth::ServerState, StartupError> {
    let locale: Locale = cfg
        .auth
        .locale
        .parse()
        .map_err(|e: service::auth::AuthError| StartupError::InvalidConfig(e.to_string()))?;

    let store = InMemoryCredentialStore::with_users(cfg.users.iter().map(|u| UserRecord {
        full_name: u.full_name.clone(),
        email: u.email.clone(),
        password_hash: u.password_hash.clone(),
        phone: u.phone.clone(),
    }))
    .map_err(|e| StartupError::InvalidConfig(format!("users: {e}")))?;
    info!(users = store.len(), "credential store seeded");

    let issuer = JwtTokenIssuer::new(TokenConfig {
        secret: cfg.auth.jwt_secret.clone(),
        issuer: cfg.auth.issuer.clone(),
        access_ttl: chrono::Duration::minutes(cfg.auth.access_token_ttl_minutes),
        refresh_length: cfg.auth.refresh_token_length,
    });

    let store: Arc<dyn CredentialStore> = Arc::new(store);
    let issuer: Arc<dyn TokenIssuer> = Arc::new(issuer);
    let handler = LoginHandler::new(store, issuer).with_locale(locale);
    Ok(auth::ServerState {
        login: Arc::new(handler),
        secure_cookies: env::var("SECURE_COOKIES").map(|v| v == "1" || v == "true").unwrap_or(false),
    })
}

pub fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg)?;
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;
    let app = build_app(&cfg)?;

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting login server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

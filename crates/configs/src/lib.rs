use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthSettings,
    /// Accounts loaded into the in-memory credential store at startup.
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: i64,
    #[serde(default = "default_refresh_length")]
    pub refresh_token_length: usize,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: default_issuer(),
            access_token_ttl_minutes: default_access_ttl(),
            refresh_token_length: default_refresh_length(),
            locale: default_locale(),
        }
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_length", &self.refresh_token_length)
            .field("locale", &self.locale)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct SeedUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl std::fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUser")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("phone", &self.phone)
            .finish()
    }
}

fn default_issuer() -> String { "login-service".into() }
fn default_access_ttl() -> i64 { 15 }
fn default_refresh_length() -> usize { 64 }
fn default_locale() -> String { "en".into() }

pub const MIN_SECRET_LEN: usize = 16;
pub const MIN_REFRESH_LEN: usize = 32;
pub const SUPPORTED_LOCALES: &[&str] = &["en", "es"];

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

/// True when `err` comes from the config file not existing, as opposed to a read or parse failure.
pub fn is_missing_file(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        for u in &self.users {
            if !u.email.contains('@') {
                return Err(anyhow!("users: invalid email {:?}", u.email));
            }
            if u.password_hash.trim().is_empty() {
                return Err(anyhow!("users: password_hash required for {}", u.email));
            }
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl AuthSettings {
    /// Fill the signing secret from `JWT_SECRET` when the file leaves it empty.
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.jwt_secret = secret;
            }
        }
        self.locale = self.locale.trim().to_ascii_lowercase();
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(anyhow!("auth.jwt_secret must be at least {MIN_SECRET_LEN} bytes"));
        }
        if self.access_token_ttl_minutes <= 0 {
            return Err(anyhow!("auth.access_token_ttl_minutes must be positive"));
        }
        if self.refresh_token_length < MIN_REFRESH_LEN {
            return Err(anyhow!("auth.refresh_token_length must be >= {MIN_REFRESH_LEN}"));
        }
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            return Err(anyhow!("auth.locale {:?} is not one of {:?}", self.locale, SUPPORTED_LOCALES));
        }
        Ok(())
    }
}

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{AuthResult, LoginPayload, LoginRequest};
use super::errors::AuthError;
use super::messages::Locale;
use super::password;
use super::repository::CredentialStore;
use super::token::TokenIssuer;

/// Password check run on the blocking pool: `(password, stored_hash)`.
pub type PasswordCheck = fn(&str, &str) -> Result<bool, AuthError>;

/// Login command handler, independent of web framework.
///
/// Holds no per-request state; one instance serves any number of
/// concurrent logins.
pub struct LoginHandler<S: ?Sized, T: ?Sized> {
    verify: PasswordCheck,
    locale: Locale,
    store: Arc<S>,
    issuer: Arc<T>,
}

impl<S, T> LoginHandler<S, T>
where
    S: CredentialStore + ?Sized,
    T: TokenIssuer + ?Sized,
{
    pub fn new(store: Arc<S>, issuer: Arc<T>) -> Self {
        Self { verify: password::verify_password, locale: Locale::default(), store, issuer }
    }

    /// Replace the password check (argon2/bcrypt by default).
    pub fn with_password_check(mut self, verify: PasswordCheck) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Authenticate an email/password pair and issue an access/refresh token pair.
    ///
    /// Unknown accounts and wrong passwords both yield the same failed
    /// [`AuthResult`] after the same amount of hashing work. `Err` is
    /// reserved for collaborator faults (store, verifier task or token
    /// issuer) that the transport layer must surface.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{InMemoryCredentialStore, JwtTokenIssuer, LoginHandler, LoginRequest, UserRecord};
    /// use service::auth::{password::hash_password, token::TokenConfig};
    /// let store = InMemoryCredentialStore::with_users([UserRecord {
    ///     full_name: "Test User".into(),
    ///     email: "test@example.com".into(),
    ///     password_hash: hash_password("password").unwrap(),
    ///     phone: None,
    /// }]).unwrap();
    /// let issuer = JwtTokenIssuer::new(TokenConfig {
    ///     secret: "doc-secret-0123456789".into(),
    ///     issuer: "login-service".into(),
    ///     access_ttl: chrono::Duration::minutes(15),
    ///     refresh_length: 64,
    /// });
    /// let handler = LoginHandler::new(Arc::new(store), Arc::new(issuer));
    /// let result = tokio_test::block_on(handler.handle(LoginRequest::new("test@example.com", "password"))).unwrap();
    /// assert!(result.succeeded);
    /// assert_eq!(result.data.unwrap().email, "test@example.com");
    /// ```
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn handle(&self, request: LoginRequest) -> Result<AuthResult, AuthError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            debug!("login rejected: blank credentials");
            return Ok(self.reject());
        }

        let user = self.store.get_by_email(&request.email).await?;

        // Unknown accounts are verified against a decoy hash so both failure paths cost one full verify.
        let stored_hash = match &user {
            Some(u) => u.password_hash.clone(),
            None => password::decoy_hash().to_owned(),
        };
        let verify = self.verify;
        let verified = tokio::task::spawn_blocking(move || verify(&request.password, &stored_hash))
            .await
            .map_err(|e| AuthError::HashError(e.to_string()))?;

        let Some(user) = user else {
            debug!("login rejected: unknown account");
            return Ok(self.reject());
        };

        match verified {
            Ok(true) => {}
            Ok(false) => {
                debug!("login rejected: password mismatch");
                return Ok(self.reject());
            }
            Err(e) => {
                warn!(error = %e, code = e.code(), "stored password hash could not be verified");
                return Ok(self.reject());
            }
        }

        // Issuance is synchronous: once verification is back, the pair is issued whole or not at all.
        let tokens = self.issuer.issue(&user)?;
        info!(email = %user.email, "login_succeeded");

        let payload = LoginPayload {
            email: user.email,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        };
        Ok(AuthResult::success(payload, self.locale.success()))
    }

    fn reject(&self) -> AuthResult {
        AuthResult::failure(self.locale.invalid_credentials())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::UserRecord;
    use crate::auth::password::hash_password;
    use crate::auth::repository::InMemoryCredentialStore;

    struct FixedIssuer;

    impl TokenIssuer for FixedIssuer {
        fn generate_access_token(&self, _user: &UserRecord) -> Result<String, AuthError> {
            Ok("access_token".into())
        }
        fn generate_refresh_token(&self) -> Result<String, AuthError> {
            Ok("refresh_token".into())
        }
    }

    fn handler() -> LoginHandler<InMemoryCredentialStore, FixedIssuer> {
        let store = InMemoryCredentialStore::with_users([UserRecord {
            full_name: "Test User".into(),
            email: "test@example.com".into(),
            password_hash: hash_password("password").unwrap(),
            phone: None,
        }])
        .unwrap();
        LoginHandler::new(Arc::new(store), Arc::new(FixedIssuer))
    }

    static CHECKED_HASHES: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());

    fn recording_check(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        CHECKED_HASHES.lock().unwrap().push(stored_hash.to_owned());
        password::verify_password(password, stored_hash)
    }

    #[tokio::test]
    async fn unknown_account_still_runs_a_full_verify() {
        let h = handler().with_password_check(recording_check);
        let r = h.handle(LoginRequest::new("ghost@example.com", "password")).await.unwrap();
        assert!(!r.succeeded);
        assert_eq!(r.message, "invalid credentials");
        let checked = CHECKED_HASHES.lock().unwrap().clone();
        assert_eq!(checked, vec![password::decoy_hash().to_owned()]);
        assert!(checked[0].starts_with("$argon2"));
    }

    #[tokio::test]
    async fn verifier_panic_is_a_fault_not_a_rejection() {
        fn exploding(_: &str, _: &str) -> Result<bool, AuthError> {
            panic!("verifier crashed")
        }
        let h = handler().with_password_check(exploding);
        let err = h.handle(LoginRequest::new("test@example.com", "password")).await.unwrap_err();
        assert!(matches!(err, AuthError::HashError(_)));
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected_generically() {
        let h = handler();
        let r = h.handle(LoginRequest::new("  ", "password")).await.unwrap();
        assert!(!r.succeeded);
        assert_eq!(r.message, "invalid credentials");
        let r = h.handle(LoginRequest::new("test@example.com", "")).await.unwrap();
        assert_eq!(r.message, "invalid credentials");
        assert!(r.data.is_none());
    }

    #[tokio::test]
    async fn spanish_locale_messages() {
        let h = handler().with_locale(Locale::Es);
        let r = h.handle(LoginRequest::new("test@example.com", "nope")).await.unwrap();
        assert_eq!(r.message, "Credenciales incorrectas");
        let r = h.handle(LoginRequest::new("test@example.com", "password")).await.unwrap();
        assert!(r.succeeded);
        assert_eq!(r.message, "Inicio de sesión exitoso");
    }

    #[tokio::test]
    async fn corrupt_stored_hash_reads_as_invalid_credentials() {
        let store = InMemoryCredentialStore::with_users([UserRecord {
            full_name: "Legacy".into(),
            email: "legacy@example.com".into(),
            password_hash: "plaintext".into(),
            phone: None,
        }])
        .unwrap();
        let h = LoginHandler::new(Arc::new(store), Arc::new(FixedIssuer));
        let r = h.handle(LoginRequest::new("legacy@example.com", "plaintext")).await.unwrap();
        assert!(!r.succeeded);
        assert_eq!(r.message, "invalid credentials");
    }
}

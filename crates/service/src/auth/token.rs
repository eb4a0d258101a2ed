use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{TokenPair, UserRecord};
use super::errors::AuthError;

/// Produces the credentials handed out after a successful login.
///
/// Both operations are synchronous so a pair is either fully issued or not at all.
pub trait TokenIssuer: Send + Sync {
    fn generate_access_token(&self, user: &UserRecord) -> Result<String, AuthError>;
    fn generate_refresh_token(&self) -> Result<String, AuthError>;

    fn issue(&self, user: &UserRecord) -> Result<TokenPair, AuthError> {
        let access_token = self.generate_access_token(user)?;
        let refresh_token = self.generate_refresh_token()?;
        Ok(TokenPair { access_token, refresh_token })
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub name: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_length: usize,
}

/// HS256 access tokens plus random alphanumeric refresh tokens.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_ttl: Duration,
    refresh_length: usize,
}

impl JwtTokenIssuer {
    pub fn new(cfg: TokenConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer,
            access_ttl: cfg.access_ttl,
            refresh_length: cfg.refresh_length,
        }
    }

    /// Verify signature, issuer and expiry of an access token.
    pub fn decode_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_issuer(&[self.issuer.as_str()]);
        decode::<AccessClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn generate_access_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.email.clone(),
            name: user.full_name.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
            iss: self.issuer.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    fn generate_refresh_token(&self) -> Result<String, AuthError> {
        Ok(OsRng
            .sample_iter(&Alphanumeric)
            .take(self.refresh_length)
            .map(char::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(ttl_minutes: i64) -> JwtTokenIssuer {
        JwtTokenIssuer::new(TokenConfig {
            secret: "unit-test-secret-0123456789".into(),
            issuer: "login-service".into(),
            access_ttl: Duration::minutes(ttl_minutes),
            refresh_length: 64,
        })
    }

    fn user() -> UserRecord {
        UserRecord {
            full_name: "Test User".into(),
            email: "test@example.com".into(),
            password_hash: "$argon2id$x".into(),
            phone: None,
        }
    }

    #[test]
    fn access_token_carries_identity() {
        let iss = issuer(15);
        let token = iss.generate_access_token(&user()).unwrap();
        let claims = iss.decode_access_token(&token).unwrap();
        assert_eq!(claims.sub, "test@example.com");
        assert_eq!(claims.name, "Test User");
        assert_eq!(claims.iss, "login-service");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(!token.contains("argon2"));
    }

    #[test]
    fn expired_token_is_rejected() {
        let iss = issuer(-10);
        let token = iss.generate_access_token(&user()).unwrap();
        assert!(matches!(iss.decode_access_token(&token), Err(AuthError::TokenError(_))));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = issuer(15).generate_access_token(&user()).unwrap();
        let other = JwtTokenIssuer::new(TokenConfig {
            secret: "another-secret-9876543210".into(),
            issuer: "login-service".into(),
            access_ttl: Duration::minutes(15),
            refresh_length: 64,
        });
        assert!(other.decode_access_token(&token).is_err());
    }

    #[test]
    fn refresh_tokens_are_random_and_sized() {
        let iss = issuer(15);
        let a = iss.generate_refresh_token().unwrap();
        let b = iss.generate_refresh_token().unwrap();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn issue_returns_both_tokens() {
        let pair = issuer(15).issue(&user()).unwrap();
        assert_eq!(pair.access_token.split('.').count(), 3);
        assert_eq!(pair.refresh_token.len(), 64);
    }
}

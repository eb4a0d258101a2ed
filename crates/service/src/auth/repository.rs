use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use super::domain::UserRecord;
use super::errors::AuthError;

/// Read capability the login handler needs from persistence.
///
/// `Ok(None)` means no account is stored under that email; it is not a fault.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;
}

/// Canonical stored form of an email: trimmed and ASCII-lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Map-backed store used by the server binary and tests.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>, // key: normalized email
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, rejecting duplicate emails.
    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Result<Self, AuthError> {
        let store = Self::new();
        for user in users {
            store.insert(user)?;
        }
        Ok(store)
    }

    pub fn insert(&self, mut user: UserRecord) -> Result<(), AuthError> {
        user.email = normalize_email(&user.email);
        if !user.email.contains('@') {
            return Err(AuthError::Validation(format!("invalid email: {}", user.email)));
        }
        let mut users = self.users.write().map_err(|e| AuthError::Repository(e.to_string()))?;
        if users.contains_key(&user.email) {
            return Err(AuthError::Conflict);
        }
        debug!(email = %user.email, "credential record stored");
        users.insert(user.email.clone(), user);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|u| u.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let users = self.users.read().map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(users.get(&normalize_email(email)).cloned())
    }
}

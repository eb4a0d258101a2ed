//! Auth module: domain types, collaborator contracts and the login handler.
//!
//! The handler only depends on `CredentialStore` (one read) and `TokenIssuer`.

pub mod domain;
pub mod errors;
pub mod messages;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use domain::{AuthResult, LoginPayload, LoginRequest, UserRecord};
pub use errors::AuthError;
pub use repository::{CredentialStore, InMemoryCredentialStore};
pub use service::LoginHandler;
pub use token::{JwtTokenIssuer, TokenIssuer};

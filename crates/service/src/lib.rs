//! Service layer holding the login business logic, independent of any web framework.
//! - `auth::service::LoginHandler` orchestrates lookup, verification and token issuance.
//! - Persistence and token signing sit behind narrow traits so adapters can be swapped.

pub mod auth;

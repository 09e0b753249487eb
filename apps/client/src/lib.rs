//! Client side of Match Your Job: a typed wrapper over the REST API plus the
//! state a front end keeps between requests (session, local profile copy,
//! saved jobs, the matched-job board).

pub mod api;
pub mod auth;
pub mod autosave;
pub mod board;
pub mod saved;
pub mod storage;

#[cfg(test)]
pub(crate) mod mock;

pub use api::{ApiClient, ClientError};
pub use auth::AuthSession;
pub use storage::{LocalStore, StoreKey};

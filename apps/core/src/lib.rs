//! Shared domain for Match Your Job: the wire model plus the pure decision
//! logic (filtering, profile completion, saved jobs) used by both the API
//! server and the client.

pub mod completion;
pub mod filter;
pub mod models;
pub mod saved;

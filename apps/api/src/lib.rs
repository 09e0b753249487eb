//! HTTP API for Match Your Job: resume parsing, fit analysis, the job offer
//! catalog with profile matching, and accounts.

pub mod analysis;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod jobs;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod resume;
pub mod routes;
pub mod state;
pub mod storage;

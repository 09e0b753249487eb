use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::JobMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Session store.
    pub redis: RedisClient,
    /// Archive of uploaded resume PDFs.
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Pluggable job matcher. Default: KeywordJobMatcher.
    pub matcher: Arc<dyn JobMatcher>,
}

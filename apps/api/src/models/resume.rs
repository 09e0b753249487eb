use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub data: Value,
    pub raw_text: String,
    pub s3_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

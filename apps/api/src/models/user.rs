use chrono::{DateTime, Utc};
use jobmatch_core::models::api::User;
use jobmatch_core::models::UserProfile;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub profile: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Public view of the account. A stored profile that no longer parses is
    /// reported as empty rather than failing the request.
    pub fn to_user(&self) -> User {
        let profile = serde_json::from_value::<UserProfile>(self.profile.clone())
            .unwrap_or_else(|e| {
                tracing::warn!("Stored profile for user {} does not parse: {e}", self.id);
                UserProfile::default()
            });

        User {
            id: self.id,
            email: self.email.clone(),
            profile,
            created_at: Some(self.created_at),
        }
    }
}

//! Redis-backed sessions.
//!
//! A session is `session:<id> → <user uuid>` with a TTL of
//! `SESSION_TTL_HOURS`. Clients send the id in the `X-Session-ID` header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use redis::Client as RedisClient;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_HEADER: &str = "X-Session-ID";
const KEY_PREFIX: &str = "session:";

fn session_key(session_id: &str) -> String {
    format!("{KEY_PREFIX}{session_id}")
}

/// Opens a new session for `user_id` and returns its id.
pub async fn create_session(
    redis: &RedisClient,
    user_id: Uuid,
    ttl_secs: u64,
) -> Result<String, AppError> {
    let session_id = Uuid::new_v4().simple().to_string();
    let mut conn = redis.get_multiplexed_async_connection().await?;
    redis::cmd("SET")
        .arg(session_key(&session_id))
        .arg(user_id.to_string())
        .arg("EX")
        .arg(ttl_secs)
        .query_async::<_, ()>(&mut conn)
        .await?;

    info!("Opened session for user {user_id}");
    Ok(session_id)
}

/// Returns the user owning the session, or `None` if it is unknown or expired.
pub async fn resolve_session(
    redis: &RedisClient,
    session_id: &str,
) -> Result<Option<Uuid>, AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let stored: Option<String> = redis::cmd("GET")
        .arg(session_key(session_id))
        .query_async(&mut conn)
        .await?;

    Ok(stored.and_then(|raw| Uuid::parse_str(&raw).ok()))
}

/// Deleting an unknown session is not an error.
pub async fn revoke_session(redis: &RedisClient, session_id: &str) -> Result<(), AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let removed: i64 = redis::cmd("DEL")
        .arg(session_key(session_id))
        .query_async(&mut conn)
        .await?;
    if removed > 0 {
        info!("Closed session");
    }
    Ok(())
}

/// The session id carried by the request, if any.
pub fn session_id_from_parts(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Extractor for routes that need a signed-in user. Rejects with 401.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub session_id: String,
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let session_id = session_id_from_parts(parts).ok_or(AppError::Unauthorized)?;
        let user_id = resolve_session(&state.redis, &session_id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(SessionUser {
            session_id,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/me");
        if let Some(value) = header {
            builder = builder.header(SESSION_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_session_id_read_from_header() {
        assert_eq!(
            session_id_from_parts(&parts_with(Some(" abc123 "))).as_deref(),
            Some("abc123")
        );
        assert_eq!(session_id_from_parts(&parts_with(Some("  "))), None);
        assert_eq!(session_id_from_parts(&parts_with(None)), None);
    }

    #[test]
    fn test_session_key_is_namespaced() {
        assert_eq!(session_key("abc"), "session:abc");
    }
}

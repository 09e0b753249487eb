use jobmatch_core::models::UserProfile;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Inserts a new account. A taken email maps to `AppError::Conflict`.
pub async fn insert_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    profile: &UserProfile,
) -> Result<UserRow, AppError> {
    let profile = serde_json::to_value(profile).map_err(anyhow::Error::from)?;

    let inserted = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, email, password_hash, profile)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(profile)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, AppError> {
    Ok(
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, AppError> {
    Ok(
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Replaces the stored profile. Returns `None` if the user no longer exists.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    profile: &UserProfile,
) -> Result<Option<UserRow>, AppError> {
    let profile = serde_json::to_value(profile).map_err(anyhow::Error::from)?;

    Ok(sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET profile = $2, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(profile)
    .fetch_optional(pool)
    .await?)
}

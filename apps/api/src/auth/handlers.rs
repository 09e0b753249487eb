use axum::{extract::State, http::StatusCode, Json};
use jobmatch_core::models::api::{
    ApiResponse, AuthPayload, ProfileEnvelope, SignInRequest, SignOutRequest, SignUpRequest, User,
};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::sessions::{create_session, revoke_session, SessionUser};
use crate::auth::users::{find_by_email, find_by_id, insert_user, normalize_email, update_profile};
use crate::auth::validate_credentials;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthPayload>>), AppError> {
    validate_credentials(&req.email, &req.password)?;

    let email = normalize_email(&req.email);
    let password_hash = hash_password(&req.password).await?;
    let profile = req.profile.unwrap_or_default();

    let row = insert_user(&state.db, &email, &password_hash, &profile).await?;
    let session_id = create_session(&state.redis, row.id, state.config.session_ttl_secs()).await?;

    info!("Registered user {}", row.id);
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(AuthPayload {
                session_id,
                user: row.to_user(),
            })
            .with_message("Account created"),
        ),
    ))
}

/// POST /api/auth/signin
pub async fn handle_signin(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>, AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let row = find_by_email(&state.db, &normalize_email(&req.email))
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    if !verify_password(&req.password, &row.password_hash).await? {
        return Err(AppError::InvalidCredentials);
    }

    let session_id = create_session(&state.redis, row.id, state.config.session_ttl_secs()).await?;

    info!("User {} signed in", row.id);
    Ok(Json(ApiResponse::ok(AuthPayload {
        session_id,
        user: row.to_user(),
    })))
}

/// POST /api/auth/signout
///
/// Always succeeds for a well-formed body, even if the session is already gone.
pub async fn handle_signout(
    State(state): State<AppState>,
    Json(req): Json<SignOutRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if !req.session_id.trim().is_empty() {
        revoke_session(&state.redis, req.session_id.trim()).await?;
    }
    Ok(Json(ApiResponse {
        success: true,
        data: None,
        message: Some("Signed out".to_string()),
        error: None,
    }))
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<ApiResponse<User>>, AppError> {
    // A session can outlive its account.
    let row = find_by_id(&state.db, session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(ApiResponse::ok(row.to_user())))
}

/// PUT /api/auth/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    session: SessionUser,
    Json(req): Json<ProfileEnvelope>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let row = update_profile(&state.db, session.user_id, &req.profile)
        .await?
        .ok_or(AppError::Unauthorized)?;

    info!("Updated profile for user {}", row.id);
    Ok(Json(
        ApiResponse::ok(row.to_user()).with_message("Profile updated"),
    ))
}

use axum::{
    extract::{Path, State},
    Json,
};
use jobmatch_core::models::api::ApiResponse;
use jobmatch_core::models::Resume;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::parser::{find_resume, ingest_upload, ResumeUpload};
use crate::state::AppState;

/// POST /api/upload-resume
///
/// Accepts a multipart PDF / text part or a JSON `{ text }` body.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    upload: ResumeUpload,
) -> Result<Json<ApiResponse<Resume>>, AppError> {
    let resume = ingest_upload(&state, upload).await?;
    Ok(Json(
        ApiResponse::ok(resume).with_message("Resume parsed successfully"),
    ))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Resume>>, AppError> {
    let resume = find_resume(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(ApiResponse::ok(resume)))
}

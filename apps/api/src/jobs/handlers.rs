use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use jobmatch_core::models::api::{
    ApiResponse, ImportJobsRequest, ImportSummary, JobOffersPage, JobOffersQuery, JobStats,
    MatchRequest, MatchedJobs, PersonalizedResume, PersonalizedResumeRequest,
};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::catalog::{catalog_stats, find_job, load_all, upsert_jobs, validate_import};
use crate::matching::ranking::rank_jobs;
use crate::resume::render::render_resume;
use crate::resume::tailor::personalize_resume;
use crate::state::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// GET /api/job-offers
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobOffersQuery>,
) -> Result<Json<ApiResponse<JobOffersPage>>, AppError> {
    let catalog = load_all(&state.db).await?;
    let filter = query.to_filter();
    let jobs: Vec<_> = filter.apply(&catalog).into_iter().cloned().collect();

    Ok(Json(ApiResponse::ok(JobOffersPage {
        total: jobs.len(),
        jobs,
    })))
}

/// GET /api/job-offers/stats
pub async fn handle_job_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<JobStats>>, AppError> {
    Ok(Json(ApiResponse::ok(catalog_stats(&state.db).await?)))
}

/// POST /api/job-offers/matched
///
/// Ranks the whole catalog against the submitted profile.
pub async fn handle_matched_jobs(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<ApiResponse<MatchedJobs>>, AppError> {
    let catalog = load_all(&state.db).await?;
    let ranking = rank_jobs(
        state.matcher.as_ref(),
        &req.user_profile,
        &catalog,
        &req.options,
    )
    .await?;

    let generated_resume = req
        .options
        .include_resume
        .then(|| render_resume(&req.user_profile, None));

    Ok(Json(ApiResponse::ok(MatchedJobs {
        jobs: ranking.jobs,
        stats: ranking.stats,
        total_jobs: catalog.len(),
        generated_resume,
    })))
}

/// POST /api/job-offers/personalized-resume
pub async fn handle_personalized_resume(
    State(state): State<AppState>,
    Json(req): Json<PersonalizedResumeRequest>,
) -> Result<Json<ApiResponse<PersonalizedResume>>, AppError> {
    let job_id = req.job_id.trim();
    if job_id.is_empty() {
        return Err(AppError::Validation("jobId cannot be empty".to_string()));
    }

    let job = find_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let resume =
        personalize_resume(&state.llm, &req.user_profile, &job, req.language.as_deref()).await;
    Ok(Json(ApiResponse::ok(resume)))
}

/// Import is disabled (403) without a configured token; a wrong or missing
/// header is 401.
pub fn check_admin_token(headers: &HeaderMap, expected: Option<&str>) -> Result<(), AppError> {
    let expected = expected.ok_or(AppError::Forbidden)?;
    let given = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    if !tokens_match(given, expected) {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

/// Compares fixed-size digests with a full XOR fold, so the time taken does not
/// depend on where the tokens first differ or on their lengths.
fn tokens_match(given: &str, expected: &str) -> bool {
    let given = Sha256::digest(given.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    given
        .iter()
        .zip(expected.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// POST /api/job-offers/import
pub async fn handle_import_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ImportJobsRequest>,
) -> Result<Json<ApiResponse<ImportSummary>>, AppError> {
    check_admin_token(&headers, state.config.admin_token.as_deref())?;
    validate_import(&req.jobs)?;

    let imported = upsert_jobs(&state.db, &req.jobs, Utc::now()).await?;
    info!("Imported {imported} job offers");

    Ok(Json(
        ApiResponse::ok(ImportSummary { imported })
            .with_message(format!("Imported {imported} job offers")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(token: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(token) = token {
            map.insert("x-admin-token", HeaderValue::from_str(token).unwrap());
        }
        map
    }

    #[test]
    fn test_admin_token_checks() {
        assert!(check_admin_token(&headers(Some("s3cret")), Some("s3cret")).is_ok());
        assert!(matches!(
            check_admin_token(&headers(Some("s3cret")), None),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            check_admin_token(&headers(None), Some("s3cret")),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            check_admin_token(&headers(Some("nope")), Some("s3cret")),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_token_comparison() {
        assert!(tokens_match("s3cret", "s3cret"));
        assert!(!tokens_match("s3cre", "s3cret"));
        assert!(!tokens_match("s3cret-and-more", "s3cret"));
        assert!(!tokens_match("", "s3cret"));
        assert!(check_admin_token(&headers(Some("S3CRET")), Some("s3cret")).is_err());
    }
}

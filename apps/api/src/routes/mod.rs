pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::auth::handlers as auth;
use crate::jobs::handlers as jobs;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Largest accepted resume upload.
const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health_handler))
        // Resumes
        .route(
            "/upload-resume",
            post(resume::handle_upload_resume).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/resumes/:id", get(resume::handle_get_resume))
        // Fit analysis
        .route("/analyze-job-fit", post(analysis::handle_analyze_fit))
        .route("/study-programs", get(analysis::handle_study_programs))
        // Job offers
        .route("/job-offers", get(jobs::handle_list_jobs))
        .route("/job-offers/stats", get(jobs::handle_job_stats))
        .route("/job-offers/matched", post(jobs::handle_matched_jobs))
        .route(
            "/job-offers/personalized-resume",
            post(jobs::handle_personalized_resume),
        )
        .route("/job-offers/import", post(jobs::handle_import_jobs))
        // Auth
        .route("/auth/signup", post(auth::handle_signup))
        .route("/auth/signin", post(auth::handle_signin))
        .route("/auth/signout", post(auth::handle_signout))
        .route("/auth/me", get(auth::handle_me))
        .route("/auth/profile", put(auth::handle_update_profile));

    Router::new().nest("/api", api).with_state(state)
}

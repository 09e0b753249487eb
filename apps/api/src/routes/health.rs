use axum::Json;
use jobmatch_core::models::api::HealthStatus;

/// GET /api/health
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "jobmatch-api".to_string(),
    })
}

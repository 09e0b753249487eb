//! Job offer catalog stored in Postgres as one JSONB document per job.
//!
//! `category`, `company`, `posted_date` and `scraped_at` are duplicated into
//! columns so stats and ordering don't need to unpack the document.

use chrono::{DateTime, Utc};
use jobmatch_core::models::api::JobStats;
use jobmatch_core::models::Job;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::errors::AppError;

/// Every job in the catalog, newest posting first. Documents that no longer
/// deserialize are skipped with a warning.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Job>, AppError> {
    let rows: Vec<(String, Value)> = sqlx::query_as(
        "SELECT id, data FROM job_offers ORDER BY posted_date DESC NULLS LAST, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, data)| match serde_json::from_value::<Job>(data) {
            Ok(job) => Some(job),
            Err(e) => {
                warn!("Skipping job offer {id}: {e}");
                None
            }
        })
        .collect())
}

pub async fn find_job(pool: &PgPool, id: &str) -> Result<Option<Job>, AppError> {
    let data: Option<Value> = sqlx::query_scalar("SELECT data FROM job_offers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    data.map(|d| serde_json::from_value(d).map_err(|e| AppError::Internal(e.into())))
        .transpose()
}

/// Inserts or replaces jobs by id inside one transaction.
/// Match fields are stripped; they only make sense per profile.
pub async fn upsert_jobs(
    pool: &PgPool,
    jobs: &[Job],
    now: DateTime<Utc>,
) -> Result<usize, AppError> {
    let mut tx = pool.begin().await?;

    for job in jobs {
        let mut stored = job.clone();
        stored.match_score = None;
        stored.match_reasons = None;
        stored.suitable = None;
        let scraped_at = stored.scraped_at.unwrap_or(now);
        stored.scraped_at = Some(scraped_at);
        let data = serde_json::to_value(&stored).map_err(anyhow::Error::from)?;

        sqlx::query(
            r#"
            INSERT INTO job_offers (id, data, category, company, posted_date, scraped_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET data = EXCLUDED.data,
                category = EXCLUDED.category,
                company = EXCLUDED.company,
                posted_date = EXCLUDED.posted_date,
                scraped_at = EXCLUDED.scraped_at
            "#,
        )
        .bind(&stored.id)
        .bind(data)
        .bind(&stored.category)
        .bind(&stored.company)
        .bind(stored.posted_date)
        .bind(scraped_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!("Upserted {} job offers", jobs.len());
    Ok(jobs.len())
}

pub async fn catalog_stats(pool: &PgPool) -> Result<JobStats, AppError> {
    let (total, last_update, companies): (i64, Option<DateTime<Utc>>, i64) = sqlx::query_as(
        "SELECT COUNT(*), MAX(scraped_at), COUNT(DISTINCT company) FROM job_offers",
    )
    .fetch_one(pool)
    .await?;

    let categories: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT category FROM job_offers WHERE category <> '' ORDER BY category",
    )
    .fetch_all(pool)
    .await?;

    Ok(JobStats {
        total_jobs: total.max(0) as usize,
        last_update,
        categories,
        companies: companies.max(0) as usize,
    })
}

/// Rejects an import batch with blank or repeated ids.
pub fn validate_import(jobs: &[Job]) -> Result<(), AppError> {
    if jobs.is_empty() {
        return Err(AppError::Validation("jobs cannot be empty".to_string()));
    }
    let mut seen = std::collections::HashSet::new();
    for job in jobs {
        if job.id.trim().is_empty() {
            return Err(AppError::Validation("every job needs an id".to_string()));
        }
        if !seen.insert(job.id.as_str()) {
            return Err(AppError::Validation(format!(
                "duplicate job id '{}' in import",
                job.id
            )));
        }
    }
    Ok(())
}

//! Job matching: scores a profile against each job in the catalog, then ranks.
//!
//! `AppState` holds an `Arc<dyn JobMatcher>`; the default backend is the
//! deterministic `KeywordJobMatcher`.

pub mod ranking;
pub mod scorer;

use async_trait::async_trait;
use jobmatch_core::models::{Job, UserProfile};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Jobs scoring at or above this are flagged `suitable`.
pub const SUITABLE_THRESHOLD: u32 = 60;

/// Result of scoring one job against one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub score: u32, // 0 – 100
    /// Human-readable, strongest contribution first.
    pub reasons: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl JobMatch {
    pub fn suitable(&self) -> bool {
        self.score >= SUITABLE_THRESHOLD
    }
}

/// Implement this to swap matching backends without touching the handlers.
#[async_trait]
pub trait JobMatcher: Send + Sync {
    async fn score(&self, profile: &UserProfile, job: &Job) -> Result<JobMatch, AppError>;

    /// Backend label, logged with every ranking run.
    fn backend(&self) -> &'static str;
}

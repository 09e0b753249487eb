use jobmatch_core::filter::JobFilter;
use jobmatch_core::models::api::{MatchOptions, MatchStats, SortBy};
use jobmatch_core::models::{Job, UserProfile};
use tracing::{info, warn};

use crate::api::{ApiClient, ClientError};

/// Options the board requests matched jobs with.
pub fn board_match_options() -> MatchOptions {
    MatchOptions {
        min_score: Some(40),
        max_results: Some(50),
        sort_by: Some(SortBy::Score),
        include_resume: true,
    }
}

/// Matched jobs for one profile, narrowed by the active client-side filters.
pub struct JobBoard {
    api: ApiClient,
    profile: UserProfile,
    jobs: Vec<Job>,
    stats: MatchStats,
    total_jobs: usize,
    generic_resume: Option<String>,
    filter: JobFilter,
}

impl JobBoard {
    pub fn new(api: ApiClient, profile: UserProfile) -> Self {
        let filter = JobFilter {
            home_country: profile.country.clone(),
            ..Default::default()
        };
        Self {
            api,
            profile,
            jobs: Vec::new(),
            stats: MatchStats::default(),
            total_jobs: 0,
            generic_resume: None,
            filter,
        }
    }

    /// Replaces the board contents with a fresh ranking from the server.
    /// The previous contents are kept if the request fails.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let matched = self
            .api
            .matched_jobs(&self.profile, board_match_options())
            .await?;
        info!(
            "Loaded {} matched jobs out of {}",
            matched.jobs.len(),
            matched.total_jobs
        );

        self.jobs = matched.jobs;
        self.stats = matched.stats;
        self.total_jobs = matched.total_jobs;
        if matched.generated_resume.is_some() {
            self.generic_resume = matched.generated_resume;
        }
        Ok(())
    }

    /// Sets the active filters, keeping the profile country for `myCountry`.
    pub fn set_filter(&mut self, filter: JobFilter) {
        self.filter = JobFilter {
            home_country: filter
                .home_country
                .or_else(|| self.profile.country.clone()),
            ..filter
        };
    }

    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    /// The server ranking filtered client-side, in ranking order.
    pub fn visible_jobs(&self) -> Vec<&Job> {
        self.filter.apply(&self.jobs)
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn total_jobs(&self) -> usize {
        self.total_jobs
    }

    pub fn generic_resume(&self) -> Option<&str> {
        self.generic_resume.as_deref()
    }

    /// Resume to show when applying to `job`: the personalized one, or the
    /// generic one if personalization fails.
    pub async fn resume_for(&self, job: &Job, language: Option<&str>) -> Option<String> {
        match self
            .api
            .personalized_resume(&self.profile, &job.id, language)
            .await
        {
            Ok(result) if !result.resume.trim().is_empty() => Some(result.resume),
            Ok(_) => self.generic_resume.clone(),
            Err(e) => {
                warn!("Personalized resume for {} failed: {}", job.id, e);
                self.generic_resume.clone()
            }
        }
    }
}

//! Request and response bodies of the REST contract, shared by the server and the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::{JobFilter, LocationFilter};
use crate::models::job::Job;
use crate::models::profile::UserProfile;
use crate::models::resume::Resume;

/// Uniform response envelope: `{ success, data?, message?, error? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub service: String,
}

// ── Auth ────────────────────────────────────────────────────────────────────

/// Account as exposed to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub session_id: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileEnvelope {
    pub profile: UserProfile,
}

// ── Job catalog ─────────────────────────────────────────────────────────────

/// Query string of `GET /job-offers`. Empty values are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobOffersQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl JobOffersQuery {
    pub fn to_filter(&self) -> JobFilter {
        let keep = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
        JobFilter {
            search: keep(&self.search),
            job_type: keep(&self.job_type),
            experience_level: keep(&self.experience_level),
            company: keep(&self.company),
            category: keep(&self.category),
            location: keep(&self.location).map(|l| LocationFilter::parse(&l)),
            home_country: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOffersPage {
    pub jobs: Vec<Job>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total_jobs: usize,
    pub last_update: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub companies: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJobsRequest {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
}

// ── Matching ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Score,
    Date,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    /// Also render a generic resume from the profile.
    pub include_resume: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub user_profile: UserProfile,
    #[serde(flatten)]
    pub options: MatchOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub total_matched: usize,
    pub average_score: f64,
    pub high_matches: usize,
    pub medium_matches: usize,
    pub low_matches: usize,
    pub top_matched_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedJobs {
    pub jobs: Vec<Job>,
    pub stats: MatchStats,
    pub total_jobs: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_resume: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedResumeRequest {
    pub user_profile: UserProfile,
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedResume {
    pub resume: String,
    pub job_id: String,
    /// False when the deterministic rendering was returned instead of a rewrite.
    pub personalized: bool,
}

// ── Resume analysis ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFitRequest {
    pub resume_data: Resume,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_school: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeTextUpload {
    pub text: String,
}

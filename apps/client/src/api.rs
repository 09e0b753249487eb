//! Typed client for the Match Your Job REST API.
//!
//! Every call unwraps the `{ success, data, error }` envelope the same way: a
//! non-2xx status or `success: false` becomes a [`ClientError`] carrying the
//! server's message. Calls are passed straight through, with no retry and no
//! caching.

use std::time::Duration;

use jobmatch_core::models::api::{
    AnalyzeFitRequest, ApiResponse, AuthPayload, ImportJobsRequest, ImportSummary, JobOffersPage,
    JobOffersQuery, JobStats, MatchOptions, MatchRequest, MatchedJobs, PersonalizedResume,
    PersonalizedResumeRequest, ProfileEnvelope, ResumeTextUpload, SignInRequest, SignOutRequest,
    SignUpRequest, User,
};
use jobmatch_core::models::{Job, JobFitAnalysis, Resume, StudyProgram, UserProfile};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::storage::StoreError;

pub const SESSION_HEADER: &str = "X-Session-ID";
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Local storage error: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` includes the `/api` prefix, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── Health & resumes ────────────────────────────────────────────────────

    /// `true` only when the server answers with a 2xx status.
    pub async fn check_health(&self) -> bool {
        match self.client.get(self.url("/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        }
    }

    pub async fn upload_resume_pdf(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Resume, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);
        send(self.client.post(self.url("/upload-resume")).multipart(form)).await
    }

    pub async fn upload_resume_text(&self, text: &str) -> Result<Resume, ClientError> {
        let body = ResumeTextUpload {
            text: text.to_string(),
        };
        send(self.client.post(self.url("/upload-resume")).json(&body)).await
    }

    pub async fn get_resume(&self, id: Uuid) -> Result<Resume, ClientError> {
        send(self.client.get(self.url(&format!("/resumes/{id}")))).await
    }

    pub async fn analyze_job_fit(
        &self,
        request: &AnalyzeFitRequest,
    ) -> Result<JobFitAnalysis, ClientError> {
        send(self.client.post(self.url("/analyze-job-fit")).json(request)).await
    }

    pub async fn study_programs(&self) -> Result<Vec<StudyProgram>, ClientError> {
        send(self.client.get(self.url("/study-programs"))).await
    }

    // ── Job offers ──────────────────────────────────────────────────────────

    pub async fn job_offers(&self, query: &JobOffersQuery) -> Result<JobOffersPage, ClientError> {
        send(self.client.get(self.url("/job-offers")).query(query)).await
    }

    pub async fn job_stats(&self) -> Result<JobStats, ClientError> {
        send(self.client.get(self.url("/job-offers/stats"))).await
    }

    pub async fn matched_jobs(
        &self,
        profile: &UserProfile,
        options: MatchOptions,
    ) -> Result<MatchedJobs, ClientError> {
        let body = MatchRequest {
            user_profile: profile.clone(),
            options,
        };
        send(self.client.post(self.url("/job-offers/matched")).json(&body)).await
    }

    pub async fn personalized_resume(
        &self,
        profile: &UserProfile,
        job_id: &str,
        language: Option<&str>,
    ) -> Result<PersonalizedResume, ClientError> {
        let body = PersonalizedResumeRequest {
            user_profile: profile.clone(),
            job_id: job_id.to_string(),
            language: language.map(String::from),
        };
        send(
            self.client
                .post(self.url("/job-offers/personalized-resume"))
                .json(&body),
        )
        .await
    }

    pub async fn import_jobs(
        &self,
        admin_token: &str,
        jobs: Vec<Job>,
    ) -> Result<ImportSummary, ClientError> {
        send(
            self.client
                .post(self.url("/job-offers/import"))
                .header(ADMIN_TOKEN_HEADER, admin_token)
                .json(&ImportJobsRequest { jobs }),
        )
        .await
    }

    // ── Auth ────────────────────────────────────────────────────────────────

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: Option<UserProfile>,
    ) -> Result<AuthPayload, ClientError> {
        let body = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            profile,
        };
        send(self.client.post(self.url("/auth/signup")).json(&body)).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthPayload, ClientError> {
        let body = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        send(self.client.post(self.url("/auth/signin")).json(&body)).await
    }

    pub async fn sign_out(&self, session_id: &str) -> Result<(), ClientError> {
        let body = SignOutRequest {
            session_id: session_id.to_string(),
        };
        send_unit(self.client.post(self.url("/auth/signout")).json(&body)).await
    }

    /// The account behind `session_id`, or `None` on any failure.
    pub async fn current_user(&self, session_id: &str) -> Option<User> {
        let request = self
            .client
            .get(self.url("/auth/me"))
            .header(SESSION_HEADER, session_id);
        match send::<User>(request).await {
            Ok(user) => Some(user),
            Err(e) => {
                debug!("Session lookup failed: {}", e);
                None
            }
        }
    }

    pub async fn update_profile(
        &self,
        session_id: &str,
        profile: &UserProfile,
    ) -> Result<User, ClientError> {
        let body = ProfileEnvelope {
            profile: profile.clone(),
        };
        send(
            self.client
                .put(self.url("/auth/profile"))
                .header(SESSION_HEADER, session_id)
                .json(&body),
        )
        .await
    }
}

// ── Envelope handling ───────────────────────────────────────────────────────

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let envelope: ApiResponse<T> = send_envelope(request).await?;
    envelope
        .data
        .ok_or_else(|| ClientError::Api("Response carried no data".to_string()))
}

async fn send_unit(request: RequestBuilder) -> Result<(), ClientError> {
    send_envelope::<serde_json::Value>(request).await.map(|_| ())
}

async fn send_envelope<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<ApiResponse<T>, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ClientError::Http {
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            }),
        });
    }

    let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
    if !envelope.success {
        return Err(ClientError::Api(
            envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "Request failed".to_string()),
        ));
    }
    Ok(envelope)
}

/// Pulls `error` (or `message`) out of an error body, if it is an envelope.
fn error_message(body: &str) -> Option<String> {
    let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(body).ok()?;
    envelope.error.or(envelope.message)
}

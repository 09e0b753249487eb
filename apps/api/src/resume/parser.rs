//! Resume upload pipeline: accept a PDF or text body, extract the text,
//! parse it with the LLM, then archive the PDF and persist the result.

use std::future::Future;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use jobmatch_core::models::api::ResumeTextUpload;
use jobmatch_core::models::resume::{Certification, ContactInfo, Education, Experience};
use jobmatch_core::models::Resume;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::json_system;
use crate::llm_client::{LlmClient, LlmTask};
use crate::models::resume::ResumeRow;
use crate::resume::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_ROLE};
use crate::state::AppState;
use crate::storage::archive_resume_pdf;

/// Longest resume text sent to the LLM, in characters.
const MAX_RESUME_CHARS: usize = 30_000;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Body of `POST /upload-resume`.
#[derive(Debug)]
pub enum ResumeUpload {
    Pdf { filename: String, bytes: Bytes },
    Text(String),
}

/// Multipart bodies are read from the `file` / `resume` part (PDF or plain
/// text) or a `text` part. Any other content type is read as JSON `{ text }`.
#[async_trait]
impl<S> FromRequest<S> for ResumeUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, AppError> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if !content_type.starts_with("multipart/form-data") {
            let Json(body) = Json::<ResumeTextUpload>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            return Ok(ResumeUpload::Text(body.text));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" | "resume" => {
                    let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                    let declared = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|_| AppError::Validation("Invalid file".to_string()))?;
                    return classify_file(filename, declared.as_deref(), bytes);
                }
                "text" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|_| AppError::Validation("Invalid text field".to_string()))?;
                    return Ok(ResumeUpload::Text(text));
                }
                _ => continue,
            }
        }

        Err(AppError::Validation(
            "Either a file or text must be provided".to_string(),
        ))
    }
}

/// PDFs are recognised by magic bytes, content type or extension; plain text
/// files are accepted as text. Anything else is rejected.
fn classify_file(
    filename: String,
    content_type: Option<&str>,
    bytes: Bytes,
) -> Result<ResumeUpload, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let lower_name = filename.to_lowercase();
    let is_pdf = bytes.starts_with(PDF_MAGIC)
        || content_type == Some("application/pdf")
        || lower_name.ends_with(".pdf");
    if is_pdf {
        return Ok(ResumeUpload::Pdf { filename, bytes });
    }

    let is_text = content_type.is_some_and(|t| t.starts_with("text/")) || lower_name.ends_with(".txt");
    if is_text {
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::Validation("Text file is not valid UTF-8".to_string()))?;
        return Ok(ResumeUpload::Text(text));
    }

    Err(AppError::Validation(
        "Only PDF or plain text files are supported".to_string(),
    ))
}

/// Extracts text from a PDF. Runs on the blocking pool since parsing is CPU-bound.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}")))?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

/// Shape the LLM returns; the server adds id and timestamp.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParsedResume {
    skills: Vec<String>,
    education: Vec<Education>,
    experience: Vec<Experience>,
    certifications: Vec<Certification>,
    keywords: Vec<String>,
    contact_info: ContactInfo,
}

impl ParsedResume {
    fn into_resume(self, id: Uuid, created_at: DateTime<Utc>) -> Resume {
        Resume {
            id,
            skills: dedup_terms(self.skills),
            education: self.education,
            experience: self.experience,
            certifications: self.certifications,
            keywords: dedup_terms(self.keywords),
            contact_info: self.contact_info,
            created_at,
        }
    }
}

/// Trims, drops blanks and case-insensitive repeats, keeps first spelling.
fn dedup_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Parses resume text into a structured `Resume` using the LLM.
pub async fn parse_resume_text(
    llm: &LlmClient,
    id: Uuid,
    text: &str,
    now: DateTime<Utc>,
) -> Result<Resume, AppError> {
    let prompt = RESUME_PARSE_PROMPT_TEMPLATE
        .replace("{resume_text}", truncate_chars(text, MAX_RESUME_CHARS));
    let parsed = llm
        .call_json::<ParsedResume>(
            LlmTask::ParseResume,
            &prompt,
            &json_system(RESUME_PARSE_ROLE),
        )
        .await
        .map_err(|e| AppError::Llm(format!("Resume parsing failed: {e}")))?;
    Ok(parsed.into_resume(id, now))
}

pub async fn insert_resume(
    pool: &PgPool,
    resume: &Resume,
    raw_text: &str,
    s3_key: Option<&str>,
) -> Result<(), AppError> {
    let data = serde_json::to_value(resume).map_err(anyhow::Error::from)?;
    sqlx::query(
        "INSERT INTO resumes (id, data, raw_text, s3_key, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(resume.id)
    .bind(data)
    .bind(raw_text)
    .bind(s3_key)
    .bind(resume.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_resume(pool: &PgPool, id: Uuid) -> Result<Option<Resume>, AppError> {
    let row: Option<ResumeRow> = sqlx::query_as("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| serde_json::from_value(r.data).map_err(|e| AppError::Internal(e.into())))
        .transpose()
}

/// Awaits `archive` only once `parse` has succeeded. Futures are lazy, so a
/// failed parse never touches the bucket.
async fn parse_then_archive<T, P, A>(
    parse: P,
    archive: Option<A>,
) -> Result<(T, Option<String>), AppError>
where
    P: Future<Output = Result<T, AppError>>,
    A: Future<Output = Result<String, AppError>>,
{
    let parsed = parse.await?;
    let key = match archive {
        Some(archive) => Some(archive.await?),
        None => None,
    };
    Ok((parsed, key))
}

/// Full upload pipeline. Returns the stored resume.
pub async fn ingest_upload(state: &AppState, upload: ResumeUpload) -> Result<Resume, AppError> {
    let id = Uuid::new_v4();

    let (text, pdf) = match upload {
        ResumeUpload::Pdf { filename, bytes } => {
            info!("Received PDF resume '{}' ({} bytes)", filename, bytes.len());
            let text = extract_pdf_text(bytes.clone()).await?;
            (text, Some(bytes))
        }
        ResumeUpload::Text(text) => (text, None),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Resume text cannot be empty".to_string(),
        ));
    }

    let archive =
        pdf.map(|bytes| archive_resume_pdf(&state.s3, &state.config.s3_bucket, id, bytes));
    let (resume, s3_key) =
        parse_then_archive(parse_resume_text(&state.llm, id, text, Utc::now()), archive).await?;
    insert_resume(&state.db, &resume, text, s3_key.as_deref()).await?;

    info!(
        "Stored resume {} ({} skills, {} experience entries)",
        resume.id,
        resume.skills.len(),
        resume.experience.len()
    );
    Ok(resume)
}

//! LLM Client: every Claude API call made by the server goes through here.
//!
//! Calls are tagged with an [`LlmTask`], which fixes the output budget and
//! names the call in logs. Callers decide how to degrade when a call fails;
//! this module only retries transient failures.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF_MS: u64 = 1000;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("LLM returned no usable content")]
    EmptyContent,
}

/// What a call is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmTask {
    ParseResume,
    ParseJobDescription,
    ExplainFit,
    TailorResume,
}

impl LlmTask {
    pub fn label(self) -> &'static str {
        match self {
            LlmTask::ParseResume => "resume-parse",
            LlmTask::ParseJobDescription => "jd-parse",
            LlmTask::ExplainFit => "fit-explain",
            LlmTask::TailorResume => "resume-tailor",
        }
    }

    /// Output token budget. Tailoring returns a whole resume; the rest return
    /// compact JSON.
    pub fn max_tokens(self) -> u32 {
        match self {
            LlmTask::ParseResume => 4096,
            LlmTask::ParseJobDescription => 2048,
            LlmTask::ExplainFit => 2048,
            LlmTask::TailorResume => 4096,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Concatenated text of all text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Result of one HTTP attempt.
enum Attempt {
    Done(LlmResponse),
    Retry(LlmError),
    Fail(LlmError),
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// 1s, 2s, 4s, ... before the second, third, fourth attempt.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(BASE_BACKOFF_MS << attempt.saturating_sub(1).min(6))
}

/// Shared through `AppState`; cloning shares the connection pool.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, api_key })
    }

    /// Raw call, retrying rate limits, 5xx responses and transport errors.
    pub async fn call(
        &self,
        task: LlmTask,
        prompt: &str,
        system: &str,
    ) -> Result<LlmResponse, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: task.max_tokens(),
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = None;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(
                    "{} call failed (attempt {}), retrying in {}ms",
                    task.label(),
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.attempt(&body).await {
                Attempt::Done(response) => {
                    debug!(
                        "{} call ok: input_tokens={}, output_tokens={}",
                        task.label(),
                        response.usage.input_tokens,
                        response.usage.output_tokens
                    );
                    return Ok(response);
                }
                Attempt::Retry(e) => last_error = Some(e),
                Attempt::Fail(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
        }))
    }

    async fn attempt(&self, body: &MessagesRequest<'_>) -> Attempt {
        let response = match self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Attempt::Retry(LlmError::Http(e)),
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<LlmResponse>().await {
                Ok(parsed) => Attempt::Done(parsed),
                Err(e) => Attempt::Fail(LlmError::Http(e)),
            };
        }

        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&raw)
            .map(|e| e.error.message)
            .unwrap_or(raw);
        let error = LlmError::Api {
            status: status.as_u16(),
            message,
        };
        if is_transient(status) {
            Attempt::Retry(error)
        } else {
            Attempt::Fail(error)
        }
    }

    /// Trimmed free text.
    pub async fn call_text(
        &self,
        task: LlmTask,
        prompt: &str,
        system: &str,
    ) -> Result<String, LlmError> {
        let text = self.call(task, prompt, system).await?.text();
        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text.to_string())
    }

    /// Deserializes the JSON document in the reply. The prompt must ask for JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        task: LlmTask,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let text = self.call(task, prompt, system).await?.text();
        let json = extract_json(&text).ok_or(LlmError::EmptyContent)?;
        Ok(serde_json::from_str(json)?)
    }
}

/// The outermost JSON object or array in `text`, ignoring code fences and
/// any prose the model wrapped around it.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = match text.as_bytes()[start] {
        b'{' => '}',
        _ => ']',
    };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

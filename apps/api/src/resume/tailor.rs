//! Job-specific resume via the LLM, with the deterministic rendering as fallback.

use jobmatch_core::models::api::PersonalizedResume;
use jobmatch_core::models::{Job, UserProfile};
use tracing::{info, warn};

use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmTask};
use crate::resume::prompts::{TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};
use crate::resume::render::render_resume;

pub const DEFAULT_LANGUAGE: &str = "English";

/// Accepts language names or the short codes the client sends.
pub fn language_name(requested: Option<&str>) -> String {
    let Some(raw) = requested.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_LANGUAGE.to_string();
    };
    match raw.to_lowercase().as_str() {
        "en" | "english" => "English".to_string(),
        "sk" | "slovak" | "slovensky" | "slovenčina" => "Slovak".to_string(),
        "cs" | "cz" | "czech" => "Czech".to_string(),
        "de" | "german" | "deutsch" => "German".to_string(),
        _ => raw.to_string(),
    }
}

pub fn build_tailor_prompt(base: &str, job: &Job, language: &str) -> String {
    let skills = if job.skills.is_empty() {
        "(not listed)".to_string()
    } else {
        job.skills.join(", ")
    };
    TAILOR_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{language}", language)
        .replace("{job_title}", &job.title)
        .replace("{company}", &job.company)
        .replace("{job_skills}", &skills)
        .replace("{job_description}", job.body_text())
        .replace("{resume}", base)
}

/// Never fails: an LLM error returns the tailored deterministic rendering
/// with `personalized: false`.
pub async fn personalize_resume(
    llm: &LlmClient,
    profile: &UserProfile,
    job: &Job,
    language: Option<&str>,
) -> PersonalizedResume {
    let base = render_resume(profile, Some(job));
    let language = language_name(language);
    let prompt = build_tailor_prompt(&base, job, &language);

    match llm.call_text(LlmTask::TailorResume, &prompt, TAILOR_SYSTEM).await {
        Ok(text) => {
            info!("Personalized resume for job {} in {}", job.id, language);
            PersonalizedResume {
                resume: text,
                job_id: job.id.clone(),
                personalized: true,
            }
        }
        Err(e) => {
            warn!("Resume personalization failed for job {}, using rendered resume: {e}", job.id);
            PersonalizedResume {
                resume: base,
                job_id: job.id.clone(),
                personalized: false,
            }
        }
    }
}

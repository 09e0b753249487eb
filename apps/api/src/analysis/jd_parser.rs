//! JD parser: extracts the weighted keyword inventory from a raw job description.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::prompts::{JD_PARSE_PROMPT_TEMPLATE, JD_PARSE_ROLE};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{LlmClient, LlmTask};

/// Weight used when keywords come from a fixed list rather than the LLM.
const FALLBACK_POSITION_WEIGHT: f32 = 0.8;

/// Skills recognised without the LLM.
const KNOWN_SKILLS: &[&str] = &[
    "Rust", "Go", "Java", "Kotlin", "Python", "JavaScript", "TypeScript", "C++", "C#", "PHP",
    "Ruby", "Swift", "SQL", "PostgreSQL", "MySQL", "MongoDB", "Redis", "Kafka", "React",
    "Angular", "Vue", "Node.js", "Django", "Spring", ".NET", "Docker", "Kubernetes", "AWS",
    "Azure", "GCP", "Terraform", "Linux", "Git", "CI/CD", "REST", "GraphQL", "Microservices",
    "Machine Learning", "Statistics", "Excel", "Figma", "Agile", "Scrum",
];

/// A single keyword from the JD, weighted by position and frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
    /// title=1.0, requirements=0.8, responsibilities=0.6, about=0.3
    pub position_weight: f32,
    /// frequency * position_weight
    pub weighted_score: f32,
}

impl KeywordEntry {
    pub fn new(keyword: impl Into<String>, frequency: u32, position_weight: f32) -> Self {
        Self {
            keyword: keyword.into(),
            frequency,
            position_weight,
            weighted_score: frequency as f32 * position_weight,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedJobDescription {
    pub hard_requirements: Vec<String>,
    pub seniority: String,
    pub keyword_inventory: Vec<KeywordEntry>,
}

/// Parses a job description with the LLM. If the call fails or yields no
/// keywords, falls back to scanning for known skills.
pub async fn parse_job_description(jd_text: &str, llm: &LlmClient) -> ParsedJobDescription {
    let prompt = JD_PARSE_PROMPT_TEMPLATE.replace("{jd_text}", jd_text);
    match llm
        .call_json::<ParsedJobDescription>(
            LlmTask::ParseJobDescription,
            &prompt,
            &json_system(JD_PARSE_ROLE),
        )
        .await
    {
        Ok(parsed) if !parsed.keyword_inventory.is_empty() => parsed,
        Ok(_) => {
            warn!("JD parsing returned no keywords, scanning for known skills");
            scan_known_skills(jd_text)
        }
        Err(e) => {
            warn!("JD parsing failed, scanning for known skills: {e}");
            scan_known_skills(jd_text)
        }
    }
}

/// Keyword inventory built from `KNOWN_SKILLS` occurrences in the text.
pub fn scan_known_skills(jd_text: &str) -> ParsedJobDescription {
    let text = jd_text.to_lowercase();
    let keyword_inventory = KNOWN_SKILLS
        .iter()
        .filter_map(|skill| {
            let needle = skill.to_lowercase();
            let frequency = count_mentions(&text, &needle);
            (frequency > 0).then(|| KeywordEntry::new(*skill, frequency, FALLBACK_POSITION_WEIGHT))
        })
        .collect();

    ParsedJobDescription {
        hard_requirements: vec![],
        seniority: "unknown".to_string(),
        keyword_inventory,
    }
}

/// Whole-word occurrences of `needle` in `text`; both lowercase.
fn count_mentions(text: &str, needle: &str) -> u32 {
    text.match_indices(needle)
        .filter(|(pos, _)| {
            let before = text[..*pos].chars().next_back();
            let after = text[pos + needle.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
        .count() as u32
}

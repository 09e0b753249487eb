//! Fit analysis: measures a parsed resume against a weighted keyword inventory.
//!
//! Algorithm:
//! 1. For each keyword:
//!    - exact match against a resume tag (skill, keyword, technology,
//!      certification) → strength 1.0
//!    - whole-word mention in the resume's free text → strength 0.6
//!    - no match → strength 0.0
//! 2. fit_score = Σ(strength × weighted_score) / Σ(weighted_score) × 100
//! 3. Explanation, suggestions and resources come from the LLM; on failure
//!    they are built from the gaps.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jobmatch_core::models::resume::{Difficulty, ResourceType};
use jobmatch_core::models::{JobFitAnalysis, RecommendedResource, Resume};
use serde::Deserialize;
use tracing::warn;

use crate::analysis::jd_parser::KeywordEntry;
use crate::analysis::prompts::{FIT_EXPLAIN_PROMPT_TEMPLATE, FIT_EXPLAIN_ROLE};
use crate::llm_client::prompts::{json_system, GROUNDING_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmTask};
use crate::matching::scorer::mentions_term;

const TAG_STRENGTH: f32 = 1.0;
const TEXT_STRENGTH: f32 = 0.6;
const MAX_ADVICE: usize = 5;
const TOP_GAPS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Keyword fit
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordFit {
    pub fit_score: u32, // 0 – 100
    /// Covered keywords, strongest weighted first.
    pub matched_skills: Vec<String>,
    /// Uncovered keywords, heaviest first.
    pub missing_skills: Vec<String>,
}

fn resume_tags(resume: &Resume) -> HashSet<String> {
    resume
        .skills
        .iter()
        .chain(resume.keywords.iter())
        .chain(resume.experience.iter().flat_map(|e| e.technologies.iter()))
        .chain(resume.certifications.iter().map(|c| &c.name))
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn resume_text(resume: &Resume) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for exp in &resume.experience {
        parts.extend([exp.position.as_str(), exp.description.as_str()]);
    }
    for edu in &resume.education {
        parts.extend([edu.degree.as_str(), edu.field.as_str()]);
    }
    parts.join(" ").to_lowercase()
}

pub fn compute_keyword_fit(resume: &Resume, keywords: &[KeywordEntry]) -> KeywordFit {
    let tags = resume_tags(resume);
    let text = resume_text(resume);

    let mut seen = HashSet::new();
    let mut total_weighted = 0.0_f32;
    let mut total_score = 0.0_f32;
    let mut matched: Vec<(&KeywordEntry, f32)> = Vec::new();
    let mut missing: Vec<&KeywordEntry> = Vec::new();

    for entry in keywords {
        let key = entry.keyword.trim().to_lowercase();
        if key.is_empty() || !seen.insert(key.clone()) {
            continue;
        }
        let weight = entry.weighted_score.max(0.0);
        total_weighted += weight;

        let strength = if tags.contains(&key) {
            TAG_STRENGTH
        } else if mentions_term(&text, &key) {
            TEXT_STRENGTH
        } else {
            0.0
        };
        total_score += strength * weight;

        if strength > 0.0 {
            matched.push((entry, strength * weight));
        } else {
            missing.push(entry);
        }
    }

    let fit_score = if total_weighted > 0.0 {
        ((total_score / total_weighted) * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };

    matched.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    missing.sort_by(|a, b| {
        b.weighted_score
            .partial_cmp(&a.weighted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    KeywordFit {
        fit_score,
        matched_skills: matched.into_iter().map(|(e, _)| e.keyword.clone()).collect(),
        missing_skills: missing.into_iter().map(|e| e.keyword.clone()).collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Explanation and advice
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FitInsights {
    explanation: String,
    suggestions_to_improve: Vec<String>,
    recommended_resources: Vec<RecommendedResource>,
}

/// Human-readable verdict from score and gaps.
pub fn build_explanation(target: &str, score: u32, missing: &[String]) -> String {
    let top_gaps: Vec<&str> = missing.iter().take(TOP_GAPS).map(String::as_str).collect();

    if score >= 80 {
        format!("Strong fit for {target} ({score}/100). Your resume covers the key requirements.")
    } else if top_gaps.is_empty() {
        format!("Moderate fit for {target} ({score}/100). Make your experience with the required skills more explicit.")
    } else if score >= 60 {
        format!(
            "Moderate fit for {target} ({score}/100). Strengthen: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low fit for {target} ({score}/100). Significant gaps: {}.",
            top_gaps.join(", ")
        )
    }
}

pub fn build_suggestions(missing: &[String]) -> Vec<String> {
    if missing.is_empty() {
        return vec![
            "Quantify the impact of your projects with concrete results".to_string(),
        ];
    }
    missing
        .iter()
        .take(MAX_ADVICE)
        .map(|skill| format!("Gain hands-on experience with {skill} through a small project"))
        .collect()
}

pub fn build_resources(missing: &[String]) -> Vec<RecommendedResource> {
    missing
        .iter()
        .take(TOP_GAPS)
        .map(|skill| RecommendedResource {
            resource_type: ResourceType::Course,
            title: format!("{skill} Fundamentals"),
            provider: "Coursera".to_string(),
            url: reqwest::Url::parse_with_params(
                "https://www.coursera.org/search",
                &[("query", skill.as_str())],
            )
            .map(String::from)
            .unwrap_or_else(|_| "https://www.coursera.org".to_string()),
            relevance: format!("Covers the missing skill {skill}"),
            difficulty: Difficulty::Beginner,
        })
        .collect()
}

fn resume_summary(resume: &Resume) -> String {
    let mut lines = Vec::new();
    if !resume.skills.is_empty() {
        lines.push(format!("Skills: {}", resume.skills.join(", ")));
    }
    for exp in &resume.experience {
        lines.push(format!(
            "Experience: {} at {}. {}",
            exp.position, exp.company, exp.description
        ));
    }
    for edu in &resume.education {
        lines.push(format!(
            "Education: {} {} at {}",
            edu.degree, edu.field, edu.institution
        ));
    }
    for cert in &resume.certifications {
        lines.push(format!("Certification: {}", cert.name));
    }
    lines.join("\n")
}

/// Full analysis. The LLM only writes the prose; score and skill lists are
/// always the deterministic keyword fit.
pub async fn analyze_fit(
    llm: &LlmClient,
    resume: &Resume,
    target: &str,
    keywords: &[KeywordEntry],
    now: DateTime<Utc>,
) -> JobFitAnalysis {
    let fit = compute_keyword_fit(resume, keywords);

    let none = || "(none)".to_string();
    let join_or_none = |v: &[String]| if v.is_empty() { none() } else { v.join(", ") };
    let prompt = FIT_EXPLAIN_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{target}", target)
        .replace("{fit_score}", &fit.fit_score.to_string())
        .replace("{matched}", &join_or_none(&fit.matched_skills))
        .replace("{missing}", &join_or_none(&fit.missing_skills))
        .replace("{resume_summary}", &resume_summary(resume));

    let insights = match llm
        .call_json::<FitInsights>(
            LlmTask::ExplainFit,
            &prompt,
            &json_system(FIT_EXPLAIN_ROLE),
        )
        .await
    {
        Ok(insights) if !insights.explanation.trim().is_empty() => Some(insights),
        Ok(_) => None,
        Err(e) => {
            warn!("Fit explanation failed, using keyword summary: {e}");
            None
        }
    };

    let (explanation, suggestions_to_improve, recommended_resources) = match insights {
        Some(i) => (
            i.explanation,
            i.suggestions_to_improve.into_iter().take(MAX_ADVICE).collect(),
            i.recommended_resources.into_iter().take(MAX_ADVICE).collect(),
        ),
        None => (
            build_explanation(target, fit.fit_score, &fit.missing_skills),
            build_suggestions(&fit.missing_skills),
            build_resources(&fit.missing_skills),
        ),
    };

    JobFitAnalysis {
        fit_score: fit.fit_score,
        explanation,
        missing_skills: fit.missing_skills,
        matched_skills: fit.matched_skills,
        suggestions_to_improve,
        recommended_resources,
        analyzed_at: now,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Keyword matcher: deterministic, no LLM call.
//!
//! Algorithm:
//! 1. Score four dimensions in 0.0 – 1.0:
//!    - skills (0.45): job skill in primary skills → 1.0, in secondary → 0.7,
//!      mentioned in work history → 0.6, else 0.0; mean over the job's skills.
//!      Jobs without a skill list: share of the first five primary skills
//!      mentioned in the job text.
//!    - role (0.20): share of desired-position words in the job title; 1.0 when
//!      a preferred job type matches.
//!    - experience level (0.15): exact 1.0, adjacent 0.5, unknown 0.5.
//!    - location (0.20): remote fit, home/preferred location, relocation.
//! 2. score = round(Σ weight × dimension × 100)
//! 3. Reasons come from dimensions scoring ≥ 0.5, strongest weighted first.

use std::collections::HashSet;

use async_trait::async_trait;
use jobmatch_core::filter::is_remote_job;
use jobmatch_core::models::{ExperienceLevel, Job, RemotePreference, UserProfile};

use crate::errors::AppError;
use crate::matching::{JobMatch, JobMatcher};

const SKILL_WEIGHT: f64 = 0.45;
const ROLE_WEIGHT: f64 = 0.20;
const LEVEL_WEIGHT: f64 = 0.15;
const LOCATION_WEIGHT: f64 = 0.20;

const PRIMARY_STRENGTH: f64 = 1.0;
const SECONDARY_STRENGTH: f64 = 0.7;
const HISTORY_STRENGTH: f64 = 0.6;

/// Primary skills considered when a job has no explicit skill list.
const TEXT_SKILL_SAMPLE: usize = 5;

const REASON_THRESHOLD: f64 = 0.5;

const TITLE_STOPWORDS: &[&str] = &["and", "the", "for", "with", "m/f", "f/m"];

pub struct KeywordJobMatcher;

#[async_trait]
impl JobMatcher for KeywordJobMatcher {
    async fn score(&self, profile: &UserProfile, job: &Job) -> Result<JobMatch, AppError> {
        Ok(score_job(profile, job))
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

struct Dimension {
    weight: f64,
    value: f64,
    reason: Option<String>,
}

struct SkillFit {
    value: f64,
    matched: Vec<String>,
    missing: Vec<String>,
    reason: Option<String>,
}

pub fn score_job(profile: &UserProfile, job: &Job) -> JobMatch {
    let skills = score_skills(profile, job);

    let dimensions = [
        Dimension {
            weight: SKILL_WEIGHT,
            value: skills.value,
            reason: skills.reason.clone(),
        },
        score_role(profile, job),
        score_level(profile, job),
        score_location(profile, job),
    ];

    let total: f64 = dimensions.iter().map(|d| d.weight * d.value).sum();
    let score = (total * 100.0).round().clamp(0.0, 100.0) as u32;

    let mut contributing: Vec<&Dimension> = dimensions
        .iter()
        .filter(|d| d.value >= REASON_THRESHOLD && d.reason.is_some())
        .collect();
    contributing.sort_by(|a, b| {
        (b.weight * b.value)
            .partial_cmp(&(a.weight * a.value))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let reasons = contributing
        .into_iter()
        .filter_map(|d| d.reason.clone())
        .collect();

    JobMatch {
        score,
        reasons,
        matched_skills: skills.matched,
        missing_skills: skills.missing,
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// True if `term` occurs in `haystack` with no alphanumeric character glued
/// to either side. Both arguments must already be lowercase.
pub fn mentions_term(haystack: &str, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return false;
    }

    let mut start = 0;
    while let Some(pos) = haystack[start..].find(term) {
        let begin = start + pos;
        let end = begin + term.len();
        let before_ok = haystack[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + term.chars().next().map_or(1, char::len_utf8);
    }
    false
}

fn work_history_text(profile: &UserProfile) -> String {
    profile
        .work_experience
        .iter()
        .flat_map(|w| [w.position.as_str(), w.description.as_str()])
        .chain(
            profile
                .projects
                .iter()
                .flat_map(|p| p.technologies.iter().map(String::as_str)),
        )
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn job_text(job: &Job) -> String {
    let mut parts = vec![job.title.as_str(), job.body_text()];
    parts.extend(job.requirements.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}

fn score_skills(profile: &UserProfile, job: &Job) -> SkillFit {
    let primary: HashSet<String> = profile.primary_skills.iter().map(|s| normalize(s)).collect();
    let secondary: HashSet<String> = profile
        .secondary_skills
        .iter()
        .map(|s| normalize(s))
        .collect();

    if !job.skills.is_empty() {
        let history = work_history_text(profile);
        let mut matched = Vec::new();
        let mut missing = Vec::new();
        let mut total = 0.0;

        for skill in &job.skills {
            let key = normalize(skill);
            let strength = if primary.contains(&key) {
                PRIMARY_STRENGTH
            } else if secondary.contains(&key) {
                SECONDARY_STRENGTH
            } else if mentions_term(&history, &key) {
                HISTORY_STRENGTH
            } else {
                0.0
            };
            total += strength;
            if strength > 0.0 {
                matched.push(skill.clone());
            } else {
                missing.push(skill.clone());
            }
        }

        let value = total / job.skills.len() as f64;
        let reason = (!matched.is_empty()).then(|| {
            format!(
                "Matches {} of {} required skills: {}",
                matched.len(),
                job.skills.len(),
                matched.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
            )
        });
        return SkillFit {
            value,
            matched,
            missing,
            reason,
        };
    }

    let text = job_text(job);
    let sample: Vec<&String> = profile
        .primary_skills
        .iter()
        .filter(|s| !s.trim().is_empty())
        .take(TEXT_SKILL_SAMPLE)
        .collect();
    if sample.is_empty() {
        return SkillFit {
            value: 0.0,
            matched: vec![],
            missing: vec![],
            reason: None,
        };
    }

    let (matched, missing): (Vec<String>, Vec<String>) = sample
        .iter()
        .map(|s| (*s).clone())
        .partition(|s| mentions_term(&text, &normalize(s)));
    let value = matched.len() as f64 / sample.len() as f64;
    let reason = (!matched.is_empty()).then(|| {
        format!(
            "Your skills {} appear in the job description",
            matched.join(", ")
        )
    });

    SkillFit {
        value,
        matched,
        missing,
        reason,
    }
}

fn score_role(profile: &UserProfile, job: &Job) -> Dimension {
    let title = job.title.to_lowercase();
    let job_type = job.job_type.to_lowercase();

    let preferred_type = profile
        .job_types
        .iter()
        .map(|t| normalize(t))
        .find(|t| !t.is_empty() && (job_type == *t || mentions_term(&title, t)));
    if let Some(found) = preferred_type {
        let original = profile
            .job_types
            .iter()
            .find(|t| normalize(t) == found)
            .cloned()
            .unwrap_or(found);
        return Dimension {
            weight: ROLE_WEIGHT,
            value: 1.0,
            reason: Some(format!("Fits your preferred job type: {original}")),
        };
    }

    let desired = profile.desired_position.as_deref().unwrap_or("").trim();
    let words: Vec<String> = desired
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
        .filter(|w| w.len() >= 2 && !TITLE_STOPWORDS.contains(w))
        .map(String::from)
        .collect();

    if words.is_empty() {
        // Nothing to compare against; stay neutral.
        return Dimension {
            weight: ROLE_WEIGHT,
            value: 0.5,
            reason: None,
        };
    }

    let found = words.iter().filter(|w| mentions_term(&title, w)).count();
    let value = found as f64 / words.len() as f64;
    let reason =
        (value >= REASON_THRESHOLD).then(|| format!("Title matches your desired position ({desired})"));

    Dimension {
        weight: ROLE_WEIGHT,
        value,
        reason,
    }
}

/// Level implied by years of experience when the profile states none.
fn level_from_years(years: f64) -> ExperienceLevel {
    if years < 2.0 {
        ExperienceLevel::Junior
    } else if years < 5.0 {
        ExperienceLevel::Mid
    } else if years < 8.0 {
        ExperienceLevel::Senior
    } else {
        ExperienceLevel::Lead
    }
}

fn score_level(profile: &UserProfile, job: &Job) -> Dimension {
    let candidate = profile.experience_level.or_else(|| {
        profile
            .years_of_experience
            .filter(|y| *y > 0.0)
            .map(level_from_years)
    });
    let wanted = ExperienceLevel::parse_loose(&job.experience_level);

    let (value, reason) = match (candidate, wanted) {
        (Some(have), Some(want)) => match (have.rank() - want.rank()).abs() {
            0 => (1.0, Some(format!("Experience level matches ({})", want.as_str()))),
            1 => (
                0.5,
                Some(format!(
                    "Experience level is close to yours ({} vs {})",
                    want.as_str(),
                    have.as_str()
                )),
            ),
            _ => (0.0, None),
        },
        _ => (0.5, None),
    };

    Dimension {
        weight: LEVEL_WEIGHT,
        value,
        reason,
    }
}

fn score_location(profile: &UserProfile, job: &Job) -> Dimension {
    let preference = profile.remote_preference.unwrap_or_default();

    if is_remote_job(job) {
        let (value, reason) = match preference {
            RemotePreference::Onsite => (0.4, None),
            RemotePreference::Remote => (1.0, Some("Remote position fits your remote preference")),
            RemotePreference::Hybrid => (
                1.0,
                Some("Remote-friendly position fits your hybrid preference"),
            ),
            RemotePreference::Flexible => (1.0, Some("Remote position")),
        };
        return Dimension {
            weight: LOCATION_WEIGHT,
            value,
            reason: reason.map(String::from),
        };
    }

    let location = job.location.to_lowercase();
    let home = [
        profile.current_location.as_deref(),
        profile.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .chain(profile.preferred_locations.iter().map(String::as_str))
    .map(str::trim)
    .find(|place| !place.is_empty() && mentions_term(&location, &place.to_lowercase()));

    let (value, reason) = if let Some(place) = home {
        (1.0, Some(format!("Located in {place}")))
    } else if profile.willing_to_relocate {
        (0.6, Some(format!("Relocation possible to {}", job.location)))
    } else {
        (0.2, None)
    };

    Dimension {
        weight: LOCATION_WEIGHT,
        value,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobmatch_core::models::WorkExperience;
    use serde_json::json;

    fn job(value: serde_json::Value) -> Job {
        let mut base = json!({
            "id": "job-1",
            "title": "Senior Backend Engineer",
            "company": "Acme",
            "location": "Bratislava, Slovakia",
            "description": "We build payment systems in Rust and PostgreSQL.",
            "type": "Backend",
            "experienceLevel": "Senior"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), value.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            country: Some("Slovakia".to_string()),
            current_location: Some("Bratislava".to_string()),
            desired_position: Some("Backend Engineer".to_string()),
            experience_level: Some(ExperienceLevel::Senior),
            primary_skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            secondary_skills: vec!["Docker".to_string()],
            remote_preference: Some(RemotePreference::Hybrid),
            ..Default::default()
        }
    }

    #[test]
    fn test_mentions_term_respects_word_boundaries() {
        assert!(mentions_term("we use go and rust", "go"));
        assert!(!mentions_term("good google gopher", "go"));
        assert!(mentions_term("modern c++ codebase", "c++"));
        assert!(mentions_term("node.js, react", "node.js"));
        assert!(!mentions_term("anything", ""));
    }

    #[test]
    fn test_strong_profile_scores_high() {
        let m = score_job(
            &profile(),
            &job(json!({ "skills": ["Rust", "PostgreSQL"] })),
        );
        assert_eq!(m.score, 100, "reasons: {:?}", m.reasons);
        assert!(m.suitable());
        assert_eq!(m.matched_skills, vec!["Rust", "PostgreSQL"]);
        assert!(m.missing_skills.is_empty());
        assert!(m.reasons[0].starts_with("Matches 2 of 2 required skills"));
    }

    #[test]
    fn test_secondary_and_history_strengths() {
        let mut p = profile();
        p.work_experience = vec![WorkExperience {
            position: "Engineer".to_string(),
            description: "Ran Kubernetes clusters".to_string(),
            ..Default::default()
        }];
        // Docker (secondary 0.7) + Kubernetes (history 0.6) + Java (0) → 1.3 / 3
        let fit = score_skills(&p, &job(json!({ "skills": ["Docker", "Kubernetes", "Java"] })));
        assert!((fit.value - 1.3 / 3.0).abs() < 1e-9, "value was {}", fit.value);
        assert_eq!(fit.missing, vec!["Java"]);
    }

    #[test]
    fn test_text_skills_when_job_has_no_skill_list() {
        let fit = score_skills(&profile(), &job(json!({})));
        assert_eq!(fit.value, 1.0);
        assert_eq!(fit.matched, vec!["Rust", "PostgreSQL"]);
    }

    #[test]
    fn test_empty_profile_stays_in_bounds() {
        let m = score_job(&UserProfile::default(), &job(json!({ "skills": ["Rust"] })));
        // Only the neutral role/level halves and the 0.2 location floor contribute.
        assert!(m.score > 15 && m.score < 30, "score was {}", m.score);
        assert!(!m.suitable());
        assert!(m.matched_skills.is_empty());
        assert_eq!(m.missing_skills, vec!["Rust"]);
        assert!(m.reasons.is_empty());
    }

    #[test]
    fn test_level_distance() {
        let mut p = profile();
        let senior_job = job(json!({}));
        assert_eq!(score_level(&p, &senior_job).value, 1.0);

        p.experience_level = Some(ExperienceLevel::Mid);
        assert_eq!(score_level(&p, &senior_job).value, 0.5);

        p.experience_level = Some(ExperienceLevel::Junior);
        assert_eq!(score_level(&p, &senior_job).value, 0.0);

        p.experience_level = None;
        p.years_of_experience = Some(6.0);
        assert_eq!(score_level(&p, &senior_job).value, 1.0);
    }

    #[test]
    fn test_location_rules() {
        let mut p = profile();
        let remote = job(json!({ "location": "Remote" }));
        assert_eq!(score_location(&p, &remote).value, 1.0);

        p.remote_preference = Some(RemotePreference::Onsite);
        assert_eq!(score_location(&p, &remote).value, 0.4);

        let abroad = job(json!({ "location": "Munich, Germany" }));
        assert_eq!(score_location(&p, &abroad).value, 0.2);
        p.willing_to_relocate = true;
        assert_eq!(score_location(&p, &abroad).value, 0.6);

        p.preferred_locations = vec!["Munich".to_string()];
        assert_eq!(score_location(&p, &abroad).value, 1.0);
    }

    #[test]
    fn test_preferred_job_type_wins_role() {
        let mut p = profile();
        p.desired_position = Some("Data Scientist".to_string());
        assert!(score_role(&p, &job(json!({}))).value < 0.5);

        p.job_types = vec!["Backend".to_string()];
        let role = score_role(&p, &job(json!({})));
        assert_eq!(role.value, 1.0);
        assert_eq!(role.reason.as_deref(), Some("Fits your preferred job type: Backend"));
    }

    #[test]
    fn test_reasons_ordered_by_contribution() {
        let m = score_job(&profile(), &job(json!({ "skills": ["Rust"] })));
        // skills contribute 0.45, location/role 0.20, level 0.15
        assert!(m.reasons.first().unwrap().contains("required skills"));
        assert!(m.reasons.last().unwrap().contains("Experience level"));
    }
}

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use jobmatch_core::models::api::{MatchOptions, MatchStats, SortBy};
use jobmatch_core::models::{Job, UserProfile};
use tracing::info;

use crate::errors::AppError;
use crate::matching::{JobMatch, JobMatcher};

pub const DEFAULT_MAX_RESULTS: usize = 50;
pub const MAX_RESULTS_CAP: usize = 200;
const TOP_SKILLS: usize = 5;

const HIGH_MATCH: u32 = 80;
const MEDIUM_MATCH: u32 = 60;

#[derive(Debug, Clone)]
pub struct Ranking {
    pub jobs: Vec<Job>,
    /// Computed over every job that passed `minScore`, before truncation.
    pub stats: MatchStats,
}

/// Scores every job, drops those under `minScore`, sorts and truncates.
/// Duplicate ids in the catalog are scored once (first occurrence wins).
pub async fn rank_jobs(
    matcher: &dyn JobMatcher,
    profile: &UserProfile,
    jobs: &[Job],
    options: &MatchOptions,
) -> Result<Ranking, AppError> {
    let min_score = options.min_score.unwrap_or(0);
    let max_results = options
        .max_results
        .unwrap_or(DEFAULT_MAX_RESULTS)
        .min(MAX_RESULTS_CAP);
    let sort_by = options.sort_by.unwrap_or_default();

    let mut seen = HashSet::new();
    let mut scored: Vec<(Job, JobMatch)> = Vec::new();
    for job in jobs {
        if !seen.insert(job.id.as_str()) {
            continue;
        }
        let result = matcher.score(profile, job).await?;
        if result.score < min_score {
            continue;
        }
        let mut ranked = job.clone();
        ranked.match_score = Some(result.score);
        ranked.match_reasons = Some(result.reasons.clone());
        ranked.suitable = Some(result.suitable());
        scored.push((ranked, result));
    }

    scored.sort_by(|(a, _), (b, _)| compare(a, b, sort_by));
    let stats = compute_stats(&scored);

    info!(
        "Ranked {} jobs with '{}' backend: {} passed minScore {}, returning at most {}",
        jobs.len(),
        matcher.backend(),
        scored.len(),
        min_score,
        max_results
    );

    let jobs = scored
        .into_iter()
        .take(max_results)
        .map(|(job, _)| job)
        .collect();

    Ok(Ranking { jobs, stats })
}

/// Newer postings first; undated jobs sort last.
fn newer_first(a: &Job, b: &Job) -> Ordering {
    match (a.posted_date, b.posted_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &Job, b: &Job, sort_by: SortBy) -> Ordering {
    let by_score = || b.match_score.cmp(&a.match_score);
    match sort_by {
        SortBy::Score => by_score().then_with(|| newer_first(a, b)),
        SortBy::Date => newer_first(a, b).then_with(by_score),
    }
    .then_with(|| a.id.cmp(&b.id))
}

fn compute_stats(scored: &[(Job, JobMatch)]) -> MatchStats {
    if scored.is_empty() {
        return MatchStats::default();
    }

    let scores: Vec<u32> = scored.iter().map(|(_, m)| m.score).collect();
    let total: u32 = scores.iter().sum();
    let average = f64::from(total) / scores.len() as f64;

    let mut skill_counts: HashMap<&str, usize> = HashMap::new();
    for (_, m) in scored {
        for skill in &m.matched_skills {
            *skill_counts.entry(skill.as_str()).or_default() += 1;
        }
    }
    let mut top: Vec<(&str, usize)> = skill_counts.into_iter().collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    MatchStats {
        total_matched: scored.len(),
        average_score: (average * 10.0).round() / 10.0,
        high_matches: scores.iter().filter(|s| **s >= HIGH_MATCH).count(),
        medium_matches: scores
            .iter()
            .filter(|s| (MEDIUM_MATCH..HIGH_MATCH).contains(*s))
            .count(),
        low_matches: scores.iter().filter(|s| **s < MEDIUM_MATCH).count(),
        top_matched_skills: top
            .into_iter()
            .take(TOP_SKILLS)
            .map(|(skill, _)| skill.to_string())
            .collect(),
    }
}

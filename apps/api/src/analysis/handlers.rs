use axum::{extract::State, Json};
use chrono::Utc;
use jobmatch_core::models::api::{AnalyzeFitRequest, ApiResponse};
use jobmatch_core::models::{JobFitAnalysis, StudyProgram};
use tracing::info;

use crate::analysis::fit::analyze_fit;
use crate::analysis::jd_parser::{parse_job_description, KeywordEntry};
use crate::analysis::programs::{find_program, study_programs};
use crate::errors::AppError;
use crate::state::AppState;

/// What the resume is measured against.
#[derive(Debug)]
pub enum FitTarget {
    JobDescription(String),
    Program {
        program: StudyProgram,
        school: Option<String>,
    },
}

impl FitTarget {
    /// A non-blank job description wins over a study program.
    pub fn from_request(req: &AnalyzeFitRequest) -> Result<Self, AppError> {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        if let Some(jd) = non_blank(&req.job_description) {
            return Ok(FitTarget::JobDescription(jd));
        }
        if let Some(key) = non_blank(&req.study_program) {
            let program = find_program(&key)
                .ok_or_else(|| AppError::NotFound(format!("Study program '{key}' not found")))?;
            return Ok(FitTarget::Program {
                program,
                school: non_blank(&req.selected_school),
            });
        }
        Err(AppError::Validation(
            "Either jobDescription or studyProgram must be provided".to_string(),
        ))
    }
}

/// Catalog skills weigh the same as a single requirement-section mention.
fn program_keywords(program: &StudyProgram) -> Vec<KeywordEntry> {
    program
        .skills
        .iter()
        .map(|s| KeywordEntry::new(s.as_str(), 1, 0.8))
        .collect()
}

/// POST /api/analyze-job-fit
pub async fn handle_analyze_fit(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeFitRequest>,
) -> Result<Json<ApiResponse<JobFitAnalysis>>, AppError> {
    let target = FitTarget::from_request(&req)?;

    let (label, keywords) = match &target {
        FitTarget::JobDescription(jd) => {
            let parsed = parse_job_description(jd, &state.llm).await;
            ("the target job".to_string(), parsed.keyword_inventory)
        }
        FitTarget::Program { program, school } => {
            let label = match school {
                Some(school) => format!("the {} program at {}", program.name, school),
                None => format!("the {} program", program.name),
            };
            (label, program_keywords(program))
        }
    };

    let analysis = analyze_fit(&state.llm, &req.resume_data, &label, &keywords, Utc::now()).await;
    info!(
        "Analyzed resume {} against {}: {}/100",
        req.resume_data.id, label, analysis.fit_score
    );

    Ok(Json(ApiResponse::ok(analysis)))
}

/// GET /api/study-programs
pub async fn handle_study_programs() -> Json<ApiResponse<Vec<StudyProgram>>> {
    Json(ApiResponse::ok(study_programs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(extra: serde_json::Value) -> AnalyzeFitRequest {
        let mut body = json!({
            "resumeData": {
                "id": "00000000-0000-0000-0000-000000000000",
                "createdAt": "2026-09-01T00:00:00Z"
            }
        });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                body.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_job_description_wins() {
        let req = request(json!({ "jobDescription": "Rust dev", "studyProgram": "data-science" }));
        assert!(matches!(
            FitTarget::from_request(&req).unwrap(),
            FitTarget::JobDescription(ref jd) if jd == "Rust dev"
        ));
    }

    #[test]
    fn test_program_with_school() {
        let req = request(json!({ "studyProgram": "data-science", "selectedSchool": "STU" }));
        match FitTarget::from_request(&req).unwrap() {
            FitTarget::Program { program, school } => {
                assert_eq!(program.id, "data-science");
                assert_eq!(school.as_deref(), Some("STU"));
            }
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn test_missing_target_is_validation_error() {
        let req = request(json!({ "jobDescription": "   " }));
        assert!(matches!(
            FitTarget::from_request(&req),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_program_is_not_found() {
        let req = request(json!({ "studyProgram": "astrology" }));
        assert!(matches!(
            FitTarget::from_request(&req),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_program_keywords_weighted_equally() {
        let program = find_program("cloud-devops").unwrap();
        let keywords = program_keywords(&program);
        assert_eq!(keywords.len(), program.skills.len());
        assert!(keywords.iter().all(|k| (k.weighted_score - 0.8).abs() < f32::EPSILON));
    }
}

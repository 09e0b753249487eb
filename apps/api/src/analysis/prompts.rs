// LLM prompt constants for fit analysis.

/// Role for job description parsing; combined with the JSON-only rule via `json_system`.
pub const JD_PARSE_ROLE: &str = "You are an expert job description analyst. \
    Parse a job description and extract the skills and keywords it asks for.";

/// Job description parsing prompt. Replace `{jd_text}` before sending.
pub const JD_PARSE_PROMPT_TEMPLATE: &str = r#"Parse the following job description.

Return a JSON object with this EXACT schema (no extra fields):
{
  "hard_requirements": ["5+ years Rust programming"],
  "seniority": "senior",
  "keyword_inventory": [
    {"keyword": "Rust", "frequency": 5, "position_weight": 0.8, "weighted_score": 4.0}
  ]
}

POSITION WEIGHTS for keyword scoring:
- Title / header: 1.0
- Requirements section ("Required:", "Must have:"): 0.8
- Responsibilities section ("You will:", "Responsibilities:"): 0.6
- About Us / company section: 0.3
weighted_score = frequency * position_weight

SENIORITY: "junior", "mid", "senior", "lead" or "unknown".

Extract ALL meaningful skills (languages, frameworks, tools, methods, domain knowledge).
Use the common short name of each skill ("Kubernetes", not "experience with Kubernetes").

JOB DESCRIPTION:
{jd_text}"#;

/// Role for the fit explanation.
pub const FIT_EXPLAIN_ROLE: &str = "You are a career advisor. \
    You explain how well a candidate fits a target and how to close the gaps.";

/// Fit explanation prompt. Replace: {grounding_instruction}, {target},
/// {fit_score}, {matched}, {missing}, {resume_summary}
pub const FIT_EXPLAIN_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

TARGET: {target}
KEYWORD FIT SCORE: {fit_score}/100
MATCHED SKILLS: {matched}
MISSING SKILLS: {missing}

CANDIDATE:
{resume_summary}

Return a JSON object with this EXACT schema:
{
  "explanation": "Two or three sentences on the overall fit.",
  "suggestionsToImprove": ["Concrete, actionable step"],
  "recommendedResources": [
    {
      "type": "course",
      "title": "...",
      "provider": "...",
      "url": "https://...",
      "relevance": "Which missing skill this covers",
      "difficulty": "beginner"
    }
  ]
}

"type" is one of "course", "project", "book", "certification".
"difficulty" is one of "beginner", "intermediate", "advanced".
Give at most 5 suggestions and at most 5 resources, focused on the missing skills."#;

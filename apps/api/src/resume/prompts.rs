// LLM prompt constants for resume parsing and tailoring.
// Cross-cutting fragments live in llm_client::prompts.

/// Role for resume parsing; combined with the JSON-only rule via `json_system`.
pub const RESUME_PARSE_ROLE: &str =
    "You are an expert resume parser. Extract structured data from resume text.";

/// Resume parsing prompt. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Extract structured information from the resume below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "skills": ["Rust", "PostgreSQL"],
  "education": [
    {"institution": "...", "degree": "...", "field": "...", "startDate": "2015", "endDate": "2019", "gpa": null}
  ],
  "experience": [
    {"company": "...", "position": "...", "description": "...", "startDate": "2019-06", "endDate": null, "technologies": ["Rust"]}
  ],
  "certifications": [
    {"name": "...", "issuer": "...", "date": "2021", "expiryDate": null}
  ],
  "keywords": ["backend", "payments"],
  "contactInfo": {"email": "...", "phone": "...", "linkedin": "...", "github": "..."}
}

Rules:
- "skills": concrete technical and professional skills, each listed once.
- "keywords": domain terms and themes that are not already skills.
- Use null for unknown dates and omit unknown contact fields.
- Leave arrays empty when the resume has no such section.

RESUME:
{resume_text}"#;

/// System prompt for tailoring. Output is plain text, not JSON.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer. \
    You rewrite a candidate's resume so it targets one specific job. \
    Respond with the resume text only, no preamble and no markdown code fences.";

/// Tailoring prompt. Replace: {grounding_instruction}, {language}, {job_title},
/// {company}, {job_skills}, {job_description}, {resume}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Rewrite the resume below for the job "{job_title}" at {company}.
Write it in {language}.
Lead with the experience and skills most relevant to the job. Keep section headings.

JOB SKILLS: {job_skills}

JOB DESCRIPTION:
{job_description}

CURRENT RESUME:
{resume}"#;

// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that writes about the candidate.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only state facts present in the candidate data provided. \
    Do NOT invent employers, dates, degrees, certifications or metrics. \
    If the data does not support a claim, omit it.";

/// Builds a system prompt from a role description plus the JSON-only rule.
pub fn json_system(role: &str) -> String {
    format!("{role} {JSON_ONLY_SYSTEM}")
}

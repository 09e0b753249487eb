//! Resumes: upload and parsing, deterministic rendering from a profile,
//! and job-specific tailoring.

pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod render;
pub mod tailor;

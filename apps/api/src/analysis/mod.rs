//! Resume fit analysis against a job description or a study program.

pub mod fit;
pub mod handlers;
pub mod jd_parser;
pub mod programs;
pub mod prompts;

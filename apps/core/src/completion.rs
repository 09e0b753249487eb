use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::profile::UserProfile;

/// Number of wizard steps. Steps 5 and 6 (education, preferences) have no required fields.
pub const WIZARD_STEPS: u8 = 6;

/// Field name → human-readable error, ordered for stable output.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub completion_percent: u32,
    pub skills_count: usize,
    pub experience_years: f64,
    pub saved_jobs_count: usize,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// The ten fields counted by the completion meter.
fn completion_checks(profile: &UserProfile) -> [bool; 10] {
    [
        filled(&profile.first_name),
        filled(&profile.last_name),
        filled(&profile.email),
        filled(&profile.phone),
        filled(&profile.country),
        filled(&profile.current_location),
        !profile.primary_skills.is_empty(),
        profile.years_of_experience.is_some_and(|y| y > 0.0),
        filled(&profile.desired_position),
        !profile.work_experience.is_empty(),
    ]
}

/// Completed fields / total fields × 100, rounded to the nearest integer.
pub fn completion_percent(profile: &UserProfile) -> u32 {
    let checks = completion_checks(profile);
    let completed = checks.iter().filter(|done| **done).count();
    ((completed as f64 / checks.len() as f64) * 100.0).round() as u32
}

/// Minimum data for a profile to count as existing: name, location and one primary skill.
pub fn is_profile_complete(profile: &UserProfile) -> bool {
    filled(&profile.first_name)
        && filled(&profile.last_name)
        && filled(&profile.country)
        && filled(&profile.current_location)
        && !profile.primary_skills.is_empty()
}

/// Required-field errors for one wizard step. An empty map means the step is valid.
pub fn validate_step(profile: &UserProfile, step: u8) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match step {
        1 => {
            if !filled(&profile.first_name) {
                errors.insert("firstName", "First name is required");
            }
            if !filled(&profile.last_name) {
                errors.insert("lastName", "Last name is required");
            }
            if !filled(&profile.email) {
                errors.insert("email", "Email is required");
            }
            if !filled(&profile.phone) {
                errors.insert("phone", "Phone is required");
            }
        }
        2 => {
            if !filled(&profile.country) {
                errors.insert("country", "Country is required");
            }
            if !filled(&profile.current_location) {
                errors.insert("currentLocation", "Current city is required");
            }
        }
        3 => {
            if !profile.years_of_experience.is_some_and(|y| y > 0.0) {
                errors.insert("yearsOfExperience", "Years of experience is required");
            }
            if profile.experience_level.is_none() {
                errors.insert("experienceLevel", "Experience level is required");
            }
            if !filled(&profile.desired_position) {
                errors.insert("desiredPosition", "Desired position is required");
            }
        }
        4 => {
            if profile.primary_skills.is_empty() {
                errors.insert("primarySkills", "Select at least one primary skill");
            }
            if profile.job_types.is_empty() {
                errors.insert("jobTypes", "Select at least one job type");
            }
        }
        _ => {}
    }
    errors
}

/// Errors of every wizard step, merged. Used before accepting a full submit.
pub fn validate_all_steps(profile: &UserProfile) -> FieldErrors {
    (1..=WIZARD_STEPS)
        .flat_map(|step| validate_step(profile, step))
        .collect()
}

impl DashboardStats {
    pub fn compute(profile: &UserProfile, saved_jobs_count: usize) -> Self {
        Self {
            completion_percent: completion_percent(profile),
            skills_count: profile.primary_skills.len() + profile.secondary_skills.len(),
            experience_years: profile.years_of_experience.unwrap_or(0.0),
            saved_jobs_count,
        }
    }
}

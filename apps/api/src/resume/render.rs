//! Deterministic plain-text resume rendering from a `UserProfile`.
//!
//! When a job is given, the rendering is tailored: skills the job asks for
//! come first and work history is ordered by how many job terms it mentions.
//! Ordering is otherwise preserved, so the same inputs always render the same text.

use std::fmt::Write;

use jobmatch_core::models::{Job, UserProfile, WorkExperience};

use crate::matching::scorer::mentions_term;

/// Renders the profile. Sections with no data are omitted.
pub fn render_resume(profile: &UserProfile, job: Option<&Job>) -> String {
    let mut out = String::new();

    let name = profile
        .full_name()
        .unwrap_or_else(|| "Candidate".to_string());
    let _ = writeln!(out, "{}", name.to_uppercase());

    let headline = profile
        .desired_position
        .as_deref()
        .or(profile.current_position.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(headline) = headline {
        let _ = writeln!(out, "{headline}");
    }

    let contact = contact_line(profile);
    if !contact.is_empty() {
        let _ = writeln!(out, "{contact}");
    }

    if let Some(summary) = summary(profile, job) {
        section(&mut out, "PROFESSIONAL SUMMARY");
        let _ = writeln!(out, "{summary}");
    }

    let skills = ordered_skills(profile, job);
    if !skills.is_empty() {
        section(&mut out, "SKILLS");
        let _ = writeln!(out, "{}", skills.join(", "));
    }

    let experience = ordered_experience(profile, job);
    if !experience.is_empty() {
        section(&mut out, "EXPERIENCE");
        for entry in experience {
            write_experience(&mut out, entry);
        }
    }

    write_education(&mut out, profile);

    if !profile.projects.is_empty() {
        section(&mut out, "PROJECTS");
        for project in &profile.projects {
            let _ = write!(out, "- {}", project.name);
            if !project.technologies.is_empty() {
                let _ = write!(out, " ({})", project.technologies.join(", "));
            }
            out.push('\n');
            if !project.description.trim().is_empty() {
                let _ = writeln!(out, "  {}", project.description.trim());
            }
        }
    }

    let certifications: Vec<&str> = profile
        .certifications
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if !certifications.is_empty() {
        section(&mut out, "CERTIFICATIONS");
        for cert in certifications {
            let _ = writeln!(out, "- {cert}");
        }
    }

    let languages: Vec<String> = profile
        .languages
        .iter()
        .filter(|l| !l.language.trim().is_empty())
        .map(|l| {
            if l.level.trim().is_empty() {
                l.language.clone()
            } else {
                format!("{} ({})", l.language, l.level)
            }
        })
        .collect();
    if !languages.is_empty() {
        section(&mut out, "LANGUAGES");
        let _ = writeln!(out, "{}", languages.join(", "));
    }

    out.trim_end().to_string()
}

fn section(out: &mut String, title: &str) {
    let _ = write!(out, "\n{title}\n");
}

fn contact_line(profile: &UserProfile) -> String {
    fn present(field: &Option<String>) -> Option<&str> {
        field.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
    let location = match (present(&profile.current_location), present(&profile.country)) {
        (Some(city), Some(country)) => Some(format!("{city}, {country}")),
        (Some(place), None) | (None, Some(place)) => Some(place.to_string()),
        (None, None) => None,
    };

    [
        profile.email.clone(),
        profile.phone.clone(),
        location,
        profile.linkedin.clone(),
        profile.github.clone(),
        profile.portfolio.clone(),
    ]
    .into_iter()
    .flatten()
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" | ")
}

fn summary(profile: &UserProfile, job: Option<&Job>) -> Option<String> {
    let role = profile
        .current_position
        .as_deref()
        .or(profile.desired_position.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())?;

    let mut text = match profile.years_of_experience.filter(|y| *y > 0.0) {
        Some(years) => format!("{role} with {} years of experience", format_years(years)),
        None => role.to_string(),
    };

    let top: Vec<String> = ordered_skills(profile, job).into_iter().take(3).collect();
    if !top.is_empty() {
        let _ = write!(text, ", skilled in {}", top.join(", "));
    }
    text.push('.');

    if let Some(job) = job {
        let _ = write!(
            text,
            " Seeking the {} role at {}.",
            job.title.trim(),
            job.company.trim()
        );
    }
    Some(text)
}

fn format_years(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("{}", years as u32)
    } else {
        format!("{years:.1}")
    }
}

/// Lowercased terms the job asks for: its skill list plus title words.
fn job_terms(job: &Job) -> Vec<String> {
    job.skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .chain(
            job.title
                .to_lowercase()
                .split_whitespace()
                .filter(|w| w.len() > 2)
                .map(String::from),
        )
        .filter(|t| !t.is_empty())
        .collect()
}

/// Primary then secondary skills, deduplicated case-insensitively. With a
/// job, skills the job mentions move to the front.
pub fn ordered_skills(profile: &UserProfile, job: Option<&Job>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let skills: Vec<String> = profile
        .all_skills()
        .map(str::trim)
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .map(String::from)
        .collect();

    let Some(job) = job else {
        return skills;
    };

    let wanted: Vec<String> = job.skills.iter().map(|s| s.trim().to_lowercase()).collect();
    let text = format!("{} {}", job.title, job.body_text()).to_lowercase();
    let (mut relevant, rest): (Vec<String>, Vec<String>) = skills.into_iter().partition(|s| {
        let key = s.to_lowercase();
        wanted.contains(&key) || mentions_term(&text, &key)
    });
    relevant.extend(rest);
    relevant
}

fn ordered_experience<'a>(profile: &'a UserProfile, job: Option<&Job>) -> Vec<&'a WorkExperience> {
    let mut entries: Vec<&WorkExperience> = profile
        .work_experience
        .iter()
        .filter(|w| !w.position.trim().is_empty() || !w.company.trim().is_empty())
        .collect();

    if let Some(job) = job {
        let terms = job_terms(job);
        let relevance = |w: &WorkExperience| {
            let text = format!("{} {}", w.position, w.description).to_lowercase();
            terms.iter().filter(|t| mentions_term(&text, t)).count()
        };
        // Stable sort keeps the original order among equally relevant entries.
        entries.sort_by_key(|w| std::cmp::Reverse(relevance(*w)));
    }
    entries
}

fn write_experience(out: &mut String, entry: &WorkExperience) {
    let mut heading = entry.position.trim().to_string();
    if !entry.company.trim().is_empty() {
        if heading.is_empty() {
            heading = entry.company.trim().to_string();
        } else {
            let _ = write!(heading, " at {}", entry.company.trim());
        }
    }

    let start = entry.start_date.trim();
    let end = if entry.end_date.trim().is_empty() {
        "Present"
    } else {
        entry.end_date.trim()
    };
    let mut details = Vec::new();
    if !start.is_empty() {
        details.push(format!("{start} - {end}"));
    }
    if !entry.location.trim().is_empty() {
        details.push(entry.location.trim().to_string());
    }
    if entry.is_remote {
        details.push("Remote".to_string());
    }

    let _ = write!(out, "- {heading}");
    if !details.is_empty() {
        let _ = write!(out, " ({})", details.join(", "));
    }
    out.push('\n');
    if !entry.description.trim().is_empty() {
        let _ = writeln!(out, "  {}", entry.description.trim());
    }
}

fn write_education(out: &mut String, profile: &UserProfile) {
    let mut lines = Vec::new();

    for edu in profile.university.iter().chain(profile.education.iter()) {
        if edu.institution.trim().is_empty() {
            continue;
        }
        let mut line = edu.institution.trim().to_string();
        let degree = [edu.degree.trim(), edu.field.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        if !degree.is_empty() {
            let _ = write!(line, ": {degree}");
        }
        if !edu.graduation_year.trim().is_empty() {
            let _ = write!(line, " ({})", edu.graduation_year.trim());
        }
        if !lines.contains(&line) {
            lines.push(line);
        }
    }

    if let Some(school) = profile
        .high_school
        .as_ref()
        .filter(|s| !s.name.trim().is_empty())
    {
        let mut line = school.name.trim().to_string();
        if let Some(field) = school.field_of_study.as_deref().filter(|f| !f.trim().is_empty()) {
            let _ = write!(line, ": {}", field.trim());
        }
        if !school.graduation_year.trim().is_empty() {
            let _ = write!(line, " ({})", school.graduation_year.trim());
        }
        lines.push(line);
    }

    if lines.is_empty() {
        return;
    }
    section(out, "EDUCATION");
    for line in lines {
        let _ = writeln!(out, "- {line}");
    }
}

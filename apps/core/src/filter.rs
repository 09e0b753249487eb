//! Job list filtering.
//!
//! A single in-memory pass over an already fetched list: free-text fields are
//! matched by case-insensitive substring, categorical fields by equality.
//! Filtering never reorders or duplicates jobs.

use serde::{Deserialize, Serialize};

use crate::models::job::Job;

/// Country assumed for the "my country" preset when the profile has none.
pub const DEFAULT_HOME_COUNTRY: &str = "Slovakia";

const REMOTE_LOCATION_MARKERS: &[&str] = &[
    "remote",
    "worldwide",
    "global",
    "work from anywhere",
    "any location",
];

const EU_LOCATION_MARKERS: &[&str] = &[
    "europe", "eu", "germany", "france", "netherlands", "spain", "italy", "poland", "austria",
    "belgium", "sweden", "denmark", "finland", "norway", "portugal", "ireland", "czech",
    "hungary", "slovakia", "greece", "luxembourg", "berlin", "munich", "amsterdam", "paris",
    "barcelona", "milan", "vienna", "warsaw", "prague", "budapest", "brussels", "dublin",
    "lisbon", "stockholm", "copenhagen", "helsinki", "oslo", "athens",
];

const FREELANCE_COMPANY_MARKERS: &[&str] = &["upwork", "fiverr", "toptal"];

const USA_LOCATION_MARKERS: &[&str] = &["usa", "united states", "u.s.", "us only", "americas"];

const UK_LOCATION_MARKERS: &[&str] = &[
    "uk",
    "united kingdom",
    "england",
    "scotland",
    "london",
    "manchester",
];

/// Location presets offered by the job board, plus free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationFilter {
    MyCountry,
    Remote,
    Eu,
    Freelance,
    Usa,
    Uk,
    Text(String),
}

impl LocationFilter {
    /// Maps the wire value (`myCountry`, `remote`, `eu`, ...) to a preset;
    /// anything else is a plain substring test on the location.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "mycountry" => Self::MyCountry,
            "remote" => Self::Remote,
            "eu" => Self::Eu,
            "freelance" => Self::Freelance,
            "usa" => Self::Usa,
            "uk" => Self::Uk,
            _ => Self::Text(raw.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    pub search: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub company: Option<String>,
    pub category: Option<String>,
    pub location: Option<LocationFilter>,
    /// Profile country used by [`LocationFilter::MyCountry`].
    pub home_country: Option<String>,
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.job_type.is_none()
            && self.experience_level.is_none()
            && self.company.is_none()
            && self.category.is_none()
            && self.location.is_none()
    }

    pub fn matches(&self, job: &Job) -> bool {
        if let Some(query) = self.search.as_deref().filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let hit = contains(&job.title, &query)
                || contains(&job.company, &query)
                || contains(&job.description, &query);
            if !hit {
                return false;
            }
        }

        if let Some(job_type) = &self.job_type {
            if job.job_type != *job_type {
                return false;
            }
        }

        if let Some(level) = &self.experience_level {
            if job.experience_level != *level {
                return false;
            }
        }

        if let Some(company) = &self.company {
            if !contains(&job.company, &company.to_lowercase()) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !job.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        match &self.location {
            Some(location) => self.location_matches(location, job),
            None => true,
        }
    }

    /// Keeps matching jobs in their original order.
    pub fn apply<'a>(&self, jobs: &'a [Job]) -> Vec<&'a Job> {
        jobs.iter().filter(|job| self.matches(job)).collect()
    }

    fn location_matches(&self, filter: &LocationFilter, job: &Job) -> bool {
        let location = job.location.to_lowercase();
        let company = job.company.to_lowercase();
        let title = job.title.to_lowercase();

        match filter {
            LocationFilter::MyCountry => {
                let country = self
                    .home_country
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .unwrap_or(DEFAULT_HOME_COUNTRY)
                    .to_lowercase();
                let first_word = country.split(' ').next().unwrap_or(&country);
                location.contains(&country) || location.contains(first_word)
            }
            LocationFilter::Remote => is_remote_job(job),
            LocationFilter::Eu => any_of(&location, EU_LOCATION_MARKERS),
            LocationFilter::Freelance => {
                title.contains("freelance")
                    || title.contains("contract")
                    || location.contains("freelance")
                    || any_of(&company, FREELANCE_COMPANY_MARKERS)
            }
            LocationFilter::Usa => any_of(&location, USA_LOCATION_MARKERS),
            LocationFilter::Uk => any_of(&location, UK_LOCATION_MARKERS),
            LocationFilter::Text(text) => location.contains(&text.to_lowercase()),
        }
    }
}

/// Remote-indicating substrings in location, company or title.
pub fn is_remote_job(job: &Job) -> bool {
    let location = job.location.to_lowercase();
    let title = job.title.to_lowercase();
    any_of(&location, REMOTE_LOCATION_MARKERS)
        || job.company.to_lowercase().contains("(remote)")
        || title.contains("remote")
        || title.contains("freelance")
}

fn contains(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

fn any_of(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| haystack.contains(m))
}

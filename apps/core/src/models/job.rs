use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    pub size: String,
    pub industry: String,
    pub founded: Option<i32>,
    pub website: String,
    pub description: String,
}

/// A job offer from the catalog. Read-only for clients; the match fields are
/// filled in by the server when the job is ranked against a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    #[serde(rename = "type", default)]
    pub job_type: String,
    #[serde(default)]
    pub experience_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responsibilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_info: Option<CompanyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_applicants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_reasons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suitable: Option<bool>,
}

impl Job {
    /// Description text used for matching: the full description when present.
    pub fn body_text(&self) -> &str {
        self.full_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.description)
    }
}

/// Denormalized snapshot of a job the user bookmarked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u32>,
    pub saved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_reasons: Option<Vec<String>>,
}

impl SavedJob {
    pub fn snapshot(job: &Job, saved_at: DateTime<Utc>) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            salary: job.salary.clone(),
            match_score: job.match_score,
            saved_at,
            employment_type: job.employment_type.clone(),
            url: non_empty(&job.url),
            description: non_empty(&job.description),
            job_type: non_empty(&job.job_type),
            experience_level: non_empty(&job.experience_level),
            source: non_empty(&job.source),
            posted_date: job.posted_date,
            match_reasons: job.match_reasons.clone(),
        }
    }
}

/// Feeds send RFC 3339 timestamps or bare `YYYY-MM-DD` dates. A bare date
/// is midnight UTC; an empty string is no date.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_uses_type_on_the_wire() {
        let job: Job = serde_json::from_value(json!({
            "id": "j1",
            "title": "Backend Engineer",
            "company": "Acme",
            "location": "Remote",
            "type": "Backend",
            "experienceLevel": "Senior",
            "postedDate": "2026-09-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(job.job_type, "Backend");
        assert_eq!(job.experience_level, "Senior");
        assert!(job.posted_date.is_some());

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["type"], "Backend");
        assert!(value.get("matchScore").is_none());
    }

    #[test]
    fn test_body_text_prefers_full_description() {
        let mut job: Job = serde_json::from_value(json!({
            "id": "j1", "title": "t", "company": "c", "location": "l",
            "description": "short"
        }))
        .unwrap();
        assert_eq!(job.body_text(), "short");

        job.full_description = Some("long form".to_string());
        assert_eq!(job.body_text(), "long form");

        job.full_description = Some("   ".to_string());
        assert_eq!(job.body_text(), "short");
    }

    #[test]
    fn test_snapshot_drops_empty_strings() {
        let job: Job = serde_json::from_value(json!({
            "id": "j1", "title": "t", "company": "c", "location": "l",
            "matchScore": 72
        }))
        .unwrap();
        let saved = SavedJob::snapshot(&job, Utc::now());
        assert_eq!(saved.id, "j1");
        assert_eq!(saved.match_score, Some(72));
        assert!(saved.url.is_none());
        assert!(saved.job_type.is_none());
    }

    #[test]
    fn test_posted_date_accepts_bare_dates() {
        let job: Job = serde_json::from_value(json!({
            "id": "j1", "title": "t", "company": "c", "location": "l",
            "postedDate": "2024-01-15",
            "scrapedAt": ""
        }))
        .unwrap();
        assert_eq!(
            job.posted_date.map(|d| d.to_rfc3339()).as_deref(),
            Some("2024-01-15T00:00:00+00:00")
        );
        assert_eq!(job.scraped_at, None);

        let saved: SavedJob = serde_json::from_value(json!({
            "id": "j1", "title": "t", "company": "c", "location": "l",
            "savedAt": "2026-10-01T08:00:00Z",
            "postedDate": "2024-01-15"
        }))
        .unwrap();
        assert_eq!(saved.posted_date, job.posted_date);
    }

    #[test]
    fn test_posted_date_converts_offsets_and_rejects_garbage() {
        let job: Job = serde_json::from_value(json!({
            "id": "j1", "title": "t", "company": "c", "location": "l",
            "postedDate": "2024-01-15T10:00:00+02:00"
        }))
        .unwrap();
        assert_eq!(
            job.posted_date.map(|d| d.to_rfc3339()).as_deref(),
            Some("2024-01-15T08:00:00+00:00")
        );

        let result: Result<Job, _> = serde_json::from_value(json!({
            "id": "j1", "title": "t", "company": "c", "location": "l",
            "postedDate": "last tuesday"
        }));
        assert!(result.is_err());
    }
}

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// How the candidate wants to work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemotePreference {
    Remote,
    Hybrid,
    Onsite,
    #[default]
    Flexible,
}

/// Seniority band, ordered from least to most senior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
    Lead,
}

impl ExperienceLevel {
    /// Parses the free-form level strings job sources use ("Entry", "Sr.", "Principal", ...).
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let value = raw.trim().to_lowercase();
        if value.is_empty() {
            return None;
        }
        let has = |needles: &[&str]| needles.iter().any(|n| value.contains(n));
        if has(&["lead", "principal", "staff", "head", "architect"]) {
            Some(Self::Lead)
        } else if has(&["senior", "sr"]) {
            Some(Self::Senior)
        } else if has(&["mid", "intermediate", "regular", "medior"]) {
            Some(Self::Mid)
        } else if has(&["junior", "jr", "entry", "intern", "graduate", "trainee"]) {
            Some(Self::Junior)
        } else {
            None
        }
    }

    pub fn rank(self) -> i32 {
        match self {
            Self::Junior => 0,
            Self::Mid => 1,
            Self::Senior => 2,
            Self::Lead => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Lead => "lead",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "2weeks")]
    TwoWeeks,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3months")]
    ThreeMonths,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpokenLanguage {
    pub language: String,
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
    pub is_remote: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighSchool {
    pub name: String,
    pub graduation_year: String,
    pub field_of_study: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileEducation {
    #[serde(alias = "name")]
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub graduation_year: String,
}

/// Monthly salary expectation. A cleared bound travels as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRange {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub min: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub max: Option<u32>,
    #[serde(default)]
    pub currency: String,
}

impl Default for SalaryRange {
    fn default() -> Self {
        Self {
            min: Some(2000),
            max: Some(5000),
            currency: "EUR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileProject {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: Option<String>,
}

/// The candidate's self-reported career data, used as matching input.
///
/// Every field is optional because the profile is edited piecemeal and
/// partially filled profiles travel between the client and the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    // Personal
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,

    // Location & work preferences
    pub country: Option<String>,
    pub current_location: Option<String>,
    pub preferred_locations: Vec<String>,
    #[serde(deserialize_with = "lenient_enum")]
    pub remote_preference: Option<RemotePreference>,
    pub willing_to_relocate: bool,
    #[serde(deserialize_with = "lenient_u32")]
    pub max_commute_distance: Option<u32>,

    // Experience
    #[serde(deserialize_with = "lenient_f64")]
    pub years_of_experience: Option<f64>,
    pub current_position: Option<String>,
    pub desired_position: Option<String>,
    #[serde(deserialize_with = "lenient_enum")]
    pub experience_level: Option<ExperienceLevel>,

    // Skills
    pub primary_skills: Vec<String>,
    pub secondary_skills: Vec<String>,
    pub languages: Vec<SpokenLanguage>,

    pub work_experience: Vec<WorkExperience>,

    // Education
    pub high_school: Option<HighSchool>,
    pub university: Option<ProfileEducation>,
    pub education: Vec<ProfileEducation>,

    // Job preferences
    pub expected_salary: Option<SalaryRange>,
    pub job_types: Vec<String>,
    #[serde(deserialize_with = "lenient_enum")]
    pub availability: Option<Availability>,
    pub employment_type: Vec<String>,

    pub certifications: Vec<String>,
    pub projects: Vec<ProfileProject>,
}

impl UserProfile {
    /// A fresh profile with the wizard's starting preferences.
    pub fn with_wizard_defaults() -> Self {
        Self {
            remote_preference: Some(RemotePreference::Flexible),
            employment_type: vec!["Full-time".to_string()],
            expected_salary: Some(SalaryRange::default()),
            availability: Some(Availability::Immediate),
            ..Self::default()
        }
    }

    /// True when no field carries user data (the shape of `{}` on the wire).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Primary skills followed by secondary skills.
    pub fn all_skills(&self) -> impl Iterator<Item = &str> {
        self.primary_skills
            .iter()
            .chain(self.secondary_skills.iter())
            .map(String::as_str)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accepts `5`, `5.5`, `"5"`, `""` and `null` for numeric form fields.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Whole, non-negative counterpart of [`lenient_f64`]. Fractions are rounded.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match lenient_f64(deserializer)? {
        None => Ok(None),
        Some(n) if n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX) => {
            Ok(Some(n.round() as u32))
        }
        Some(n) => Err(serde::de::Error::custom(format!(
            "{n} is not a valid non-negative integer"
        ))),
    }
}

/// Select-box values: the empty placeholder option, `null` and values this
/// build does not know all read as unset. Matching ignores case.
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::String(text)) = raw else {
        return Ok(None);
    };
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_value(Value::String(text)).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_profile_deserializes() {
        let profile: UserProfile = serde_json::from_value(json!({
            "firstName": "Jana",
            "primarySkills": ["Rust", "SQL"],
            "remotePreference": "hybrid",
            "experienceLevel": "senior"
        }))
        .unwrap();

        assert_eq!(profile.first_name.as_deref(), Some("Jana"));
        assert_eq!(profile.primary_skills.len(), 2);
        assert_eq!(profile.remote_preference, Some(RemotePreference::Hybrid));
        assert_eq!(profile.experience_level, Some(ExperienceLevel::Senior));
        assert!(profile.work_experience.is_empty());
    }

    #[test]
    fn test_years_of_experience_accepts_numeric_string() {
        let profile: UserProfile =
            serde_json::from_value(json!({ "yearsOfExperience": "4" })).unwrap();
        assert_eq!(profile.years_of_experience, Some(4.0));

        let profile: UserProfile =
            serde_json::from_value(json!({ "yearsOfExperience": "" })).unwrap();
        assert_eq!(profile.years_of_experience, None);

        let profile: UserProfile =
            serde_json::from_value(json!({ "yearsOfExperience": 2.5 })).unwrap();
        assert_eq!(profile.years_of_experience, Some(2.5));
    }

    #[test]
    fn test_years_of_experience_rejects_garbage() {
        let result: Result<UserProfile, _> =
            serde_json::from_value(json!({ "yearsOfExperience": "lots" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_placeholder_select_values_read_as_unset() {
        let profile: UserProfile = serde_json::from_value(json!({
            "firstName": "Jana",
            "experienceLevel": "",
            "remotePreference": null,
            "availability": "someday"
        }))
        .unwrap();

        assert_eq!(profile.first_name.as_deref(), Some("Jana"));
        assert_eq!(profile.experience_level, None);
        assert_eq!(profile.remote_preference, None);
        assert_eq!(profile.availability, None);
    }

    #[test]
    fn test_select_values_ignore_case() {
        let profile: UserProfile = serde_json::from_value(json!({
            "experienceLevel": "Senior",
            "availability": "2weeks"
        }))
        .unwrap();
        assert_eq!(profile.experience_level, Some(ExperienceLevel::Senior));
        assert_eq!(profile.availability, Some(Availability::TwoWeeks));
    }

    #[test]
    fn test_cleared_number_inputs_read_as_unset() {
        let profile: UserProfile = serde_json::from_value(json!({
            "maxCommuteDistance": null,
            "expectedSalary": { "min": null, "max": "4500", "currency": "EUR" }
        }))
        .unwrap();

        assert_eq!(profile.max_commute_distance, None);
        let salary = profile.expected_salary.unwrap();
        assert_eq!(salary.min, None);
        assert_eq!(salary.max, Some(4500));

        let profile: UserProfile =
            serde_json::from_value(json!({ "maxCommuteDistance": 30 })).unwrap();
        assert_eq!(profile.max_commute_distance, Some(30));
    }

    #[test]
    fn test_negative_commute_is_rejected() {
        let result: Result<UserProfile, _> =
            serde_json::from_value(json!({ "maxCommuteDistance": -5 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_availability_wire_names() {
        let value = serde_json::to_value(Availability::TwoWeeks).unwrap();
        assert_eq!(value, json!("2weeks"));
    }

    #[test]
    fn test_empty_object_is_empty_profile() {
        let profile: UserProfile = serde_json::from_value(json!({})).unwrap();
        assert!(profile.is_empty());
        assert!(!UserProfile::with_wizard_defaults().is_empty());
    }

    #[test]
    fn test_parse_loose_levels() {
        assert_eq!(ExperienceLevel::parse_loose("Entry level"), Some(ExperienceLevel::Junior));
        assert_eq!(ExperienceLevel::parse_loose("Mid"), Some(ExperienceLevel::Mid));
        assert_eq!(ExperienceLevel::parse_loose("Senior"), Some(ExperienceLevel::Senior));
        assert_eq!(ExperienceLevel::parse_loose("Principal"), Some(ExperienceLevel::Lead));
        assert_eq!(ExperienceLevel::parse_loose(""), None);
        assert_eq!(ExperienceLevel::parse_loose("n/a"), None);
    }

    #[test]
    fn test_full_name_skips_blank_parts() {
        let profile = UserProfile {
            first_name: Some("Jana".to_string()),
            last_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.full_name().as_deref(), Some("Jana"));
        assert_eq!(UserProfile::default().full_name(), None);
    }
}

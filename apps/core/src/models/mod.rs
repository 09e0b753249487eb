pub mod api;
pub mod job;
pub mod profile;
pub mod resume;

pub use job::{CompanyInfo, Job, SavedJob};
pub use profile::{ExperienceLevel, RemotePreference, UserProfile, WorkExperience};
pub use resume::{JobFitAnalysis, RecommendedResource, Resume, StudyProgram};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::job::{Job, SavedJob};

/// Bookmarked jobs, unique by id, most recently saved first.
///
/// Serializes as a bare JSON array so it can be stored under the `savedJobs` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedJobList {
    jobs: Vec<SavedJob>,
}

impl SavedJobList {
    /// Builds a list from stored entries, keeping the first occurrence of any duplicate id.
    pub fn from_entries(entries: Vec<SavedJob>) -> Self {
        let mut list = Self::default();
        for entry in entries {
            if !list.contains(&entry.id) {
                list.jobs.push(entry);
            }
        }
        list
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.jobs.iter().any(|j| j.id == job_id)
    }

    /// Saves the job if it is not saved, otherwise removes it.
    /// Returns `true` when the job is saved after the call.
    pub fn toggle(&mut self, job: &Job, now: DateTime<Utc>) -> bool {
        if self.remove(&job.id) {
            false
        } else {
            self.jobs.insert(0, SavedJob::snapshot(job, now));
            true
        }
    }

    /// Returns `true` if a job was removed.
    pub fn remove(&mut self, job_id: &str) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != job_id);
        self.jobs.len() != before
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedJob> {
        self.jobs.iter()
    }

    pub fn get(&self, job_id: &str) -> Option<&SavedJob> {
        self.jobs.iter().find(|j| j.id == job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn job(id: &str) -> Job {
        serde_json::from_value(json!({
            "id": id, "title": "Engineer", "company": "Acme", "location": "Remote"
        }))
        .unwrap()
    }

    #[test]
    fn test_toggle_pair_is_net_noop() {
        let now = Utc::now();
        let mut list = SavedJobList::default();
        list.toggle(&job("keep"), now);
        let before = list.clone();

        assert!(list.toggle(&job("x"), now));
        assert!(!list.toggle(&job("x"), now + Duration::seconds(5)));
        assert_eq!(list, before);
    }

    #[test]
    fn test_newest_first() {
        let now = Utc::now();
        let mut list = SavedJobList::default();
        list.toggle(&job("a"), now);
        list.toggle(&job("b"), now);
        let ids: Vec<&str> = list.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_from_entries_drops_duplicates() {
        let now = Utc::now();
        let a = SavedJob::snapshot(&job("a"), now);
        let list = SavedJobList::from_entries(vec![a.clone(), a.clone(), a]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let now = Utc::now();
        let mut list = SavedJobList::default();
        list.toggle(&job("a"), now);
        list.toggle(&job("b"), now);
        assert!(list.remove("a"));
        assert!(!list.remove("a"));
        assert!(list.get("b").is_some());
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_serializes_as_array() {
        let mut list = SavedJobList::default();
        list.toggle(&job("a"), Utc::now());
        let value = serde_json::to_value(&list).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["id"], "a");
        let back: SavedJobList = serde_json::from_value(value).unwrap();
        assert_eq!(back, list);
    }
}

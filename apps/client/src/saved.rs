use chrono::Utc;
use jobmatch_core::models::{Job, SavedJob};
use jobmatch_core::saved::SavedJobList;

use crate::storage::{LocalStore, StoreError, StoreKey};

/// Saved jobs persisted under `savedJobs`. Every mutation is written through.
pub struct SavedJobs {
    store: LocalStore,
    list: SavedJobList,
}

impl SavedJobs {
    pub fn load(store: LocalStore) -> Result<Self, StoreError> {
        let entries: Vec<SavedJob> = store.get(StoreKey::SavedJobs)?.unwrap_or_default();
        Ok(Self {
            store,
            list: SavedJobList::from_entries(entries),
        })
    }

    pub fn list(&self) -> &SavedJobList {
        &self.list
    }

    pub fn is_saved(&self, job_id: &str) -> bool {
        self.list.contains(job_id)
    }

    /// Returns `true` when the job is saved after the call.
    pub fn toggle(&mut self, job: &Job) -> Result<bool, StoreError> {
        let saved = self.list.toggle(job, Utc::now());
        self.persist()?;
        Ok(saved)
    }

    pub fn remove(&mut self, job_id: &str) -> Result<bool, StoreError> {
        let removed = self.list.remove(job_id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.list.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store.set(StoreKey::SavedJobs, &self.list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn job(id: &str) -> Job {
        serde_json::from_value(json!({
            "id": id, "title": "Engineer", "company": "Acme", "location": "Bratislava"
        }))
        .unwrap()
    }

    #[test]
    fn test_toggle_persists_across_loads() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path().join("state.json")).unwrap();

        let mut saved = SavedJobs::load(store.clone()).unwrap();
        assert!(saved.toggle(&job("a")).unwrap());
        assert!(saved.toggle(&job("b")).unwrap());

        let reloaded = SavedJobs::load(store.clone()).unwrap();
        let ids: Vec<&str> = reloaded.list().iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let mut saved = reloaded;
        assert!(!saved.toggle(&job("b")).unwrap());
        assert!(!SavedJobs::load(store).unwrap().is_saved("b"));
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path().join("state.json")).unwrap();
        let mut saved = SavedJobs::load(store.clone()).unwrap();
        saved.toggle(&job("a")).unwrap();
        saved.toggle(&job("b")).unwrap();

        assert!(saved.remove("a").unwrap());
        assert!(!saved.remove("a").unwrap());
        saved.clear().unwrap();
        assert!(SavedJobs::load(store).unwrap().list().is_empty());
    }
}

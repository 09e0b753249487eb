//! Debounced profile auto-save.
//!
//! A background task owns the pending edit. The initial load is recorded
//! without saving; every later edit restarts the debounce timer, and only the
//! most recent edit inside the window reaches the sink.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobmatch_core::models::UserProfile;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ClientError};
use crate::storage::{LocalStore, StoreKey};

pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_secs(1);

/// Destination of debounced saves.
#[async_trait]
pub trait ProfileSink: Send + Sync + 'static {
    async fn save(&self, profile: &UserProfile) -> Result<(), ClientError>;
}

/// Writes the local copy first, then the account profile when a session is stored.
/// A failed remote save is logged and still counts as saved.
pub struct StoreProfileSink {
    api: ApiClient,
    store: LocalStore,
}

impl StoreProfileSink {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self { api, store }
    }
}

#[async_trait]
impl ProfileSink for StoreProfileSink {
    async fn save(&self, profile: &UserProfile) -> Result<(), ClientError> {
        self.store.set(StoreKey::UserProfile, profile)?;

        if let Some(session_id) = self.store.get::<String>(StoreKey::SessionId)? {
            match self.api.update_profile(&session_id, profile).await {
                Ok(_) => info!("Profile saved to account"),
                Err(e) => warn!("Auto-save to account failed, kept local copy: {}", e),
            }
        }
        Ok(())
    }
}

enum Command {
    Load(UserProfile),
    Edit(UserProfile),
}

pub struct AutoSaver {
    tx: mpsc::UnboundedSender<Command>,
    last_saved: watch::Receiver<Option<DateTime<Utc>>>,
    task: JoinHandle<()>,
}

impl AutoSaver {
    pub fn spawn(sink: Arc<dyn ProfileSink>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (saved_tx, last_saved) = watch::channel(None);
        let task = tokio::spawn(run(sink, debounce, rx, saved_tx));
        Self {
            tx,
            last_saved,
            task,
        }
    }

    /// Records the profile as loaded. Never saves and cancels any pending edit.
    pub fn load(&self, profile: UserProfile) {
        let _ = self.tx.send(Command::Load(profile));
    }

    /// Schedules a save of `profile` once edits pause for the debounce window.
    pub fn edit(&self, profile: UserProfile) {
        let _ = self.tx.send(Command::Edit(profile));
    }

    /// Time of the last completed save, for a "saved" indicator.
    pub fn last_saved(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_saved.clone()
    }

    /// Stops the task. A pending edit that has not reached its deadline is dropped.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            warn!("Auto-save task ended abnormally: {}", e);
        }
    }
}

async fn run(
    sink: Arc<dyn ProfileSink>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
    saved_tx: watch::Sender<Option<DateTime<Utc>>>,
) {
    let mut pending: Option<(UserProfile, Instant)> = None;

    loop {
        let deadline = pending.as_ref().map(|(_, at)| *at);
        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Load(_)) => {
                    debug!("Profile loaded; auto-save armed");
                    pending = None;
                }
                Some(Command::Edit(profile)) => {
                    pending = Some((profile, Instant::now() + debounce));
                }
                None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some((profile, _)) = pending.take() {
                    match sink.save(&profile).await {
                        Ok(()) => {
                            let _ = saved_tx.send(Some(Utc::now()));
                        }
                        Err(e) => warn!("Auto-save failed: {}", e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        saved: Mutex<Vec<UserProfile>>,
    }

    #[async_trait]
    impl ProfileSink for RecordingSink {
        async fn save(&self, profile: &UserProfile) -> Result<(), ClientError> {
            self.saved.lock().unwrap().push(profile.clone());
            Ok(())
        }
    }

    impl RecordingSink {
        fn names(&self) -> Vec<String> {
            self.saved
                .lock()
                .unwrap()
                .iter()
                .filter_map(|p| p.first_name.clone())
                .collect()
        }
    }

    fn named(name: &str) -> UserProfile {
        UserProfile {
            first_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Lets the saver task observe queued commands.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_load_never_saves() {
        let sink = Arc::new(RecordingSink::default());
        let saver = AutoSaver::spawn(sink.clone(), AUTOSAVE_DEBOUNCE);

        saver.load(named("Loaded"));
        settle().await;
        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;

        assert!(sink.names().is_empty());
        saver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_edit_in_window_wins() {
        let sink = Arc::new(RecordingSink::default());
        let saver = AutoSaver::spawn(sink.clone(), AUTOSAVE_DEBOUNCE);
        saver.load(named("Loaded"));

        saver.edit(named("A"));
        settle().await;
        tokio::time::advance(Duration::from_millis(600)).await;
        saver.edit(named("B"));
        settle().await;
        tokio::time::advance(Duration::from_millis(600)).await;
        settle().await;
        // 1.2 s after the first edit but only 0.6 s after the second.
        assert!(sink.names().is_empty());

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(sink.names(), vec!["B"]);
        saver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_save_separately() {
        let sink = Arc::new(RecordingSink::default());
        let saver = AutoSaver::spawn(sink.clone(), AUTOSAVE_DEBOUNCE);
        let mut last_saved = saver.last_saved();

        saver.edit(named("A"));
        settle().await;
        tokio::time::advance(Duration::from_millis(1100)).await;
        settle().await;
        saver.edit(named("B"));
        settle().await;
        tokio::time::advance(Duration::from_millis(1100)).await;
        settle().await;

        assert_eq!(sink.names(), vec!["A", "B"]);
        assert!(last_saved.borrow_and_update().is_some());
        saver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_cancels_pending_edit() {
        let sink = Arc::new(RecordingSink::default());
        let saver = AutoSaver::spawn(sink.clone(), AUTOSAVE_DEBOUNCE);

        saver.edit(named("Draft"));
        settle().await;
        saver.load(named("Reloaded"));
        settle().await;
        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;

        assert!(sink.names().is_empty());
        saver.shutdown().await;
    }

    #[tokio::test]
    async fn test_store_sink_keeps_local_copy_when_remote_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = LocalStore::open(dir.path().join("state.json")).unwrap();
        store.set(StoreKey::SessionId, &"session-1").unwrap();
        let sink = StoreProfileSink::new(
            ApiClient::new("http://127.0.0.1:1/api").unwrap(),
            store.clone(),
        );

        sink.save(&named("Jana")).await.unwrap();
        assert_eq!(
            store.get::<UserProfile>(StoreKey::UserProfile).unwrap(),
            Some(named("Jana"))
        );
    }
}

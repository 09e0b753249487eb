use jobmatch_core::models::api::{AuthPayload, User};
use jobmatch_core::models::UserProfile;
use tracing::{info, warn};

use crate::api::{ApiClient, ClientError};
use crate::storage::{LocalStore, StoreKey};

/// The signed-in account and its session, mirrored between the server and the
/// local key store.
///
/// Sign-in state is persisted under `sessionId` and `userEmail`; the profile
/// under `userProfile`, which also serves anonymous users.
pub struct AuthSession {
    api: ApiClient,
    store: LocalStore,
    session_id: Option<String>,
    user: Option<User>,
}

impl AuthSession {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self {
            api,
            store,
            session_id: None,
            user: None,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The locally stored profile, ignoring an empty one.
    pub fn local_profile(&self) -> Result<Option<UserProfile>, ClientError> {
        Ok(self
            .store
            .get::<UserProfile>(StoreKey::UserProfile)?
            .filter(|p| !p.is_empty()))
    }

    /// Resumes a stored session. An invalid or expired session is forgotten.
    pub async fn restore(&mut self) -> Result<Option<&User>, ClientError> {
        let Some(session_id) = self.store.get::<String>(StoreKey::SessionId)? else {
            return Ok(None);
        };

        match self.api.current_user(&session_id).await {
            Some(mut user) => {
                if user.profile.is_empty() {
                    if let Some(local) = self.local_profile()? {
                        user.profile = local;
                    }
                }
                info!("Restored session for {}", user.email);
                self.session_id = Some(session_id);
                self.user = Some(user);
            }
            None => {
                info!("Stored session is no longer valid");
                self.forget_session()?;
            }
        }
        Ok(self.user.as_ref())
    }

    /// Signs in. A profile that exists only locally is pushed to the new account.
    ///
    /// Session keys are stored only once that push has succeeded; a failed push
    /// fails the login and leaves the store signed out.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, ClientError> {
        let local = self.local_profile()?;
        let AuthPayload {
            session_id,
            mut user,
        } = self.api.sign_in(email, password).await?;

        if user.profile.is_empty() {
            if let Some(local) = local {
                if let Err(e) = self.api.update_profile(&session_id, &local).await {
                    warn!("Profile sync on login failed for {}: {}", user.email, e);
                    if let Err(signout_err) = self.api.sign_out(&session_id).await {
                        warn!("Sign-out after failed sync failed: {}", signout_err);
                    }
                    return Err(e);
                }
                info!("Synced local profile to {}", user.email);
                user.profile = local;
            }
        } else {
            self.store.set(StoreKey::UserProfile, &user.profile)?;
        }

        self.remember_session(&session_id, &user.email)?;
        self.session_id = Some(session_id);
        Ok(self.user.insert(user))
    }

    /// Creates an account, falling back to the locally stored profile when none is given.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        profile: Option<UserProfile>,
    ) -> Result<&User, ClientError> {
        let profile = match profile {
            Some(profile) => Some(profile),
            None => self.local_profile()?,
        };
        let AuthPayload { session_id, user } =
            self.api.sign_up(email, password, profile.clone()).await?;
        self.remember_session(&session_id, &user.email)?;
        if let Some(profile) = &profile {
            self.store.set(StoreKey::UserProfile, profile)?;
        }

        info!("Registered {}", user.email);
        self.session_id = Some(session_id);
        Ok(self.user.insert(user))
    }

    /// Best-effort sign-out; local session keys are cleared regardless.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        if let Some(session_id) = self.store.get::<String>(StoreKey::SessionId)? {
            if let Err(e) = self.api.sign_out(&session_id).await {
                warn!("Sign-out request failed: {}", e);
            }
        }
        self.forget_session()
    }

    /// Saves locally when signed out; otherwise saves to the server first.
    pub async fn update_profile(&mut self, profile: UserProfile) -> Result<(), ClientError> {
        let Some(session_id) = self.store.get::<String>(StoreKey::SessionId)? else {
            self.store.set(StoreKey::UserProfile, &profile)?;
            return Ok(());
        };

        let updated = self.api.update_profile(&session_id, &profile).await?;
        if let Some(user) = &mut self.user {
            user.profile = if updated.profile.is_empty() {
                profile.clone()
            } else {
                updated.profile
            };
        }
        self.store.set(StoreKey::UserProfile, &profile)?;
        Ok(())
    }

    fn remember_session(&self, session_id: &str, email: &str) -> Result<(), ClientError> {
        self.store.set(StoreKey::SessionId, &session_id)?;
        self.store.set(StoreKey::UserEmail, &email)?;
        Ok(())
    }

    fn forget_session(&mut self) -> Result<(), ClientError> {
        self.store.remove(StoreKey::SessionId)?;
        self.store.remove(StoreKey::UserEmail)?;
        self.session_id = None;
        self.user = None;
        Ok(())
    }
}

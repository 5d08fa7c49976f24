use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::profile::Profile;
use crate::credentials::{CredentialStore, StoreError};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Unauthenticated,
    Authenticated,
}

/// Auth transitions, broadcast to whoever decides navigation.
///
/// One user action yields at most one event. A logout whose server call
/// comes back 401 yields `Unauthorized` and no `LoggedOut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    LoggedIn { user_id: i64 },
    LoggedOut,
    /// A request came back 401 and the session was dropped.
    Unauthorized,
}

/// Snapshot of the session. `Authenticated` holds exactly when both the
/// token and the profile are present.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub status: SessionStatus,
    pub token: Option<String>,
    pub profile: Option<Profile>,
}

impl Session {
    fn starting() -> Self {
        Self {
            status: SessionStatus::Loading,
            token: None,
            profile: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

struct Inner {
    state: RwLock<Session>,
    store: Arc<dyn CredentialStore>,
    events: broadcast::Sender<AuthEvent>,
}

/// Shared handle to the session and its credential store.
///
/// Cheap to clone. Locks are held only for the duration of a field update and
/// never across an `.await`.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("status", &self.status())
            .finish()
    }
}

impl SessionHandle {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(Session::starting()),
                store,
                events,
            }),
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    /// Token attached to outgoing requests, read from the credential store.
    pub fn token(&self) -> Option<String> {
        self.inner.store.get()
    }

    pub fn snapshot(&self) -> Session {
        self.inner.state.read().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.state.read().status
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().is_authenticated()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.inner.state.read().profile.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }

    pub(crate) fn emit(&self, event: AuthEvent) {
        debug!("Auth event: {:?}", event);
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    pub(crate) fn set_status(&self, status: SessionStatus) {
        self.inner.state.write().status = status;
    }

    /// Hold `token` in memory while it is being verified.
    pub(crate) fn stage_token(&self, token: String) {
        let mut state = self.inner.state.write();
        state.token = Some(token);
    }

    /// Persist the token, cache the profile, and mark the session live.
    pub(crate) fn establish(&self, token: &str, profile: Profile) -> Result<(), StoreError> {
        self.inner.store.set(token)?;
        if let Err(e) = self.inner.store.set_profile(&profile) {
            warn!("Could not cache profile: {}", e);
        }

        let mut state = self.inner.state.write();
        state.token = Some(token.to_string());
        state.profile = Some(profile);
        state.status = SessionStatus::Authenticated;
        Ok(())
    }

    /// Apply `f` to the current profile, if any, and re-cache it.
    pub(crate) fn update_profile<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Profile),
    {
        let updated: Option<Profile> = {
            let mut state = self.inner.state.write();
            state.profile.as_mut().map(|profile| {
                f(profile);
                profile.clone()
            })
        };

        match updated {
            Some(profile) => {
                if let Err(e) = self.inner.store.set_profile(&profile) {
                    warn!("Could not cache profile: {}", e);
                }
                true
            }
            None => false,
        }
    }

    /// Replace the token only; the profile is untouched.
    pub(crate) fn replace_token(&self, token: &str) -> Result<(), StoreError> {
        self.inner.store.set(token)?;
        self.inner.state.write().token = Some(token.to_string());
        Ok(())
    }

    /// Drop credentials and in-memory identity. Safe to call repeatedly.
    pub fn clear(&self) {
        self.clear_inner();
    }

    /// Returns whether anything was actually held before clearing.
    fn clear_inner(&self) -> bool {
        let mut state = self.inner.state.write();
        let had_session: bool =
            state.token.is_some() || state.profile.is_some() || self.inner.store.get().is_some();

        self.inner.store.clear();
        state.token = None;
        state.profile = None;
        state.status = SessionStatus::Unauthenticated;
        had_session
    }

    /// Unified 401 handling: clear everything, end up `Unauthenticated`, and
    /// emit [`AuthEvent::Unauthorized`] once per lost session.
    pub(crate) fn expire(&self) {
        let had_session: bool = self.clear_inner();

        if had_session {
            info!("Session expired, credentials cleared");
            self.emit(AuthEvent::Unauthorized);
        } else {
            debug!("401 with no session held");
        }
    }
}

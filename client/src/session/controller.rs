use std::collections::BTreeSet;

use shared::types::{LoginPayload, RefreshPayload};
use tracing::{debug, error, info, warn};

use super::profile::{MENU, MenuModule, Profile};
use super::state::{AuthEvent, SessionHandle, SessionStatus};
use crate::error::{ApiError, ApiResult};
use crate::resources::AuthClient;

/// Short, loggable prefix of a bearer token.
fn token_prefix(token: &str) -> &str {
    let end: usize = token
        .char_indices()
        .nth(8)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    &token[..end]
}

/// Drives the session through login, logout, refresh and start-up
/// verification, and answers authorization queries from the cached profile.
#[derive(Debug, Clone)]
pub struct SessionController {
    session: SessionHandle,
    auth: AuthClient,
}

impl SessionController {
    pub fn new(session: SessionHandle, auth: AuthClient) -> Self {
        Self { session, auth }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Restore a persisted session on start-up.
    ///
    /// Without a stored token the session becomes `Unauthenticated`. With
    /// one, the token is verified against the backend; any failure clears
    /// it. A verified session then gets a best-effort permission load.
    pub async fn bootstrap(&self) -> SessionStatus {
        self.session.set_status(SessionStatus::Loading);

        let Some(token) = self.session.token() else {
            info!("No stored token");
            self.session.set_status(SessionStatus::Unauthenticated);
            return SessionStatus::Unauthenticated;
        };

        debug!("Stored token found: {}...", token_prefix(&token));
        self.session.stage_token(token.clone());

        match self.auth.me().await {
            Ok(user) => {
                let profile = Profile::from(user);
                info!("Session restored for {}", profile.username);
                let user_id: i64 = profile.id;

                if let Err(e) = self.session.establish(&token, profile) {
                    error!("Could not persist restored session: {}", e);
                    self.session.clear();
                    return SessionStatus::Unauthenticated;
                }

                self.load_detailed_permissions().await;
                self.session.emit(AuthEvent::LoggedIn { user_id });
            }
            Err(e) => {
                warn!("Stored token rejected: {}", e);
                self.session.clear();
            }
        }

        self.session.status()
    }

    /// Sign in. On success the token is persisted, the profile set, and the
    /// detailed permissions loaded on a best-effort basis. On any failure
    /// the session is cleared and the original error returned.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Profile> {
        info!("Login attempt for {}", username);

        match self.try_login(username, password).await {
            Ok(profile) => {
                self.load_detailed_permissions().await;
                self.session.emit(AuthEvent::LoggedIn { user_id: profile.id });
                info!("Login complete for {}", profile.username);
                Ok(self.session.profile().unwrap_or(profile))
            }
            Err(e) => {
                error!("Login failed: {}", e);
                self.session.clear();
                Err(e)
            }
        }
    }

    async fn try_login(&self, username: &str, password: &str) -> ApiResult<Profile> {
        let payload: LoginPayload = self.auth.login(username, password).await?;

        if payload.access_token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "login response carried no access token".into(),
            ));
        }

        debug!("Login payload: {}", payload);
        let profile = Profile::from(&payload);
        self.session.establish(&payload.access_token, profile.clone())?;
        Ok(profile)
    }

    /// Sign out locally. The server is told first, bounded by the request
    /// timeout; its failure is logged and ignored.
    ///
    /// Exactly one event is emitted: `LoggedOut`, or `Unauthorized` alone
    /// when the server answered the logout call with 401.
    pub async fn logout(&self) {
        info!("Logging out");

        let mut expired: bool = false;
        if self.session.token().is_some() {
            if let Err(e) = self.auth.logout().await {
                warn!("Server logout failed: {}", e);
                expired = e.is_session_expired();
            }
        }

        self.session.clear();
        if !expired {
            self.session.emit(AuthEvent::LoggedOut);
        }
    }

    /// Exchange the current token for a fresh one. Returns `false` when no
    /// new token was obtained; a failed call also ends the session.
    pub async fn refresh(&self) -> bool {
        match self.auth.refresh().await {
            Ok(RefreshPayload {
                access_token: Some(token),
                ..
            }) if !token.is_empty() => match self.session.replace_token(&token) {
                Ok(()) => {
                    info!("Token refreshed");
                    true
                }
                Err(e) => {
                    error!("Could not persist refreshed token: {}", e);
                    self.session.clear();
                    false
                }
            },
            Ok(_) => {
                warn!("Refresh returned no token");
                false
            }
            Err(e) => {
                error!("Token refresh failed: {}", e);
                self.session.clear();
                false
            }
        }
    }

    /// Drop credentials and identity. Idempotent.
    pub fn clear_auth(&self) {
        self.session.clear();
    }

    /// Merge the detailed permission listing into the current profile.
    /// Failure leaves the session as it is.
    pub async fn load_detailed_permissions(&self) -> bool {
        match self.auth.my_permissions().await {
            Ok(detailed) => {
                let modules: usize = detailed.modulos_accesibles.len();
                let merged: bool = self.session.update_profile(|p| p.merge_detailed(detailed));
                if merged {
                    debug!("Detailed permissions loaded ({} modules)", modules);
                }
                merged
            }
            Err(e) => {
                warn!("Could not load detailed permissions: {}", e);
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Authorization queries (no network)
    // -----------------------------------------------------------------------

    fn with_profile<R>(&self, default: R, f: impl FnOnce(&Profile) -> R) -> R {
        match self.session.profile() {
            Some(profile) => f(&profile),
            None => default,
        }
    }

    pub fn has_permission(&self, code: &str) -> bool {
        self.with_profile(false, |p| p.has_permission(code))
    }

    pub fn can_access_module(&self, module: &str) -> bool {
        self.with_profile(false, |p| p.can_access_module(module))
    }

    pub fn can_perform_action(&self, action: &str) -> bool {
        self.with_profile(false, |p| p.can_perform_action(action))
    }

    pub fn permissions_in_module(&self, module: &str) -> BTreeSet<String> {
        self.with_profile(BTreeSet::new(), |p| p.permissions_in_module(module))
    }

    pub fn has_permission_in_module(&self, module: &str, code: &str) -> bool {
        self.with_profile(false, |p| p.has_permission_in_module(module, code))
    }

    pub fn is_administrator(&self) -> bool {
        self.with_profile(false, |p| p.is_administrator)
    }

    /// Application menu entries the current user may open.
    pub fn menu_modules(&self) -> Vec<MenuModule> {
        self.with_profile(Vec::new(), |p| {
            MENU.iter()
                .filter(|m| p.can_access_module(m.id))
                .copied()
                .collect()
        })
    }
}

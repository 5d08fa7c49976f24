//! Cached admin-screen state: users, roles, permissions and login activity.
//!
//! Mutations go to the backend first and are mirrored into the cache only
//! once they succeed.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use parking_lot::RwLock;
use serde::Serialize;
use shared::types::{
    LoginLog, NewUserCredentials, Permission, PermissionInput, PermissionUpdate, Role, RoleInput,
    User, UserCreate, UserUpdate,
};
use tracing::{debug, error, info, warn};

use crate::error::ApiResult;
use crate::resources::{AuditClient, PermissionsClient, RolesClient, UsersClient};

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsersStats {
    pub total_users: usize,
    pub active_roles: usize,
    pub total_permissions: usize,
    pub logins_today: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AdminState {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub access_logs: Vec<LoginLog>,
    pub stats: Option<UsersStats>,
    pub selected_user: Option<User>,
    pub selected_permission: Option<Permission>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AdminState {
    fn recompute_stats(&mut self, today: NaiveDate) {
        self.stats = Some(UsersStats {
            total_users: self.users.len(),
            active_roles: self.roles.iter().filter(|r| r.is_active).count(),
            total_permissions: self.permissions.len(),
            logins_today: count_logins_on(&self.access_logs, today),
        });
    }

    fn update_stats<F: FnOnce(&mut UsersStats, &AdminState)>(&mut self, f: F) {
        if let Some(mut stats) = self.stats {
            f(&mut stats, self);
            self.stats = Some(stats);
        }
    }
}

/// Local calendar date of a backend timestamp. Accepts RFC 3339, naive
/// ISO date-times (taken as local time) and bare dates.
fn local_date(timestamp: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    timestamp
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// Successful logins whose timestamp falls on `day`.
pub fn count_logins_on(logs: &[LoginLog], day: NaiveDate) -> usize {
    logs.iter()
        .filter(|log| log.succeeded() && local_date(&log.fecha_hora) == Some(day))
        .count()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Owned state container for the admin screens.
#[derive(Debug)]
pub struct AdminStore {
    users: UsersClient,
    roles: RolesClient,
    permissions: PermissionsClient,
    audit: AuditClient,
    state: RwLock<AdminState>,
}

impl AdminStore {
    pub fn new(
        users: UsersClient,
        roles: RolesClient,
        permissions: PermissionsClient,
        audit: AuditClient,
    ) -> Self {
        Self {
            users,
            roles,
            permissions,
            audit,
            state: RwLock::new(AdminState::default()),
        }
    }

    pub fn snapshot(&self) -> AdminState {
        self.state.read().clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.state.read().users.clone()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.state.read().roles.clone()
    }

    pub fn permissions(&self) -> Vec<Permission> {
        self.state.read().permissions.clone()
    }

    pub fn access_logs(&self) -> Vec<LoginLog> {
        self.state.read().access_logs.clone()
    }

    pub fn stats(&self) -> Option<UsersStats> {
        self.state.read().stats
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn select_user(&self, user: Option<User>) {
        self.state.write().selected_user = user;
    }

    pub fn select_permission(&self, permission: Option<Permission>) {
        self.state.write().selected_permission = permission;
    }

    /// Load every list. The four loads are independent: a users failure is
    /// recorded in `error`; the others are logged and leave their list empty.
    pub async fn load_all(&self) {
        {
            let mut state = self.state.write();
            state.is_loading = true;
            state.error = None;
        }

        let (users, roles, permissions, logs) = tokio::join!(
            self.users.list(),
            self.roles.list(),
            self.permissions.list(),
            self.audit.login_logs(),
        );

        let mut state = self.state.write();

        match users {
            Ok(list) => {
                debug!("Users loaded: {}", list.len());
                state.users = list;
            }
            Err(e) => {
                error!("Failed to load users: {}", e);
                state.error = Some(e.message());
            }
        }

        state.roles = roles.unwrap_or_else(|e| {
            warn!("Failed to load roles: {}", e);
            Vec::new()
        });
        state.permissions = permissions.unwrap_or_else(|e| {
            warn!("Failed to load permissions: {}", e);
            Vec::new()
        });
        state.access_logs = logs.unwrap_or_else(|e| {
            warn!("Failed to load login logs: {}", e);
            Vec::new()
        });

        state.recompute_stats(today());
        state.is_loading = false;
        info!("Admin data loaded: {:?}", state.stats);
    }

    pub async fn refresh_roles(&self) -> ApiResult<()> {
        let roles: Vec<Role> = self.roles.list().await?;
        let mut state = self.state.write();
        state.roles = roles;
        state.update_stats(|stats, s| {
            stats.active_roles = s.roles.iter().filter(|r| r.is_active).count()
        });
        Ok(())
    }

    pub async fn refresh_permissions(&self) -> ApiResult<()> {
        let permissions: Vec<Permission> = self.permissions.list().await?;
        let mut state = self.state.write();
        state.permissions = permissions;
        state.update_stats(|stats, s| stats.total_permissions = s.permissions.len());
        Ok(())
    }

    async fn reload_users(&self) -> ApiResult<()> {
        let users: Vec<User> = self.users.list().await?;
        let mut state = self.state.write();
        state.users = users;
        state.update_stats(|stats, s| stats.total_users = s.users.len());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Create an account and reload the user list. The returned credentials
    /// hold the one-time temporary password.
    pub async fn create_user(&self, data: &UserCreate) -> ApiResult<NewUserCredentials> {
        let created = self.users.create(data).await?;
        self.reload_users().await?;
        Ok(created)
    }

    pub async fn update_user(&self, id: i64, data: &UserUpdate) -> ApiResult<User> {
        let updated: User = self.users.update(id, data).await?;
        let mut state = self.state.write();
        for user in state.users.iter_mut().filter(|u| u.id_usuario == id) {
            *user = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete_user(&self, id: i64) -> ApiResult<()> {
        self.users.delete(id).await?;
        let mut state = self.state.write();
        state.users.retain(|u| u.id_usuario != id);
        if state.selected_user.as_ref().is_some_and(|u| u.id_usuario == id) {
            state.selected_user = None;
        }
        state.update_stats(|stats, s| stats.total_users = s.users.len());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Permissions
    // -----------------------------------------------------------------------

    pub async fn create_permission(&self, data: &PermissionInput) -> ApiResult<Permission> {
        let created: Permission = self.permissions.create(data).await?;
        let mut state = self.state.write();
        state.permissions.push(created.clone());
        state.update_stats(|stats, s| stats.total_permissions = s.permissions.len());
        Ok(created)
    }

    pub async fn update_permission(&self, id: i64, data: &PermissionUpdate) -> ApiResult<Permission> {
        let updated: Permission = self.permissions.update(id, data).await?;
        let mut state = self.state.write();
        for permission in state.permissions.iter_mut().filter(|p| p.id_permiso == id) {
            *permission = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete_permission(&self, id: i64) -> ApiResult<()> {
        self.permissions.delete(id).await?;
        let mut state = self.state.write();
        state.permissions.retain(|p| p.id_permiso != id);
        if state
            .selected_permission
            .as_ref()
            .is_some_and(|p| p.id_permiso == id)
        {
            state.selected_permission = None;
        }
        state.update_stats(|stats, s| stats.total_permissions = s.permissions.len());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Roles (re-fetched after each change so counters stay server-computed)
    // -----------------------------------------------------------------------

    pub async fn create_role(&self, data: &RoleInput) -> ApiResult<Role> {
        let created: Role = self.roles.create(data).await?;
        self.refresh_roles().await?;
        Ok(created)
    }

    pub async fn update_role(&self, id: i64, data: &RoleInput) -> ApiResult<Role> {
        let updated: Role = self.roles.update(id, data).await?;
        self.refresh_roles().await?;
        Ok(updated)
    }

    pub async fn delete_role(&self, id: i64) -> ApiResult<()> {
        self.roles.delete(id).await?;
        let mut state = self.state.write();
        state.roles.retain(|r| r.id_rol != id);
        state.update_stats(|stats, s| {
            stats.active_roles = s.roles.iter().filter(|r| r.is_active).count()
        });
        Ok(())
    }

    pub async fn assign_role(&self, user_id: i64, role_id: i64) -> ApiResult<()> {
        self.roles.assign_to_user(user_id, role_id).await?;
        self.refresh_roles().await?;
        self.reload_users().await
    }

    pub async fn revoke_role(&self, user_id: i64, role_id: i64) -> ApiResult<()> {
        self.roles.revoke_from_user(user_id, role_id).await?;
        self.refresh_roles().await?;
        self.reload_users().await
    }

    pub async fn assign_permissions(&self, role_id: i64, permission_ids: &[i64]) -> ApiResult<()> {
        self.roles.assign_permissions(role_id, permission_ids).await?;
        self.refresh_roles().await
    }
}

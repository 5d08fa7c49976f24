use serde_json::Value;
use shared::types::{Role, RoleInput};
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::error::{ApiError, ApiResult};
use crate::http::{ErrorContext, Query, RequestExecutor};

const BASE: &str = "/auth/roles";
const USERS_BASE: &str = "/auth/usuarios";

const ROLE_NOT_FOUND: &str = "role does not exist or was deleted";
const ROLE_ALREADY_DELETED: &str = "role does not exist or was already deleted";
const ROLE_CONFLICT: &str = "a role with this name already exists";
const DELETE_FORBIDDEN: &str = "you do not have permission to delete roles";
const ASSIGN_FORBIDDEN: &str = "you do not have permission to assign roles";
const REVOKE_FORBIDDEN: &str = "you do not have permission to revoke roles";

/// `/auth/roles` endpoints plus role assignment on users.
#[derive(Debug, Clone)]
pub struct RolesClient {
    exec: RequestExecutor,
}

impl RolesClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    pub async fn list(&self) -> ApiResult<Vec<Role>> {
        self.exec
            .get_list(BASE, &Query::new(), &ErrorContext::new())
            .await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Role> {
        let ctx = ErrorContext::new().not_found(ROLE_NOT_FOUND);
        self.exec
            .get(&format!("{}/{}", BASE, id), &Query::new(), &ctx)
            .await
    }

    pub async fn create(&self, data: &RoleInput) -> ApiResult<Role> {
        let ctx = ErrorContext::new().conflict(ROLE_CONFLICT);
        self.exec.post(BASE, data, &ctx).await
    }

    pub async fn update(&self, id: i64, data: &RoleInput) -> ApiResult<Role> {
        let ctx = ErrorContext::new()
            .not_found(ROLE_NOT_FOUND)
            .conflict(ROLE_CONFLICT);
        self.exec.put(&format!("{}/{}", BASE, id), data, &ctx).await
    }

    /// Logical delete.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let ctx = ErrorContext::new()
            .forbidden(DELETE_FORBIDDEN)
            .not_found(ROLE_ALREADY_DELETED);
        let _: Value = self.exec.delete(&format!("{}/{}", BASE, id), &ctx).await?;
        debug!("Role {} deleted", id);
        Ok(())
    }

    /// Permissions attached to a role; a `null` payload is an empty list.
    pub async fn permissions(&self, id: i64) -> ApiResult<Vec<Value>> {
        self.exec
            .get_list(
                &format!("{}/{}/permisos", BASE, id),
                &Query::new(),
                &ErrorContext::new(),
            )
            .await
    }

    /// Users holding a role. A 404 yields an empty list so list views keep
    /// rendering; every other error propagates.
    pub async fn users(&self, id: i64) -> ApiResult<Vec<Value>> {
        let result = self
            .exec
            .get_list(
                &format!("{}/{}/usuarios", BASE, id),
                &Query::new(),
                &ErrorContext::new(),
            )
            .await;

        match result {
            Err(ApiError::NotFound(_)) => {
                warn!("No users found for role {}", id);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Replace a role's permission set. The body is the bare id array.
    pub async fn assign_permissions(&self, id: i64, permission_ids: &[i64]) -> ApiResult<()> {
        let ctx = ErrorContext::new().not_found(ROLE_NOT_FOUND);
        let _: Value = self
            .exec
            .post(&format!("{}/{}/permisos", BASE, id), permission_ids, &ctx)
            .await?;
        debug!("Assigned {} permissions to role {}", permission_ids.len(), id);
        Ok(())
    }

    pub async fn assign_to_user(&self, user_id: i64, role_id: i64) -> ApiResult<()> {
        let ctx = ErrorContext::new().forbidden(ASSIGN_FORBIDDEN);
        let _: Value = self
            .exec
            .post_empty(&format!("{}/{}/roles/{}", USERS_BASE, user_id, role_id), &ctx)
            .await?;
        Ok(())
    }

    pub async fn revoke_from_user(&self, user_id: i64, role_id: i64) -> ApiResult<()> {
        let ctx = ErrorContext::new().forbidden(REVOKE_FORBIDDEN);
        let _: Value = self
            .exec
            .delete(&format!("{}/{}/roles/{}", USERS_BASE, user_id, role_id), &ctx)
            .await?;
        Ok(())
    }
}

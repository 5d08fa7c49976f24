use shared::types::{CurrentUser, DetailedPermissions, LoginData, LoginPayload, RefreshPayload};
use serde_json::Value;

use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor};

const LOGIN: &str = "/auth/login";
const ME: &str = "/auth/me";
const MY_PERMISSIONS: &str = "/auth/mis-permisos";
const REFRESH: &str = "/auth/refresh";
const LOGOUT: &str = "/auth/logout";

/// Auth endpoints used by the session controller.
#[derive(Debug, Clone)]
pub struct AuthClient {
    exec: RequestExecutor,
}

impl AuthClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    pub async fn login(&self, usuario: &str, password: &str) -> ApiResult<LoginPayload> {
        let body = LoginData {
            usuario: usuario.to_string(),
            password: password.to_string(),
        };
        self.exec.post(LOGIN, &body, &ErrorContext::new()).await
    }

    /// Verify the stored token and return who it belongs to.
    pub async fn me(&self) -> ApiResult<CurrentUser> {
        self.exec.get(ME, &Query::new(), &ErrorContext::new()).await
    }

    pub async fn my_permissions(&self) -> ApiResult<DetailedPermissions> {
        self.exec
            .get(MY_PERMISSIONS, &Query::new(), &ErrorContext::new())
            .await
    }

    pub async fn refresh(&self) -> ApiResult<RefreshPayload> {
        let payload: Option<RefreshPayload> =
            self.exec.post_empty(REFRESH, &ErrorContext::new()).await?;
        Ok(payload.unwrap_or_default())
    }

    pub async fn logout(&self) -> ApiResult<()> {
        let _: Value = self.exec.post_empty(LOGOUT, &ErrorContext::new()).await?;
        Ok(())
    }
}

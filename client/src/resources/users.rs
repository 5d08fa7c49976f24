use serde_json::Value;
use shared::types::{
    ChangePasswordData, NewUserCredentials, PasswordReset, User, UserCreate, UserUpdate,
};
use tracing::info;

use super::Page;
use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor};

const BASE: &str = "/auth/usuarios";

pub const DEFAULT_PAGE: Page = Page::new(0, 100);

const USER_NOT_FOUND: &str = "user not found";
const USER_CONFLICT: &str = "a user with that email or username already exists";
const PERSON_NOT_FOUND: &str = "person not found";
const RESET_FORBIDDEN: &str = "you do not have permission to reset passwords";

/// `/auth/usuarios` endpoints.
#[derive(Debug, Clone)]
pub struct UsersClient {
    exec: RequestExecutor,
}

impl UsersClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    /// First page with the default size.
    pub async fn list(&self) -> ApiResult<Vec<User>> {
        self.list_page(DEFAULT_PAGE).await
    }

    pub async fn list_page(&self, page: Page) -> ApiResult<Vec<User>> {
        let query: Query = page.query()?;
        self.exec.get_list(BASE, &query, &ErrorContext::new()).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<User> {
        let ctx = ErrorContext::new().not_found(USER_NOT_FOUND);
        self.exec
            .get(&format!("{}/{}", BASE, id), &Query::new(), &ctx)
            .await
    }

    /// Create an account; the backend generates a temporary password and
    /// returns it once.
    pub async fn create(&self, data: &UserCreate) -> ApiResult<NewUserCredentials> {
        let ctx = ErrorContext::new()
            .conflict(USER_CONFLICT)
            .not_found(PERSON_NOT_FOUND);
        let created: NewUserCredentials = self.exec.post(BASE, data, &ctx).await?;
        info!("Created user {}", created.usuario);
        Ok(created)
    }

    pub async fn update(&self, id: i64, data: &UserUpdate) -> ApiResult<User> {
        let ctx = ErrorContext::new()
            .not_found(USER_NOT_FOUND)
            .conflict(USER_CONFLICT);
        self.exec.put(&format!("{}/{}", BASE, id), data, &ctx).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let ctx = ErrorContext::new().not_found(USER_NOT_FOUND);
        let _: Value = self.exec.delete(&format!("{}/{}", BASE, id), &ctx).await?;
        Ok(())
    }

    /// Administrator reset; returns the new temporary password.
    pub async fn reset_password(&self, id: i64) -> ApiResult<PasswordReset> {
        let ctx = ErrorContext::new()
            .not_found(USER_NOT_FOUND)
            .forbidden(RESET_FORBIDDEN);
        self.exec
            .post_empty(&format!("{}/{}/restablecer-password", BASE, id), &ctx)
            .await
    }

    /// Change the signed-in user's own password.
    pub async fn change_password(&self, data: &ChangePasswordData) -> ApiResult<()> {
        let _: Value = self
            .exec
            .post(
                &format!("{}/cambiar-password", BASE),
                data,
                &ErrorContext::new(),
            )
            .await?;
        Ok(())
    }

    pub async fn statistics(&self) -> ApiResult<Value> {
        self.exec
            .get(
                &format!("{}/estadisticas", BASE),
                &Query::new(),
                &ErrorContext::new(),
            )
            .await
    }
}

use std::collections::BTreeSet;

use serde_json::Value;
use shared::types::{Permission, PermissionInput, PermissionUpdate};

use super::{MAX_LIMIT, Page};
use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor};

const BASE: &str = "/auth/permisos";

pub const DEFAULT_PAGE: Page = Page::new(0, 100);

const PERMISSION_NOT_FOUND: &str = "permission not found";
const PERMISSION_CONFLICT: &str = "a permission with this name or code already exists";

/// Module filter as sent on the wire. Blank values and the literal strings
/// `undefined` / `null` mean "no filter".
fn module_filter(module: Option<&str>) -> Option<&str> {
    module
        .map(str::trim)
        .filter(|m| !m.is_empty() && *m != "undefined" && *m != "null")
}

/// `/auth/permisos` endpoints.
#[derive(Debug, Clone)]
pub struct PermissionsClient {
    exec: RequestExecutor,
}

impl PermissionsClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    pub async fn list(&self) -> ApiResult<Vec<Permission>> {
        self.list_page(DEFAULT_PAGE, None).await
    }

    pub async fn list_page(&self, page: Page, module: Option<&str>) -> ApiResult<Vec<Permission>> {
        let query: Query = page.query()?.push_opt("modulo", module_filter(module));
        self.exec.get_list(BASE, &query, &ErrorContext::new()).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Permission> {
        let ctx = ErrorContext::new().not_found(PERMISSION_NOT_FOUND);
        self.exec
            .get(&format!("{}/{}", BASE, id), &Query::new(), &ctx)
            .await
    }

    pub async fn create(&self, data: &PermissionInput) -> ApiResult<Permission> {
        let ctx = ErrorContext::new().conflict(PERMISSION_CONFLICT);
        self.exec.post(BASE, data, &ctx).await
    }

    pub async fn update(&self, id: i64, data: &PermissionUpdate) -> ApiResult<Permission> {
        let ctx = ErrorContext::new()
            .not_found(PERMISSION_NOT_FOUND)
            .conflict(PERMISSION_CONFLICT);
        self.exec.put(&format!("{}/{}", BASE, id), data, &ctx).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let ctx = ErrorContext::new().not_found(PERMISSION_NOT_FOUND);
        let _: Value = self.exec.delete(&format!("{}/{}", BASE, id), &ctx).await?;
        Ok(())
    }

    /// Roles that hold the permission.
    pub async fn roles(&self, id: i64) -> ApiResult<Vec<Value>> {
        let ctx = ErrorContext::new().not_found(PERMISSION_NOT_FOUND);
        self.exec
            .get_list(&format!("{}/{}/roles", BASE, id), &Query::new(), &ctx)
            .await
    }

    /// Distinct non-blank module names, sorted.
    pub async fn modules(&self) -> ApiResult<Vec<String>> {
        let all = self.list_page(Page::new(0, MAX_LIMIT), None).await?;
        Ok(distinct_sorted(all.into_iter().filter_map(|p| p.modulo)))
    }

    /// Distinct action names, sorted.
    pub async fn actions(&self) -> ApiResult<Vec<String>> {
        let all = self.list_page(Page::new(0, MAX_LIMIT), None).await?;
        Ok(distinct_sorted(all.into_iter().filter_map(|p| p.accion)))
    }
}

fn distinct_sorted(values: impl Iterator<Item = String>) -> Vec<String> {
    values
        .filter(|v| !v.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_modules_are_not_filters() {
        assert_eq!(module_filter(None), None);
        assert_eq!(module_filter(Some("  ")), None);
        assert_eq!(module_filter(Some("undefined")), None);
        assert_eq!(module_filter(Some("null")), None);
        assert_eq!(module_filter(Some(" usuarios ")), Some("usuarios"));
    }

    #[test]
    fn distinct_sorted_drops_blanks() {
        let out = distinct_sorted(
            ["roles", "", "usuarios", "roles", " "]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(out, vec!["roles", "usuarios"]);
    }
}

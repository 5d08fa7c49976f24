use bytes::Bytes;
use serde_json::Value;
use shared::types::{ActionTypes, AuditFilters, AuditPage, ExportFormat, LoginLog, LoginLogs};

use super::Page;
use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor};

const BASE: &str = "/bitacora";

pub const DEFAULT_PAGE: Page = Page::new(0, 50);
pub const DEFAULT_STATS_DAYS: u32 = 7;

const AUDIT_FORBIDDEN: &str = "you do not have permission to access the audit log";

fn audit_ctx() -> ErrorContext {
    ErrorContext::new().forbidden(AUDIT_FORBIDDEN)
}

fn apply_filters(query: Query, filters: &AuditFilters) -> Query {
    query
        .push_opt("usuario_admin", filters.usuario_admin)
        .push_opt("accion", filters.accion.as_deref())
        .push_opt("tipo_objetivo", filters.tipo_objetivo.as_deref())
        .push_opt("id_objetivo", filters.id_objetivo)
        .push_opt("fecha_inicio", filters.fecha_inicio.as_deref())
        .push_opt("fecha_fin", filters.fecha_fin.as_deref())
}

/// Audit log (`/bitacora`) endpoints.
#[derive(Debug, Clone)]
pub struct AuditClient {
    exec: RequestExecutor,
}

impl AuditClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    pub async fn query(&self, filters: &AuditFilters, page: Page) -> ApiResult<AuditPage> {
        let query: Query = apply_filters(page.query()?, filters);
        self.exec
            .get(&format!("{}/auditoria", BASE), &query, &audit_ctx())
            .await
    }

    /// Activity statistics over the last `days` days.
    pub async fn statistics(&self, days: Option<u32>) -> ApiResult<Value> {
        let query = Query::new().push("dias", days.unwrap_or(DEFAULT_STATS_DAYS));
        self.exec
            .get(&format!("{}/auditoria/estadisticas", BASE), &query, &audit_ctx())
            .await
    }

    pub async fn action_types(&self) -> ApiResult<Vec<String>> {
        let types: ActionTypes = self
            .exec
            .get(&format!("{}/auditoria/acciones", BASE), &Query::new(), &audit_ctx())
            .await?;
        Ok(types.acciones)
    }

    /// Raw export file in the requested format.
    pub async fn export(&self, filters: &AuditFilters, format: ExportFormat) -> ApiResult<Bytes> {
        let query: Query = apply_filters(Query::new(), filters).push("formato", format);
        self.exec
            .get_bytes(&format!("{}/auditoria/exportar", BASE), &query, &audit_ctx())
            .await
    }

    pub async fn login_logs(&self) -> ApiResult<Vec<LoginLog>> {
        let logs: Option<LoginLogs> = self
            .exec
            .get(&format!("{}/login-logs", BASE), &Query::new(), &audit_ctx())
            .await?;
        Ok(logs.map(|l| l.logs).unwrap_or_default())
    }
}

use serde_json::Value;
use shared::types::{CodigoEsquela, CodigoEsquelaInput, CodigoTipo};
use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor};

const BASE: &str = "/codigos-esquelas/";

const CODE_NOT_FOUND: &str = "conduct code not found";
const CODE_CONFLICT: &str = "a conduct code with this code already exists";

/// Catalogue of conduct codes used by conduct notes.
#[derive(Debug, Clone)]
pub struct CodesClient {
    exec: RequestExecutor,
}

impl CodesClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    pub async fn list(&self, tipo: Option<CodigoTipo>) -> ApiResult<Vec<CodigoEsquela>> {
        let query = Query::new().push_opt("tipo", tipo);
        self.exec
            .get_list(BASE, &query, &ErrorContext::new())
            .await
    }

    pub async fn get(&self, id: i64) -> ApiResult<CodigoEsquela> {
        let ctx = ErrorContext::new().not_found(CODE_NOT_FOUND);
        self.exec
            .get(&format!("{}{}", BASE, id), &Query::new(), &ctx)
            .await
    }

    pub async fn create(&self, data: &CodigoEsquelaInput) -> ApiResult<CodigoEsquela> {
        let ctx = ErrorContext::new().conflict(CODE_CONFLICT);
        self.exec.post(BASE, data, &ctx).await
    }

    pub async fn update(&self, id: i64, data: &CodigoEsquelaInput) -> ApiResult<CodigoEsquela> {
        let ctx = ErrorContext::new()
            .not_found(CODE_NOT_FOUND)
            .conflict(CODE_CONFLICT);
        self.exec.put(&format!("{}{}", BASE, id), data, &ctx).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let ctx = ErrorContext::new().not_found(CODE_NOT_FOUND);
        let _: Value = self.exec.delete(&format!("{}{}", BASE, id), &ctx).await?;
        debug!("Conduct code {} deleted", id);
        Ok(())
    }
}

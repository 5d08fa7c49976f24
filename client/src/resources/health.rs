use serde_json::Value;

use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor};

/// Liveness and status endpoints. Neither needs a session.
#[derive(Debug, Clone)]
pub struct HealthClient {
    exec: RequestExecutor,
}

impl HealthClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    pub async fn check(&self) -> ApiResult<String> {
        self.exec
            .get("/health", &Query::new(), &ErrorContext::new())
            .await
    }

    pub async fn status(&self) -> ApiResult<Value> {
        self.exec
            .get("/status", &Query::new(), &ErrorContext::new())
            .await
    }
}

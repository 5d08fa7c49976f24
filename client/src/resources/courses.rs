use serde_json::Value;

use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor};

const BASE: &str = "/courses/";

const COURSE_NOT_FOUND: &str = "course not found";

/// `/courses/` endpoints. Course payloads are returned as JSON.
#[derive(Debug, Clone)]
pub struct CoursesClient {
    exec: RequestExecutor,
}

impl CoursesClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    pub async fn list(&self) -> ApiResult<Vec<Value>> {
        self.exec
            .get_list(BASE, &Query::new(), &ErrorContext::new())
            .await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Value> {
        let ctx = ErrorContext::new().not_found(COURSE_NOT_FOUND);
        self.exec
            .get(&format!("{}{}", BASE, id), &Query::new(), &ctx)
            .await
    }

    /// Courses taught by one teacher.
    pub async fn teacher_courses(&self, teacher_id: i64) -> ApiResult<Vec<Value>> {
        self.exec
            .get_list(
                &format!("{}mis_cursos/{}", BASE, teacher_id),
                &Query::new(),
                &ErrorContext::new(),
            )
            .await
    }

    pub async fn students(&self, id: i64, filters: &Query) -> ApiResult<Vec<Value>> {
        let ctx = ErrorContext::new().not_found(COURSE_NOT_FOUND);
        self.exec
            .get_list(&format!("{}{}/students", BASE, id), filters, &ctx)
            .await
    }

    pub async fn teachers(&self, id: i64, filters: &Query) -> ApiResult<Vec<Value>> {
        let ctx = ErrorContext::new().not_found(COURSE_NOT_FOUND);
        self.exec
            .get_list(&format!("{}{}/teachers", BASE, id), filters, &ctx)
            .await
    }
}

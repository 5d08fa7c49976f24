use serde_json::Value;
use shared::types::{DEFAULT_GROUP_BY, Esquela, EsquelaCreate};
use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor};

const BASE: &str = "/esquelas/";

const ESQUELA_NOT_FOUND: &str = "conduct note not found";
const STUDENT_NOT_FOUND: &str = "student not found";

fn item_path(id: i64) -> String {
    format!("{}{}", BASE, id)
}

fn period_query(group_by: Option<&str>) -> Query {
    Query::new().push("group_by", group_by.unwrap_or(DEFAULT_GROUP_BY))
}

/// Conduct notes (`/esquelas/`) and their aggregates.
#[derive(Debug, Clone)]
pub struct EsquelasClient {
    exec: RequestExecutor,
}

impl EsquelasClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    /// Filters are passed through untouched.
    pub async fn list(&self, filters: &Query) -> ApiResult<Vec<Esquela>> {
        self.exec
            .get_list(BASE, filters, &ErrorContext::new())
            .await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Esquela> {
        let ctx = ErrorContext::new().not_found(ESQUELA_NOT_FOUND);
        self.exec.get(&item_path(id), &Query::new(), &ctx).await
    }

    pub async fn create(&self, data: &EsquelaCreate) -> ApiResult<Esquela> {
        let created: Esquela = self.exec.post(BASE, data, &ErrorContext::new()).await?;
        debug!(
            "Conduct note {} created for student {}",
            created.id_esquela, data.id_estudiante
        );
        Ok(created)
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let ctx = ErrorContext::new().not_found(ESQUELA_NOT_FOUND);
        let _: Value = self.exec.delete(&item_path(id), &ctx).await?;
        debug!("Conduct note {} deleted", id);
        Ok(())
    }

    /// Totals per course, optionally for one academic year.
    pub async fn aggregate_by_course(&self, year: Option<i32>) -> ApiResult<Value> {
        let query = Query::new().push_opt("year", year);
        self.exec
            .get(
                &format!("{}aggregate/by-course", BASE),
                &query,
                &ErrorContext::new(),
            )
            .await
    }

    /// Totals per period; `group_by` defaults to `"year"`.
    pub async fn aggregate_by_period(&self, group_by: Option<&str>) -> ApiResult<Value> {
        self.exec
            .get(
                &format!("{}aggregate/by-period", BASE),
                &period_query(group_by),
                &ErrorContext::new(),
            )
            .await
    }

    /// Notes of one student.
    pub async fn for_student(&self, student_id: i64, filters: &Query) -> ApiResult<Vec<Esquela>> {
        let ctx = ErrorContext::new().not_found(STUDENT_NOT_FOUND);
        self.exec
            .get_list(&format!("/students/{}/esquelas", student_id), filters, &ctx)
            .await
    }
}

use serde_json::Value;
use shared::types::ReportFilters;

use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor};

const BASE: &str = "/reports/students";
const RANKING: &str = "/reports/ranking";

fn report_query(filters: &ReportFilters) -> Query {
    Query::new()
        .push_opt("curso_id", filters.curso_id)
        .push_opt("nivel", filters.nivel)
        .push_opt("gestion", filters.gestion.as_deref())
}

/// Student reports. Payloads are report tables owned by the backend and
/// returned as JSON.
#[derive(Debug, Clone)]
pub struct ReportsClient {
    exec: RequestExecutor,
}

impl ReportsClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    async fn fetch(&self, path: &str, query: Query) -> ApiResult<Value> {
        self.exec.get(path, &query, &ErrorContext::new()).await
    }

    pub async fn students(&self, filters: &ReportFilters) -> ApiResult<Value> {
        self.fetch(BASE, report_query(filters)).await
    }

    /// Students with (`Some(true)`) or without (`Some(false)`) registered
    /// guardians; `None` lists everyone.
    pub async fn students_by_guardians(&self, with_guardians: Option<bool>) -> ApiResult<Value> {
        let query = Query::new().push_opt("con_apoderados", with_guardians);
        self.fetch(&format!("{}/guardians", BASE), query).await
    }

    pub async fn guardian_contacts(&self, filters: &ReportFilters) -> ApiResult<Value> {
        self.fetch(&format!("{}/guardian-contacts", BASE), report_query(filters))
            .await
    }

    pub async fn age_distribution(&self, filters: &ReportFilters) -> ApiResult<Value> {
        self.fetch(&format!("{}/age-distribution", BASE), report_query(filters))
            .await
    }

    pub async fn course_history(&self, student_id: Option<i64>) -> ApiResult<Value> {
        let query = Query::new().push_opt("estudiante_id", student_id);
        self.fetch(&format!("{}/course-history", BASE), query).await
    }

    /// Conduct ranking. Filters are passed through untouched.
    pub async fn ranking(&self, filters: &Query) -> ApiResult<Value> {
        self.fetch(RANKING, filters.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::types::SchoolLevel;

    #[test]
    fn unset_filters_are_omitted() {
        let filters = ReportFilters {
            nivel: Some(SchoolLevel::Primaria),
            ..ReportFilters::default()
        };
        assert_eq!(report_query(&filters).encode(), "nivel=primaria");
        assert!(report_query(&ReportFilters::default()).is_empty());
    }
}

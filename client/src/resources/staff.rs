use serde::de::DeserializeOwned;
use shared::types::{Person, Student};

use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor};

const STUDENTS: &str = "/estudiantes/";
const TEACHERS: &str = "/profesores/";
const REGISTRARS: &str = "/registradores/";

/// Read-only school directories: students, teachers and registrars.
#[derive(Debug, Clone)]
pub struct StaffClient {
    exec: RequestExecutor,
}

impl StaffClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    async fn one<T: DeserializeOwned>(
        &self,
        base: &str,
        id: i64,
        missing: &'static str,
    ) -> ApiResult<T> {
        let ctx = ErrorContext::new().not_found(missing);
        self.exec
            .get(&format!("{}{}", base, id), &Query::new(), &ctx)
            .await
    }

    pub async fn students(&self) -> ApiResult<Vec<Student>> {
        self.exec
            .get_list(STUDENTS, &Query::new(), &ErrorContext::new())
            .await
    }

    pub async fn student(&self, id: i64) -> ApiResult<Student> {
        self.one(STUDENTS, id, "student not found").await
    }

    pub async fn teachers(&self) -> ApiResult<Vec<Person>> {
        self.exec
            .get_list(TEACHERS, &Query::new(), &ErrorContext::new())
            .await
    }

    pub async fn teacher(&self, id: i64) -> ApiResult<Person> {
        self.one(TEACHERS, id, "teacher not found").await
    }

    pub async fn registrars(&self) -> ApiResult<Vec<Person>> {
        self.exec
            .get_list(REGISTRARS, &Query::new(), &ErrorContext::new())
            .await
    }

    pub async fn registrar(&self, id: i64) -> ApiResult<Person> {
        self.one(REGISTRARS, id, "registrar not found").await
    }
}

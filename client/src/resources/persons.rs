use serde_json::Value;
use shared::types::{Person, PersonFilters, PersonKind, PersonPage};

use crate::cancel::CancelToken;
use crate::error::ApiResult;
use crate::http::{ErrorContext, Query, RequestExecutor, encode_segment};

const BASE: &str = "/auth/personas";

/// Page size used when the caller gives no filters at all.
pub const DEFAULT_LIMIT: u32 = 80;

const PERSON_NOT_FOUND: &str = "person not found";

/// `/auth/personas` endpoints (staff records that can hold an account).
#[derive(Debug, Clone)]
pub struct PersonsClient {
    exec: RequestExecutor,
}

impl PersonsClient {
    pub fn new(exec: RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::new(self.exec.with_cancel(token))
    }

    pub async fn list(&self, filters: Option<&PersonFilters>) -> ApiResult<PersonPage> {
        let query: Query = match filters {
            Some(f) => {
                if let Some(limit) = f.limit {
                    super::Page::new(f.skip.unwrap_or(0), limit).validate()?;
                }
                Query::new()
                    .push_opt("tipo_persona", f.tipo_persona)
                    .push_opt("skip", f.skip)
                    .push_opt("limit", f.limit)
            }
            None => Query::new().push("skip", 0).push("limit", DEFAULT_LIMIT),
        };
        self.exec.get(BASE, &query, &ErrorContext::new()).await
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

    /// Look up a person by national id number.
    pub async fn find_by_ci(&self, ci: &str) -> ApiResult<Person> {
        let ctx = ErrorContext::new().not_found(format!("no person found with CI {}", ci));
        self.exec
            .get(
                &format!("{}/buscar/ci/{}", BASE, encode_segment(ci)),
                &Query::new(),
                &ctx,
            )
            .await
    }

    pub async fn list_by_kind(&self, kind: PersonKind) -> ApiResult<Vec<Person>> {
        self.exec
            .get_list(
                &format!("{}/tipo/{}", BASE, kind),
                &Query::new(),
                &ErrorContext::new(),
            )
            .await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Person> {
        let ctx = ErrorContext::new().not_found(PERSON_NOT_FOUND);
        self.exec
            .get(&format!("{}/{}", BASE, id), &Query::new(), &ctx)
            .await
    }
}

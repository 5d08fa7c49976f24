//! One client per backend resource. Each is a thin, stateless composition of
//! the request executor and the decoder with its own paths and messages.

pub mod audit;
pub mod auth;
pub mod codes;
pub mod courses;
pub mod esquelas;
pub mod health;
pub mod permissions;
pub mod persons;
pub mod reports;
pub mod roles;
pub mod staff;
pub mod users;

pub use self::audit::AuditClient;
pub use self::auth::AuthClient;
pub use self::codes::CodesClient;
pub use self::courses::CoursesClient;
pub use self::esquelas::EsquelasClient;
pub use self::health::HealthClient;
pub use self::permissions::PermissionsClient;
pub use self::persons::PersonsClient;
pub use self::reports::ReportsClient;
pub use self::roles::RolesClient;
pub use self::staff::StaffClient;
pub use self::users::UsersClient;

use crate::error::{ApiError, ApiResult};
use crate::http::Query;

pub const MAX_LIMIT: u32 = 1000;

/// `skip`/`limit` pair sent with list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub const fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(ApiError::InvalidRequest(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, self.limit
            )));
        }
        Ok(())
    }

    /// Validated `skip`/`limit` query, ready for further filters.
    pub fn query(&self) -> ApiResult<Query> {
        self.validate()?;
        Ok(Query::new()
            .push("skip", self.skip)
            .push("limit", self.limit))
    }
}

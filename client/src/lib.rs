//! Data-access layer for the school administration backend.
//!
//! A [`RequestExecutor`](http::RequestExecutor) sends JSON requests carrying
//! the bearer token held by a [`CredentialStore`](credentials::CredentialStore);
//! the [`decoder`](http::decoder) unwraps the `{success, message, data}`
//! envelope or classifies the failure; resource clients compose the two per
//! endpoint; the [`SessionController`](session::SessionController) owns the
//! login lifecycle; [`AdminStore`](store::AdminStore) caches lists for the
//! admin screens.

pub mod api;
pub mod cancel;
pub mod credentials;
pub mod error;
pub mod http;
pub mod resources;
pub mod session;
pub mod store;

pub use api::AdminApi;
pub use cancel::CancelToken;
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError};
pub use error::{ApiError, ApiResult, FieldError};
pub use session::{AuthEvent, Profile, SessionController, SessionHandle, SessionStatus};

//! Error taxonomy shared by every resource client.
//!
//! Each variant maps to one way a call can end without a usable payload.
//! Status-derived variants are produced by the envelope decoder; transport
//! variants by the request executor.

use std::time::Duration;

use thiserror::Error;

use crate::credentials::StoreError;

pub const SESSION_EXPIRED_MESSAGE: &str = "session expired, please log in again";
pub const FORBIDDEN_MESSAGE: &str = "insufficient permissions for this operation";
pub const NOT_FOUND_MESSAGE: &str = "resource not found";
pub const CONFLICT_MESSAGE: &str = "a record with this name or code already exists";
pub const CONNECTION_MESSAGE: &str = "connection error, check your network connection";

/// One field-level problem reported by a 422 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (DNS, connect, reset, unreadable body).
    #[error("{CONNECTION_MESSAGE}: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    /// HTTP 401. The session has already been cleared when this is returned.
    #[error("{0}")]
    SessionExpired(String),

    /// HTTP 403.
    #[error("{0}")]
    Forbidden(String),

    /// HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// HTTP 409 on create/update.
    #[error("{0}")]
    Conflict(String),

    /// HTTP 422. `message` is the flattened `field: msg, ...` line.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// Any other non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A 2xx body that is not JSON or does not fit the expected record.
    #[error("invalid response from server: {0}")]
    InvalidResponse(String),

    /// Rejected before anything was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The credential store could not persist the token or profile.
    #[error("{0}")]
    Storage(#[from] StoreError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status that produced this error, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::SessionExpired(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::Validation { .. } => Some(422),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(_)
            | ApiError::Timeout(_)
            | ApiError::Cancelled
            | ApiError::InvalidResponse(_)
            | ApiError::InvalidRequest(_)
            | ApiError::Storage(_) => None,
        }
    }

    /// User-facing message.
    pub fn message(&self) -> String {
        match self {
            ApiError::SessionExpired(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m) => m.clone(),
            ApiError::Validation { message, .. } | ApiError::Http { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::SessionExpired("x".into()).status(), Some(401));
        assert_eq!(ApiError::Forbidden("x".into()).status(), Some(403));
        assert_eq!(ApiError::NotFound("x".into()).status(), Some(404));
        assert_eq!(ApiError::Conflict("x".into()).status(), Some(409));
        assert_eq!(
            ApiError::Validation {
                message: "x".into(),
                errors: vec![]
            }
            .status(),
            Some(422)
        );
        assert_eq!(
            ApiError::Http {
                status: 503,
                message: "x".into()
            }
            .status(),
            Some(503)
        );
        assert_eq!(ApiError::Network("refused".into()).status(), None);
        assert_eq!(ApiError::Cancelled.status(), None);
    }

    #[test]
    fn message_is_display_for_status_errors() {
        let e = ApiError::NotFound("role not found".into());
        assert_eq!(e.message(), "role not found");
        assert_eq!(e.to_string(), "role not found");
    }

    #[test]
    fn network_message_mentions_connection() {
        let e = ApiError::Network("connection refused".into());
        assert!(e.message().starts_with(CONNECTION_MESSAGE));
    }
}

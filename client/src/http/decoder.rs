//! Response classification.
//!
//! Non-2xx statuses become an [`ApiError`] variant; 2xx bodies are parsed as
//! JSON and unwrapped from the success envelope when they carry one. Error
//! bodies that fail to parse never surface a secondary parse error.

use std::borrow::Cow;

use bytes::Bytes;
use hyper::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::types::{ErrorBody, ErrorDetail, ResponseShape};
use tracing::debug;

use crate::error::{
    ApiError, ApiResult, FORBIDDEN_MESSAGE, FieldError, NOT_FOUND_MESSAGE, SESSION_EXPIRED_MESSAGE,
};

const VALIDATION_FALLBACK: &str = "validation error";

/// Resource-specific wording for 403/404/409.
///
/// 409 is classified as [`ApiError::Conflict`] only when a conflict message
/// is set; create and update calls set one, everything else leaves it off.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    forbidden: Option<Cow<'static, str>>,
    not_found: Option<Cow<'static, str>>,
    conflict: Option<Cow<'static, str>>,
}

impl ErrorContext {
    pub const fn new() -> Self {
        Self {
            forbidden: None,
            not_found: None,
            conflict: None,
        }
    }

    pub fn forbidden(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.forbidden = Some(message.into());
        self
    }

    pub fn not_found(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.not_found = Some(message.into());
        self
    }

    pub fn conflict(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.conflict = Some(message.into());
        self
    }

    pub fn handles_conflict(&self) -> bool {
        self.conflict.is_some()
    }
}

/// Map a non-2xx response to its error.
pub fn classify(status: StatusCode, body: &[u8], ctx: &ErrorContext) -> ApiError {
    let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();
    let server: Option<String> = parsed.as_ref().and_then(ErrorBody::server_message);

    match status.as_u16() {
        401 => ApiError::SessionExpired(server.unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.into())),
        403 => ApiError::Forbidden(
            ctx.forbidden
                .as_ref()
                .map(|m| m.to_string())
                .or(server)
                .unwrap_or_else(|| FORBIDDEN_MESSAGE.into()),
        ),
        404 => ApiError::NotFound(
            ctx.not_found
                .as_ref()
                .map(|m| m.to_string())
                .or(server)
                .unwrap_or_else(|| NOT_FOUND_MESSAGE.into()),
        ),
        409 if ctx.handles_conflict() => ApiError::Conflict(
            server
                .or_else(|| ctx.conflict.as_ref().map(|m| m.to_string()))
                .unwrap_or_default(),
        ),
        422 => validation_error(parsed, server),
        code => ApiError::Http {
            status: code,
            message: server.unwrap_or_else(|| status_text(status)),
        },
    }
}

fn validation_error(parsed: Option<ErrorBody>, server: Option<String>) -> ApiError {
    let detail: Option<ErrorDetail> = parsed.and_then(|b| b.detail);

    match detail {
        Some(ErrorDetail::Fields(items)) => {
            let message: String = ErrorDetail::Fields(items.clone()).flatten();
            let errors: Vec<FieldError> = items
                .into_iter()
                .map(|item| FieldError {
                    field: item.field_path(),
                    message: item.msg,
                })
                .collect();
            ApiError::Validation { message, errors }
        }
        Some(other) => ApiError::Validation {
            message: other.flatten(),
            errors: Vec::new(),
        },
        None => ApiError::Validation {
            message: server.unwrap_or_else(|| VALIDATION_FALLBACK.into()),
            errors: Vec::new(),
        },
    }
}

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

/// Parse a 2xx body and unwrap the envelope. An empty body is `null`.
pub fn unwrap_payload(body: &[u8]) -> ApiResult<Value> {
    let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?
    };

    match ResponseShape::from_value(value) {
        ResponseShape::Envelope { data, .. } => Ok(data),
        ResponseShape::LegacyRaw(raw) => {
            debug!("Response without a successful envelope, using body as-is");
            Ok(raw)
        }
    }
}

pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8], ctx: &ErrorContext) -> ApiResult<T> {
    if !status.is_success() {
        return Err(classify(status, body, ctx));
    }

    let payload: Value = unwrap_payload(body)?;
    serde_json::from_value(payload).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Like [`decode`] but a `null` payload becomes an empty list.
pub fn decode_list<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
    ctx: &ErrorContext,
) -> ApiResult<Vec<T>> {
    let items: Option<Vec<T>> = decode(status, body, ctx)?;
    Ok(items.unwrap_or_default())
}

/// Status check only; the body is returned untouched.
pub fn decode_bytes(status: StatusCode, body: Bytes, ctx: &ErrorContext) -> ApiResult<Bytes> {
    if !status.is_success() {
        return Err(classify(status, &body, ctx));
    }
    Ok(body)
}

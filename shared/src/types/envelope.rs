use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Success envelope
// ---------------------------------------------------------------------------

/// Standard success wrapper used by most backend endpoints:
/// `{"success": true, "message": "...", "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// The two body shapes a 2xx response can take.
///
/// Endpoints are not consistent: most wrap their payload in an [`Envelope`],
/// a few return the bare array or object. The shape is decided once, here,
/// instead of probing fields at every call site.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `success` was `true` and a `data` key was present.
    Envelope { message: Option<String>, data: Value },
    /// Anything else, kept exactly as parsed. This includes an envelope
    /// whose `success` is `false`.
    LegacyRaw(Value),
}

impl ResponseShape {
    /// Classify a parsed body. An object is an envelope only when `success`
    /// is `true` and a `data` key is present (a `null` data still counts).
    pub fn from_value(value: Value) -> Self {
        let is_envelope: bool = value.as_object().is_some_and(|obj| {
            obj.get("success") == Some(&Value::Bool(true)) && obj.contains_key("data")
        });

        match value {
            Value::Object(mut obj) if is_envelope => {
                let message = obj
                    .remove("message")
                    .and_then(|m| m.as_str().map(str::to_owned));
                let data = obj.remove("data").unwrap_or(Value::Null);

                Self::Envelope { message, data }
            }
            other => Self::LegacyRaw(other),
        }
    }

    pub fn is_envelope(&self) -> bool {
        matches!(self, Self::Envelope { .. })
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard error body returned by the backend.
///
/// `detail` is either a plain message or, for request validation failures
/// (HTTP 422), a list of per-field problems. Some endpoints send `message`
/// instead of `detail`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    Fields(Vec<ValidationItem>),
    Other(Value),
}

/// One entry of a 422 `detail` array: `{"loc": [...], "msg": "...", "type": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationItem {
    #[serde(default)]
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A location segment is a field name or a list index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Key(String),
    Index(i64),
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Key(k) => write!(f, "{}", k),
            LocSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

impl ValidationItem {
    /// Dotted field path, e.g. `body.usuario`. Falls back to `field` when the
    /// server sent no location.
    pub fn field_path(&self) -> String {
        if self.loc.is_empty() {
            return "field".to_string();
        }
        self.loc
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl ErrorDetail {
    /// Human-readable single line.
    ///
    /// Field lists become `field: msg` pairs joined with `", "` in server
    /// order; a text detail is returned verbatim; anything else is rendered
    /// as its raw JSON.
    pub fn flatten(&self) -> String {
        match self {
            ErrorDetail::Text(text) => text.clone(),
            ErrorDetail::Fields(items) => items
                .iter()
                .map(|item| format!("{}: {}", item.field_path(), item.msg))
                .collect::<Vec<_>>()
                .join(", "),
            ErrorDetail::Other(raw) => raw.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ErrorDetail::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl ErrorBody {
    /// The server-supplied message: `detail` first, then `message`.
    pub fn server_message(&self) -> Option<String> {
        self.detail
            .as_ref()
            .map(ErrorDetail::flatten)
            .or_else(|| self.message.clone())
            .filter(|m| !m.is_empty())
    }
}

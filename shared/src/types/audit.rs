use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optional filters for `GET /bitacora/auditoria` and its export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilters {
    #[serde(default)]
    pub usuario_admin: Option<i64>,
    #[serde(default)]
    pub accion: Option<String>,
    #[serde(default)]
    pub tipo_objetivo: Option<String>,
    #[serde(default)]
    pub id_objetivo: Option<i64>,
    /// ISO date, inclusive.
    #[serde(default)]
    pub fecha_inicio: Option<String>,
    #[serde(default)]
    pub fecha_fin: Option<String>,
}

/// One audit log record. The backend owns the column set; only the id is
/// relied upon client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(default, alias = "id")]
    pub id_bitacora: Option<i64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A page of audit records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditPage {
    #[serde(default, alias = "items")]
    pub registros: Vec<AuditEntry>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `data` of `GET /bitacora/auditoria/acciones`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionTypes {
    #[serde(default)]
    pub acciones: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
        }
    }
}

// ---------------------------------------------------------------------------
// Login logs
// ---------------------------------------------------------------------------

/// Outcome recorded for a successful login attempt.
pub const LOGIN_SUCCEEDED: &str = "exitoso";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginLog {
    pub id_log: i64,
    #[serde(default)]
    pub usuario_id: Option<i64>,
    pub fecha_hora: String,
    pub estado: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl LoginLog {
    pub fn succeeded(&self) -> bool {
        self.estado == LOGIN_SUCCEEDED
    }
}

/// `data` of `GET /bitacora/login-logs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginLogs {
    #[serde(default)]
    pub logs: Vec<LoginLog>,
}

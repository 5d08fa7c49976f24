use std::fmt;

use serde::{Deserialize, Serialize};

/// School level filter accepted by the academic report endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolLevel {
    Inicial,
    Primaria,
    Secundaria,
}

impl fmt::Display for SchoolLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchoolLevel::Inicial => write!(f, "inicial"),
            SchoolLevel::Primaria => write!(f, "primaria"),
            SchoolLevel::Secundaria => write!(f, "secundaria"),
        }
    }
}

/// Common filters of the student reports. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilters {
    #[serde(default)]
    pub curso_id: Option<i64>,
    #[serde(default)]
    pub nivel: Option<SchoolLevel>,
    /// Academic year, e.g. `"2024"`.
    #[serde(default)]
    pub gestion: Option<String>,
}

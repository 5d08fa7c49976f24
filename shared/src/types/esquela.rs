use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Grouping used by the per-period aggregate when the caller names none.
pub const DEFAULT_GROUP_BY: &str = "year";

/// Category of a conduct code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodigoTipo {
    Reconocimiento,
    Orientacion,
}

impl fmt::Display for CodigoTipo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodigoTipo::Reconocimiento => write!(f, "reconocimiento"),
            CodigoTipo::Orientacion => write!(f, "orientacion"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodigoEsquela {
    pub id_codigo: i64,
    pub tipo: CodigoTipo,
    pub codigo: String,
    pub descripcion: String,
}

/// Body of code create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodigoEsquelaInput {
    pub tipo: CodigoTipo,
    pub codigo: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsquelaStudent {
    pub id_estudiante: i64,
    #[serde(default)]
    pub nombres: Option<String>,
    #[serde(default)]
    pub apellido_paterno: Option<String>,
    #[serde(default)]
    pub apellido_materno: Option<String>,
    #[serde(default)]
    pub ci: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsquelaCourse {
    pub id_curso: i64,
    #[serde(default)]
    pub nombre_curso: Option<String>,
    #[serde(default)]
    pub grado: Option<String>,
    #[serde(default)]
    pub paralelo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsquelaTeacher {
    pub id_persona: i64,
    #[serde(default)]
    pub nombre_completo: Option<String>,
}

/// A conduct note as listed by `/esquelas/`. The nested records are present
/// only when the backend joins them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Esquela {
    pub id_esquela: i64,
    pub fecha: String,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub codigos: Vec<CodigoEsquela>,
    #[serde(default)]
    pub estudiante: Option<EsquelaStudent>,
    #[serde(default)]
    pub curso: Option<EsquelaCourse>,
    #[serde(default)]
    pub profesor: Option<EsquelaTeacher>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /esquelas/`. `codigos` holds code ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsquelaCreate {
    pub id_estudiante: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_profesor: Option<i64>,
    pub fecha: String,
    #[serde(default)]
    pub observaciones: Option<String>,
    pub codigos: Vec<i64>,
}

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Staff categories that can hold an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Profesor,
    Administrativo,
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonKind::Profesor => write!(f, "profesor"),
            PersonKind::Administrativo => write!(f, "administrativo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id_persona: i64,
    #[serde(default)]
    pub ci: Option<String>,
    #[serde(default)]
    pub nombres: Option<String>,
    #[serde(default)]
    pub apellido_paterno: Option<String>,
    #[serde(default)]
    pub apellido_materno: Option<String>,
    #[serde(default)]
    pub nombre_completo: Option<String>,
    #[serde(default)]
    pub tipo_persona: Option<String>,
    #[serde(default)]
    pub correo: Option<String>,
    #[serde(default)]
    pub tiene_usuario: Option<bool>,
    #[serde(default)]
    pub id_usuario: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for `GET /auth/personas`. When no filters are given at all the
/// client asks for the first 80 records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonFilters {
    #[serde(default)]
    pub tipo_persona: Option<PersonKind>,
    #[serde(default)]
    pub skip: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonPage {
    #[serde(default)]
    pub items: Vec<Person>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

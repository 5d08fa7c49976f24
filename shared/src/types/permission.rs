use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The CRUD verb a permission grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Crear,
    Leer,
    Actualizar,
    Eliminar,
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionAction::Crear => "crear",
            PermissionAction::Leer => "leer",
            PermissionAction::Actualizar => "actualizar",
            PermissionAction::Eliminar => "eliminar",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id_permiso: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub modulo: Option<String>,
    #[serde(default)]
    pub codigo: Option<String>,
    /// Kept as text: the backend may hold actions outside [`PermissionAction`].
    #[serde(default)]
    pub accion: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /auth/permisos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionInput {
    pub nombre: String,
    pub descripcion: String,
    pub modulo: String,
    pub codigo: String,
    pub accion: PermissionAction,
}

/// Body of `PUT /auth/permisos/{id}`; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accion: Option<PermissionAction>,
}

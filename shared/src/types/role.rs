use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NO_DESCRIPTION: &str = "No description";

/// A role as displayed by the admin screens.
///
/// The backend is loose about this record (`id` vs `id_rol`, optional
/// counters, camelCase counters), so it is normalized once on the way in.
/// It serializes with the wire spellings so a cached role reads back intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RoleWire")]
pub struct Role {
    pub id_rol: i64,
    pub nombre: String,
    pub descripcion: String,
    pub is_active: bool,
    pub permisos: Vec<Value>,
    #[serde(rename(serialize = "usuariosCount"))]
    pub usuarios_count: u64,
    #[serde(rename(serialize = "permisosCount"))]
    pub permisos_count: u64,
    #[serde(rename(serialize = "fechaCreacion"))]
    pub fecha_creacion: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RoleWire {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    id_rol: Option<i64>,
    nombre: String,
    #[serde(default)]
    descripcion: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default)]
    permisos: Option<Vec<Value>>,
    #[serde(rename = "usuariosCount", default)]
    usuarios_count: Option<u64>,
    #[serde(rename = "permisosCount", default)]
    permisos_count: Option<u64>,
    #[serde(rename = "fechaCreacion", default)]
    fecha_creacion: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RoleWire> for Role {
    type Error = String;

    fn try_from(wire: RoleWire) -> Result<Self, Self::Error> {
        let id_rol = wire
            .id
            .or(wire.id_rol)
            .ok_or_else(|| format!("role '{}' has neither id nor id_rol", wire.nombre))?;

        let permisos = wire.permisos.unwrap_or_default();
        let permisos_count = wire
            .permisos_count
            .filter(|c| *c > 0)
            .unwrap_or(permisos.len() as u64);

        Ok(Self {
            id_rol,
            nombre: wire.nombre,
            descripcion: wire
                .descripcion
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            is_active: wire.is_active.unwrap_or(true),
            permisos,
            usuarios_count: wire.usuarios_count.unwrap_or(0),
            permisos_count,
            fecha_creacion: wire.created_at.or(wire.fecha_creacion),
            extra: wire.extra,
        })
    }
}

/// Body of role create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleInput {
    pub nombre: String,
    pub descripcion: String,
}

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Login wire types
// ---------------------------------------------------------------------------

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub usuario: String,
    pub password: String,
}

/// `data` of a successful login envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub usuario_id: i64,
    pub usuario: String,
    #[serde(default)]
    pub nombres: String,
    #[serde(default)]
    pub rol: String,
    #[serde(default)]
    pub permisos: Vec<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// `data` of `GET /auth/me`. Everything but the id and username is optional
/// on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id_usuario: i64,
    pub usuario: String,
    #[serde(default)]
    pub nombres: Option<String>,
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default)]
    pub permisos: Option<Vec<String>>,
}

/// `data` of `GET /auth/mis-permisos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailedPermissions {
    /// Detailed permission records; shape is owned by the backend.
    #[serde(default)]
    pub permisos: Vec<Value>,
    #[serde(default)]
    pub permisos_por_modulo: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub modulos_accesibles: Vec<String>,
    #[serde(default)]
    pub acciones_disponibles: Vec<String>,
    #[serde(default)]
    pub es_administrador: bool,
}

/// `data` of `POST /auth/refresh`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshPayload {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for LoginPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "usuario_id={}, usuario={}, rol={}, permisos={}",
            self.usuario_id,
            self.usuario,
            self.rol,
            self.permisos.len()
        )
    }
}

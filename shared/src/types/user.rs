use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_active() -> bool {
    true
}

/// A user account as listed by `GET /auth/usuarios`.
///
/// Unknown fields are kept in `extra` so the record can be shown verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id_usuario: i64,
    #[serde(default)]
    pub id_persona: Option<i64>,
    pub usuario: String,
    #[serde(default)]
    pub correo: Option<String>,
    /// Missing on older endpoints; shown as active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub roles: Vec<Value>,
    #[serde(default)]
    pub ultimo_acceso: Option<String>,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /auth/usuarios`. The backend generates the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub id_persona: i64,
    pub usuario: String,
    pub correo: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl UserCreate {
    pub fn new(id_persona: i64, usuario: impl Into<String>, correo: impl Into<String>) -> Self {
        Self {
            id_persona,
            usuario: usuario.into(),
            correo: correo.into(),
            is_active: true,
        }
    }
}

/// Body of `PUT /auth/usuarios/{id}`; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usuario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Credentials returned once, right after an account is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserCredentials {
    #[serde(default)]
    pub id_usuario: Option<i64>,
    pub usuario: String,
    #[serde(default)]
    pub correo: Option<String>,
    #[serde(default)]
    pub password_temporal: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /auth/usuarios/cambiar-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordData {
    pub password_actual: String,
    pub password_nueva: String,
}

/// Result of an administrator password reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordReset {
    pub usuario: String,
    pub nueva_password_temporal: String,
    #[serde(default)]
    pub mensaje: String,
}

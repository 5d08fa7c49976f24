use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::types::{CurrentUser, DetailedPermissions, LoginPayload};

/// Role shown when the identity endpoint omits one.
pub const DEFAULT_ROLE: &str = "Usuario";

/// The signed-in user, as cached client-side.
///
/// Replaced wholesale on login and verify. The only partial update is
/// [`Profile::merge_detailed`], applied after the basic profile is in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role_name: String,
    pub permissions: BTreeSet<String>,
    #[serde(default)]
    pub modules: BTreeSet<String>,
    #[serde(default)]
    pub actions: BTreeSet<String>,
    #[serde(default)]
    pub permissions_by_module: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub is_administrator: bool,
    #[serde(default)]
    pub detailed_permissions: Vec<Value>,
}

impl From<&LoginPayload> for Profile {
    fn from(payload: &LoginPayload) -> Self {
        Self {
            id: payload.usuario_id,
            username: payload.usuario.clone(),
            display_name: payload.nombres.clone(),
            role_name: payload.rol.clone(),
            permissions: payload.permisos.iter().cloned().collect(),
            ..Self::default()
        }
    }
}

impl From<CurrentUser> for Profile {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id_usuario,
            username: user.usuario,
            display_name: user.nombres.unwrap_or_default(),
            role_name: user
                .rol
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            permissions: user.permisos.unwrap_or_default().into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Profile {
    /// Fold the detailed permission listing into this profile. Identity
    /// fields and the flat permission codes are left alone.
    pub fn merge_detailed(&mut self, detailed: DetailedPermissions) {
        self.detailed_permissions = detailed.permisos;
        self.modules = detailed.modulos_accesibles.into_iter().collect();
        self.actions = detailed.acciones_disponibles.into_iter().collect();
        self.permissions_by_module = detailed
            .permisos_por_modulo
            .into_iter()
            .map(|(module, codes)| (module, codes.into_iter().collect()))
            .collect();
        self.is_administrator = detailed.es_administrador;
    }

    pub fn has_permission(&self, code: &str) -> bool {
        self.permissions.contains(code)
    }

    pub fn can_access_module(&self, module: &str) -> bool {
        self.is_administrator || self.modules.contains(module)
    }

    pub fn can_perform_action(&self, action: &str) -> bool {
        self.is_administrator || self.actions.contains(action)
    }

    pub fn permissions_in_module(&self, module: &str) -> BTreeSet<String> {
        self.permissions_by_module
            .get(module)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_permission_in_module(&self, module: &str, code: &str) -> bool {
        self.is_administrator
            || self
                .permissions_by_module
                .get(module)
                .is_some_and(|codes| codes.contains(code))
    }
}

/// An entry of the application menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuModule {
    pub id: &'static str,
    pub label: &'static str,
    pub route: &'static str,
}

pub const MENU: [MenuModule; 7] = [
    MenuModule {
        id: "usuarios",
        label: "Users and Roles",
        route: "usuarios",
    },
    MenuModule {
        id: "esquelas",
        label: "Notices",
        route: "esquelas",
    },
    MenuModule {
        id: "incidentes",
        label: "Incidents",
        route: "incidentes",
    },
    MenuModule {
        id: "retiros_tempranos",
        label: "Early Dismissals",
        route: "retiros",
    },
    MenuModule {
        id: "reportes",
        label: "Reports",
        route: "reportes",
    },
    MenuModule {
        id: "profesores",
        label: "Teachers",
        route: "profesores",
    },
    MenuModule {
        id: "administracion",
        label: "Administration",
        route: "administracion",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn detailed(admin: bool) -> DetailedPermissions {
        let mut by_module = HashMap::new();
        by_module.insert(
            "usuarios".to_string(),
            vec!["usuarios.leer".to_string(), "usuarios.crear".to_string()],
        );
        DetailedPermissions {
            permisos: vec![],
            permisos_por_modulo: by_module,
            modulos_accesibles: vec!["usuarios".into()],
            acciones_disponibles: vec!["leer".into()],
            es_administrador: admin,
        }
    }

    #[test]
    fn verify_payload_fills_defaults() {
        let profile = Profile::from(CurrentUser {
            id_usuario: 3,
            usuario: "ana".into(),
            nombres: None,
            rol: None,
            permisos: None,
        });
        assert_eq!(profile.role_name, DEFAULT_ROLE);
        assert!(profile.display_name.is_empty());
        assert!(profile.permissions.is_empty());
    }

    #[test]
    fn module_queries_follow_detailed_permissions() {
        let mut profile = Profile::default();
        profile.merge_detailed(detailed(false));

        assert!(profile.can_access_module("usuarios"));
        assert!(!profile.can_access_module("reportes"));
        assert!(profile.can_perform_action("leer"));
        assert!(!profile.can_perform_action("eliminar"));
        assert!(profile.has_permission_in_module("usuarios", "usuarios.crear"));
        assert!(!profile.has_permission_in_module("reportes", "reportes.leer"));
        assert_eq!(profile.permissions_in_module("usuarios").len(), 2);
        assert!(profile.permissions_in_module("reportes").is_empty());
    }

    #[test]
    fn administrator_bypasses_module_checks() {
        let mut profile = Profile::default();
        profile.merge_detailed(detailed(true));

        assert!(profile.can_access_module("reportes"));
        assert!(profile.can_perform_action("eliminar"));
        assert!(profile.has_permission_in_module("reportes", "anything"));
        // Flat codes are not widened by the administrator flag.
        assert!(!profile.has_permission("anything"));
    }
}

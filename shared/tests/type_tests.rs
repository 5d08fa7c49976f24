/// Integration-level tests for the `shared` crate.
///
/// Each section tests one module; unit tests that are tightly coupled to
/// private helpers live inside the modules themselves (see `#[cfg(test)]`
/// blocks in `envelope.rs`, `json_error.rs` and `client_config.rs`).
// ---------------------------------------------------------------------------
// Login payloads
// ---------------------------------------------------------------------------
#[cfg(test)]
mod login_tests {
    use shared::types::*;

    #[test]
    fn login_payload_accepts_minimal_body() {
        let payload: LoginPayload = serde_json::from_str(
            r#"{"access_token":"T","usuario_id":1,"usuario":"u"}"#,
        )
        .unwrap();
        assert_eq!(payload.access_token, "T");
        assert!(payload.nombres.is_empty());
        assert!(payload.permisos.is_empty());
        assert_eq!(payload.expires_in, None);
    }

    #[test]
    fn login_payload_display_hides_token() {
        let payload: LoginPayload = serde_json::from_str(
            r#"{"access_token":"secret","usuario_id":1,"usuario":"u","rol":"Admin","permisos":["x"]}"#,
        )
        .unwrap();
        let shown = payload.to_string();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("rol=Admin"));
    }

    #[test]
    fn login_data_uses_wire_names() {
        let json = serde_json::to_value(LoginData {
            usuario: "u".into(),
            password: "p".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"usuario": "u", "password": "p"}));
    }

    #[test]
    fn detailed_permissions_default_when_fields_missing() {
        let detailed: DetailedPermissions =
            serde_json::from_str(r#"{"es_administrador":true}"#).unwrap();
        assert!(detailed.es_administrador);
        assert!(detailed.modulos_accesibles.is_empty());
        assert!(detailed.permisos_por_modulo.is_empty());
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------
#[cfg(test)]
mod user_tests {
    use shared::types::*;

    #[test]
    fn missing_is_active_reads_as_active() {
        let user: User =
            serde_json::from_str(r#"{"id_usuario":5,"usuario":"ana","correo":"a@x.bo"}"#).unwrap();
        assert!(user.is_active);
        assert!(user.roles.is_empty());
    }

    #[test]
    fn unknown_user_fields_are_kept() {
        let user: User = serde_json::from_str(
            r#"{"id_usuario":5,"usuario":"ana","persona":{"ci":"123"}}"#,
        )
        .unwrap();
        assert_eq!(user.extra["persona"]["ci"], "123");
    }

    #[test]
    fn create_body_never_carries_a_password() {
        let json = serde_json::to_value(UserCreate::new(7, "ana", "a@x.bo")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id_persona": 7, "usuario": "ana", "correo": "a@x.bo", "is_active": true})
        );
    }

    #[test]
    fn update_body_sends_only_set_fields() {
        let update = UserUpdate {
            is_active: Some(false),
            ..UserUpdate::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"is_active":false}"#
        );
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------
#[cfg(test)]
mod role_tests {
    use shared::types::role::NO_DESCRIPTION;
    use shared::types::*;

    #[test]
    fn role_accepts_id_alias_and_fills_defaults() {
        let role: Role = serde_json::from_str(r#"{"id":3,"nombre":"Secretaria"}"#).unwrap();
        assert_eq!(role.id_rol, 3);
        assert_eq!(role.descripcion, NO_DESCRIPTION);
        assert!(role.is_active);
        assert_eq!(role.usuarios_count, 0);
        assert_eq!(role.permisos_count, 0);
    }

    #[test]
    fn role_counters_come_from_camel_case_fields() {
        let role: Role = serde_json::from_str(
            r#"{"id_rol":2,"nombre":"Docente","descripcion":"Profes","usuariosCount":4,"permisosCount":9,"is_active":false}"#,
        )
        .unwrap();
        assert_eq!(role.usuarios_count, 4);
        assert_eq!(role.permisos_count, 9);
        assert!(!role.is_active);
    }

    #[test]
    fn permission_count_falls_back_to_embedded_list() {
        let role: Role = serde_json::from_str(
            r#"{"id_rol":2,"nombre":"Docente","permisos":[{"id_permiso":1},{"id_permiso":2}],"permisosCount":0}"#,
        )
        .unwrap();
        assert_eq!(role.permisos_count, 2);
    }

    #[test]
    fn created_at_wins_over_camel_case_date() {
        let role: Role = serde_json::from_str(
            r#"{"id_rol":1,"nombre":"A","created_at":"2024-01-01","fechaCreacion":"2023-01-01"}"#,
        )
        .unwrap();
        assert_eq!(role.fecha_creacion.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn serialized_role_reads_back_unchanged() {
        let role: Role = serde_json::from_str(
            r#"{"id":1,"nombre":"A","usuariosCount":3,"permisosCount":5,"created_at":"2024-01-01","color":"red"}"#,
        )
        .unwrap();

        let json = serde_json::to_value(&role).unwrap();
        assert_eq!(json["usuariosCount"], 3);
        assert!(json.get("usuarios_count").is_none());

        let back: Role = serde_json::from_value(json).unwrap();
        assert_eq!(back, role);
        assert_eq!(back.usuarios_count, 3);
        assert_eq!(back.permisos_count, 5);
        assert_eq!(back.fecha_creacion.as_deref(), Some("2024-01-01"));
        assert_eq!(back.extra.get("color").and_then(|v| v.as_str()), Some("red"));
    }

    #[test]
    fn role_without_any_id_is_rejected() {
        assert!(serde_json::from_str::<Role>(r#"{"nombre":"X"}"#).is_err());
    }
}

// ---------------------------------------------------------------------------
// Permissions, audit, persons, reports
// ---------------------------------------------------------------------------
#[cfg(test)]
mod resource_type_tests {
    use shared::types::*;

    #[test]
    fn permission_action_is_lowercase_on_the_wire() {
        let input = PermissionInput {
            nombre: "Crear usuarios".into(),
            descripcion: "".into(),
            modulo: "usuarios".into(),
            codigo: "usuarios.crear".into(),
            accion: PermissionAction::Crear,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["accion"], "crear");
        assert_eq!(PermissionAction::Eliminar.to_string(), "eliminar");
    }

    #[test]
    fn audit_page_accepts_items_alias() {
        let page: AuditPage =
            serde_json::from_str(r#"{"items":[{"id":1,"accion":"LOGIN"}],"total":1}"#).unwrap();
        assert_eq!(page.registros.len(), 1);
        assert_eq!(page.registros[0].id_bitacora, Some(1));
        assert_eq!(page.registros[0].fields["accion"], "LOGIN");
    }

    #[test]
    fn login_log_success_flag() {
        let log: LoginLog = serde_json::from_str(
            r#"{"id_log":1,"fecha_hora":"2024-05-10T08:00:00","estado":"exitoso"}"#,
        )
        .unwrap();
        assert!(log.succeeded());
    }

    #[test]
    fn enums_render_as_query_values() {
        assert_eq!(ExportFormat::Excel.to_string(), "excel");
        assert_eq!(PersonKind::Administrativo.to_string(), "administrativo");
        assert_eq!(SchoolLevel::Secundaria.to_string(), "secundaria");
        assert_eq!(CodigoTipo::Orientacion.to_string(), "orientacion");
    }

    #[test]
    fn esquela_without_joins_keeps_unknown_fields() {
        let note: Esquela = serde_json::from_str(
            r#"{"id_esquela":4,"fecha":"2024-05-02","codigos":[],"turno":"tarde"}"#,
        )
        .unwrap();
        assert!(note.estudiante.is_none());
        assert!(note.observaciones.is_none());
        assert_eq!(note.extra["turno"], "tarde");
    }

    #[test]
    fn unknown_code_kind_is_rejected() {
        let parsed = serde_json::from_str::<CodigoEsquela>(
            r#"{"id_codigo":1,"tipo":"sancion","codigo":"S1","descripcion":"x"}"#,
        );
        assert!(parsed.is_err());
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------
#[cfg(test)]
mod config_tests {
    use std::fs;

    use shared::config::{load_config, load_or_default, validate_config};
    use shared::types::*;

    fn write(contents: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        fs::write(&path, contents).unwrap();
        let path = path.to_string_lossy().into_owned();
        (dir, path)
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let (_dir, path) = write("[api]\ntimeout_secs = 5\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.storage.credentials_path, ".admin-client/credentials.json");
    }

    #[test]
    fn empty_file_is_rejected_naming_the_file() {
        let (_dir, path) = write("  \n");
        match load_config(&path) {
            Err(ConfigError::InvalidConfig(msg)) => {
                assert_eq!(msg, format!("{} contains no settings", path));
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let (_dir, path) = write("[api\n");
        assert!(matches!(load_config(&path), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_config("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let mut config = ClientConfig::default();
        config.api.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn relative_base_url_is_invalid() {
        let mut config = ClientConfig::default();
        config.api.base_url = "localhost:8000/api".into();
        // Only meaningful when the override variable is unset.
        if std::env::var(shared::types::client_config::API_URL_ENV).is_err() {
            assert!(validate_config(&config).is_err());
        }
    }

    #[test]
    fn no_path_uses_defaults() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
    }
}

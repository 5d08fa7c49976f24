use std::fs;
use tracing::{debug, info, warn};

use crate::types::client_config::{ClientConfig, ConfigError};

/// Read, parse and validate a client TOML file. Sections left out of the
/// file keep their defaults.
pub fn load_config(path: &str) -> Result<ClientConfig, ConfigError> {
    debug!("Reading client config {}", path);
    let raw: String = fs::read_to_string(path)?;

    if raw.trim().is_empty() {
        warn!("Client config {} has no content", path);
        return Err(ConfigError::InvalidConfig(format!(
            "{} contains no settings",
            path
        )));
    }

    let config: ClientConfig = toml::from_str(&raw)?;
    validate_config(&config)?;

    info!(
        "Client config {} loaded: api at {}, {}s timeout",
        path,
        config.api.resolved_base_url(),
        config.api.timeout_secs
    );
    Ok(config)
}

/// Load from `path` when given, otherwise start from the built-in defaults.
pub fn load_or_default(path: Option<&str>) -> Result<ClientConfig, ConfigError> {
    match path {
        Some(p) => load_config(p),
        None => {
            info!("No configuration file given, using defaults");
            let config = ClientConfig::default();
            validate_config(&config)?;
            Ok(config)
        }
    }
}

pub fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    let base = config.api.resolved_base_url();

    if base.is_empty() {
        return Err(ConfigError::InvalidConfig("base_url cannot be empty".into()));
    }

    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(ConfigError::InvalidConfig(format!(
            "base_url must be an absolute http(s) URL, got '{}'",
            base
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "timeout_secs must be greater than 0".into(),
        ));
    }

    if config.storage.credentials_path.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "credentials_path cannot be empty".into(),
        ));
    }

    Ok(())
}

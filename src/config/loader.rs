//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration.
///
/// Starts from the TOML file when a path is given (defaults otherwise),
/// overlays environment variables, then validates. Secrets are expected from
/// the environment in deployments without a config file.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = fs::read_to_string(p).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayConfig::default(),
    };

    apply_env(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto the configuration.
///
/// Environment values win over file values, matching how the secrets are
/// expected to be injected in deployment.
fn apply_env(config: &mut RelayConfig) {
    if let Ok(value) = std::env::var("RELAY_BIND") {
        config.listener.bind_address = value;
    }
    if let Ok(value) = std::env::var("RELAY_AUTH_PREFIX") {
        config.auth.path_prefix = value;
    }
    if let Ok(value) = std::env::var("RELAY_BASE_ORIGIN") {
        config.auth.base_origin = value;
    }
    if let Ok(value) = std::env::var("RELAY_CORS_ORIGIN") {
        config.cors.allowed_origin = value;
    }
    if let Ok(value) = std::env::var("IDENTITY_ENDPOINT") {
        config.identity.endpoint = value;
    }
    if let Ok(value) = std::env::var("IDENTITY_SECRET") {
        config.identity.secret = value;
    }
    if let Ok(value) = std::env::var("IDENTITY_DATABASE_URL") {
        config.identity.database_url = value;
    }
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that required values (base origin, identity secrets) are present
//! - Validate value shapes (addresses parse, URLs parse, prefix rooted)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::RelayConfig;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required value is absent (empty after file + environment overlay).
    MissingRequired { field: &'static str },
    /// A value that must be a URL failed to parse.
    InvalidUrl { field: &'static str, reason: String },
    /// The bind address is not a valid socket address.
    InvalidBindAddress { value: String },
    /// The auth prefix must start with '/'.
    PrefixNotRooted { value: String },
    /// Zero timeouts would reject every request.
    ZeroTimeout { field: &'static str },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRequired { field } => {
                write!(f, "required value '{}' is not set", field)
            }
            ValidationError::InvalidUrl { field, reason } => {
                write!(f, "'{}' is not a valid URL: {}", field, reason)
            }
            ValidationError::InvalidBindAddress { value } => {
                write!(f, "'{}' is not a valid bind address", value)
            }
            ValidationError::PrefixNotRooted { value } => {
                write!(f, "auth prefix '{}' must start with '/'", value)
            }
            ValidationError::ZeroTimeout { field } => {
                write!(f, "'{}' must be greater than zero", field)
            }
        }
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            value: config.listener.bind_address.clone(),
        });
    }

    if !config.auth.path_prefix.starts_with('/') {
        errors.push(ValidationError::PrefixNotRooted {
            value: config.auth.path_prefix.clone(),
        });
    }

    check_required_url(&mut errors, "auth.base_origin", &config.auth.base_origin);
    check_required_url(&mut errors, "identity.endpoint", &config.identity.endpoint);

    if config.identity.secret.is_empty() {
        errors.push(ValidationError::MissingRequired {
            field: "identity.secret",
        });
    }
    if config.identity.database_url.is_empty() {
        errors.push(ValidationError::MissingRequired {
            field: "identity.database_url",
        });
    }

    if let Err(e) = Url::parse(&config.cors.allowed_origin) {
        errors.push(ValidationError::InvalidUrl {
            field: "cors.allowed_origin",
            reason: e.to_string(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "timeouts.request_secs",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_required_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.is_empty() {
        errors.push(ValidationError::MissingRequired { field });
        return;
    }
    if let Err(e) = Url::parse(value) {
        errors.push(ValidationError::InvalidUrl {
            field,
            reason: e.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.auth.base_origin = "http://localhost:3000".into();
        config.identity.endpoint = "http://localhost:3100".into();
        config.identity.secret = "s3cret".into();
        config.identity.database_url = "mongodb://localhost:27017/steady".into();
        config
    }

    #[test]
    fn test_complete_config_is_valid() {
        assert!(validate_config(&complete_config()).is_ok());
    }

    #[test]
    fn test_defaults_missing_required_values() {
        let errors = validate_config(&RelayConfig::default()).unwrap_err();

        assert!(errors.contains(&ValidationError::MissingRequired {
            field: "auth.base_origin"
        }));
        assert!(errors.contains(&ValidationError::MissingRequired {
            field: "identity.endpoint"
        }));
        assert!(errors.contains(&ValidationError::MissingRequired {
            field: "identity.secret"
        }));
        assert!(errors.contains(&ValidationError::MissingRequired {
            field: "identity.database_url"
        }));
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = complete_config();
        config.listener.bind_address = "not-an-address".into();
        config.auth.path_prefix = "api/auth".into();
        config.identity.secret = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_malformed_base_origin_rejected() {
        let mut config = complete_config();
        config.auth.base_origin = "not a url".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidUrl {
                field: "auth.base_origin",
                ..
            }
        ));
    }
}

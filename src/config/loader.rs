//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::blockchain::network::NetworkId;
use crate::config::schema::ConnectorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `credentials.api_key`.
pub const API_KEY_ENV: &str = "IMMUTABLE_API_KEY";
/// Overrides `network.id`.
pub const NETWORK_ENV: &str = "IMMUTABLE_NETWORK";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
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

/// Load a TOML file (defaults when `path` is `None`), apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<ConnectorConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path).map_err(ConfigError::Io)?)?,
        None => ConnectorConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<ConnectorConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Apply `IMMUTABLE_*` overrides read through `lookup`.
pub fn apply_env_overrides(
    config: &mut ConnectorConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(key) = lookup(API_KEY_ENV) {
        config.credentials.api_key = key;
    }
    if let Some(network) = lookup(NETWORK_ENV) {
        config.network.id = network
            .parse::<NetworkId>()
            .map_err(|message| ConfigError::Env {
                var: NETWORK_ENV,
                message,
            })?;
    }
    Ok(())
}

//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ConnectorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ConnectorConfig;
use crate::webhook::server::{HEALTH_PATH, REGISTRATION_PATH};

/// Characters the router treats as captures or wildcards.
const ROUTE_PATTERN_CHARS: [char; 4] = [':', '*', '{', '}'];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &ConnectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("network.api_url", &config.network.api_url),
        ("network.rpc_url", &config.network.rpc_url),
    ] {
        if let Some(raw) = value {
            if let Err(e) = url::Url::parse(raw) {
                errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", raw, e)));
            }
        }
    }

    if config.http.timeout_secs == 0 {
        errors.push(ValidationError::new("http.timeout_secs", "must be greater than 0"));
    }

    let webhook = &config.webhook;
    if !webhook.path.starts_with('/') {
        errors.push(ValidationError::new(
            "webhook.path",
            format!("must start with '/', got '{}'", webhook.path),
        ));
    }
    if webhook.path.contains(ROUTE_PATTERN_CHARS) {
        errors.push(ValidationError::new(
            "webhook.path",
            format!("must be a literal path, got '{}'", webhook.path),
        ));
    }
    if [HEALTH_PATH, REGISTRATION_PATH].contains(&webhook.path.as_str()) {
        errors.push(ValidationError::new(
            "webhook.path",
            format!("'{}' is reserved", webhook.path),
        ));
    }
    if webhook.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "webhook.bind_address",
            format!("invalid socket address '{}'", webhook.bind_address),
        ));
    }
    if let Err(e) = url::Url::parse(&webhook.public_url) {
        errors.push(ValidationError::new(
            "webhook.public_url",
            format!("invalid URL '{}': {}", webhook.public_url, e),
        ));
    }
    if webhook.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "webhook.request_timeout_secs",
            "must be greater than 0",
        ));
    }
    if webhook.body_limit_bytes == 0 {
        errors.push(ValidationError::new("webhook.body_limit_bytes", "must be greater than 0"));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

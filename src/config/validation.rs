//! Server settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and socket addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::loader::parse_listen_address;
use crate::config::schema::ServerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("observability.log_level: unknown level {0:?}")]
    LogLevel(String),
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Same forms as `--listen`: `:3000`, `localhost:3000`, `ip:port`.
    if parse_listen_address(&config.listener.bind_address).is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let addresses = [
        (
            "observability.metrics_address",
            &config.observability.metrics_address,
            config.observability.metrics_enabled,
        ),
        ("admin.bind_address", &config.admin.bind_address, config.admin.enabled),
    ];
    for (field, value, in_use) in addresses {
        if in_use && value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.clone(),
            });
        }
    }

    if config.behaviors.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero {
            field: "behaviors.poll_interval_ms",
        });
    }
    if config.timeouts.shutdown_grace_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.shutdown_grace_secs",
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

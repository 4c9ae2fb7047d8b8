//! Server settings loading from disk.

use std::fs;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("invalid listen address {0:?}, expected [host]:port")]
    ListenAddress(String),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load and validate settings from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Turn a `--listen` value into a bindable socket address.
///
/// `:3000` binds every interface, `localhost:3000` binds loopback, anything
/// else must already be an `ip:port` pair.
pub fn parse_listen_address(listen: &str) -> Result<SocketAddr, ConfigError> {
    let invalid = || ConfigError::ListenAddress(listen.to_string());

    if let Some(port) = listen.strip_prefix(':') {
        let port: u16 = port.parse().map_err(|_| invalid())?;
        return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
    }
    if let Some(port) = listen.strip_prefix("localhost:") {
        let port: u16 = port.parse().map_err(|_| invalid())?;
        return Ok(SocketAddr::from((Ipv4Addr::LOCALHOST, port)));
    }
    listen.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = write_config("[listener]\nbind_address = \"127.0.0.1:4000\"\n\n[behaviors]\npoll_interval_ms = 250\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        assert_eq!(config.behaviors.poll_interval_ms, 250);
        assert!(config.behaviors.allow_duplicate_sections);
        assert_eq!(config.timeouts.shutdown_grace_secs, 15);
        assert!(!config.admin.enabled);
    }

    #[test]
    fn test_load_empty_file() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let file = write_config("[listener\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = write_config("[behaviors]\npoll_interval_ms = 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: behaviors.poll_interval_ms must be greater than zero"
        );
    }

    #[test]
    fn test_load_accepts_port_only_bind_address() {
        let file = write_config("[listener]\nbind_address = \":4000\"\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(
            parse_listen_address(&config.listener.bind_address).unwrap(),
            "0.0.0.0:4000".parse().unwrap()
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_listen_address() {
        assert_eq!(parse_listen_address(":3000").unwrap(), "0.0.0.0:3000".parse().unwrap());
        assert_eq!(parse_listen_address("localhost:8080").unwrap(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(parse_listen_address("127.0.0.1:9").unwrap(), "127.0.0.1:9".parse().unwrap());
        assert_eq!(parse_listen_address("[::1]:80").unwrap(), "[::1]:80".parse().unwrap());

        for bad in ["3000", ":", ":http", "localhost", "example.com:80", ":70000"] {
            assert!(parse_listen_address(bad).is_err(), "accepted {bad}");
        }
    }
}

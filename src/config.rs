//! Configuration file support for amqp-send
//!
//! A config file supplies connection defaults so they do not have to be repeated on
//! every invocation. Command-line flags always win over values from the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "amqp-send.toml";

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublisherConfig {
    #[serde(default)]
    pub broker: BrokerSection,
    #[serde(default)]
    pub publish: PublishSection,
}

/// Broker connection defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BrokerSection {
    /// Broker host name or IP address
    pub host: Option<String>,
    /// Broker AMQP port
    pub port: Option<u16>,
    /// Virtual host
    pub vhost: Option<String>,
    /// Login user
    pub username: Option<String>,
    /// Environment variable containing the password
    pub password_env: Option<String>,
}

/// Publish behaviour defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublishSection {
    /// Wait for a publisher confirm from the broker
    #[serde(default)]
    pub confirm: bool,
    /// Publish with persistent delivery mode
    #[serde(default)]
    pub persistent: bool,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PublisherConfig {
    /// Load and validate configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: PublisherConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that TOML typing alone does not rule out
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.port == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "broker.port must be between 1 and 65535".to_string(),
            ));
        }

        if let Some(host) = &self.broker.host {
            if host.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "broker.host must not be empty".to_string(),
                ));
            }
        }

        if let Some(name) = &self.broker.password_env {
            validate_env_var_name(name)?;
        }

        Ok(())
    }

    /// Resolve the broker password from the configured environment variable
    ///
    /// Returns `Ok(None)` when no `password_env` is configured.
    pub fn get_broker_password(&self) -> Result<Option<String>, ConfigError> {
        match &self.broker.password_env {
            Some(name) => std::env::var(name)
                .map(Some)
                .map_err(|_| ConfigError::EnvVarNotFound(name.clone())),
            None => Ok(None),
        }
    }
}

/// Pick the config file to load: the explicit path, else the default file if present
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            default_path.exists().then_some(default_path)
        }
    }
}

fn validate_env_var_name(name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if !valid {
        return Err(ConfigError::InvalidConfig(format!(
            "broker.password_env '{name}' is not a valid environment variable name"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let toml_content = r#"
[broker]
host = "rabbit.internal"
port = 5673
vhost = "billing"
username = "publisher"
password_env = "AMQP_PASSWORD"

[publish]
confirm = true
persistent = true
"#;

        let config: PublisherConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.broker.host.as_deref(), Some("rabbit.internal"));
        assert_eq!(config.broker.port, Some(5673));
        assert_eq!(config.broker.vhost.as_deref(), Some("billing"));
        assert_eq!(config.broker.username.as_deref(), Some("publisher"));
        assert!(config.publish.confirm);
        assert!(config.publish.persistent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: PublisherConfig = toml::from_str("").unwrap();
        assert_eq!(config, PublisherConfig::default());
        assert!(!config.publish.confirm);
    }

    #[test]
    fn test_zero_port_rejected() {
        let config: PublisherConfig = toml::from_str("[broker]\nport = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_blank_host_rejected() {
        let config: PublisherConfig = toml::from_str("[broker]\nhost = \"  \"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_var_name_validation() {
        assert!(validate_env_var_name("AMQP_PASSWORD").is_ok());
        assert!(validate_env_var_name("_secret2").is_ok());
        assert!(validate_env_var_name("").is_err());
        assert!(validate_env_var_name("2FAST").is_err());
        assert!(validate_env_var_name("AMQP-PASSWORD").is_err());
    }

    #[test]
    fn test_password_absent_without_env_name() {
        let config = PublisherConfig::default();
        assert_eq!(config.get_broker_password().unwrap(), None);
    }

    #[test]
    fn test_missing_password_env_var() {
        let config = PublisherConfig {
            broker: BrokerSection {
                password_env: Some("AMQP_SEND_TEST_UNSET_PASSWORD_VAR".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(matches!(
            config.get_broker_password(),
            Err(ConfigError::EnvVarNotFound(name)) if name == "AMQP_SEND_TEST_UNSET_PASSWORD_VAR"
        ));
    }

    #[test]
    fn test_explicit_path_is_always_used() {
        let path = Path::new("/nonexistent/custom.toml");
        assert_eq!(locate_config_file(Some(path)), Some(path.to_path_buf()));
    }
}

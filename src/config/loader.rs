//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert!(!config.dispatch.auto_options);
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
            [server]
            bind_address = "127.0.0.1:3000"

            [dispatch]
            auto_options = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address, "127.0.0.1:3000");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert!(config.dispatch.auto_options);
        assert!(!config.dispatch.ignore_trailing_slash);
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(parse_config("[server"), Err(ConfigError::Parse(_))));

        let err = parse_config("[server]\nrequest_timeout_secs = 0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: server.request_timeout_secs must be greater than zero"
        );

        assert!(matches!(
            load_config(Path::new("/definitely/not/here.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}

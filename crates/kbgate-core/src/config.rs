//! KBGate Configuration Management
//!
//! Handles configuration from environment variables and TOML files with
//! sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Bedrock knowledge base configuration
    pub bedrock: BedrockConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Handling of generated answers
    pub answer: AnswerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_overrides(&|key: &str| std::env::var(key).ok())?;
        Ok(self)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_value("PORT", port)?;
        }
        if let Some(size) = lookup("MAX_BODY_BYTES") {
            self.server.max_body_size = parse_value("MAX_BODY_BYTES", size)?;
        }

        // CORS origins from environment variable (comma-separated)
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Bedrock
        if let Some(region) = lookup("AWS_REGION") {
            self.bedrock.region = region;
        }
        if let Some(id) = lookup("BEDROCK_KB_ID") {
            self.bedrock.knowledge_base_id = id;
        }
        if let Some(arn) = lookup("BEDROCK_MODEL_ARN") {
            self.bedrock.model_arn = arn;
        }
        if let Some(url) = lookup("BEDROCK_ENDPOINT_URL") {
            self.bedrock.endpoint_url = Some(url).filter(|u| !u.trim().is_empty());
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.json_format = format.eq_ignore_ascii_case("json");
        }

        // Answers
        if let Some(flag) = lookup("VALIDATE_ANSWERS") {
            self.answer.validate_answers = parse_bool("VALIDATE_ANSWERS", flag)?;
        }

        Ok(())
    }

    /// Names of settings whose absence makes every generation call fail
    pub fn missing_generation_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.bedrock.knowledge_base_id.trim().is_empty() {
            missing.push("BEDROCK_KB_ID");
        }
        if self.bedrock.model_arn.trim().is_empty() {
            missing.push("BEDROCK_MODEL_ARN");
        }
        missing
    }

    /// Socket address string to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

fn parse_bool(key: &str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_body_size: usize,

    /// Allowed origins for CORS; empty mirrors the request origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_size: 1024 * 1024, // 1MB
            cors_origins: vec![],
        }
    }
}

/// Bedrock knowledge base configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BedrockConfig {
    /// AWS region hosting the knowledge base
    pub region: String,

    /// Knowledge base identifier
    pub knowledge_base_id: String,

    /// ARN of the foundation model used for generation
    pub model_arn: String,

    /// Endpoint override (local stubs, VPC endpoints)
    pub endpoint_url: Option<String>,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            knowledge_base_id: String::new(),
            model_arn: String::new(),
            endpoint_url: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Generated answer handling
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    /// Check answers against the expected JSON shape before relaying them
    pub validate_answers: bool,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_body_size, 1024 * 1024);
        assert_eq!(config.bedrock.region, "us-east-1");
        assert!(!config.answer.validate_answers);
    }

    #[test]
    fn test_from_lookup() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("AWS_REGION", "ap-southeast-2"),
            ("BEDROCK_KB_ID", "KB123"),
            ("BEDROCK_MODEL_ARN", "arn:aws:bedrock:ap-southeast-2::foundation-model/x"),
            ("CORS_ORIGINS", "https://a.example, ,https://b.example"),
            ("LOG_FORMAT", "JSON"),
            ("VALIDATE_ANSWERS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.bedrock.region, "ap-southeast-2");
        assert_eq!(config.bedrock.knowledge_base_id, "KB123");
        assert_eq!(
            config.server.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.logging.json_format);
        assert!(config.answer.validate_answers);
        assert!(config.missing_generation_settings().is_empty());
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn test_invalid_bool() {
        assert!(AppConfig::from_lookup(lookup(&[("VALIDATE_ANSWERS", "maybe")])).is_err());
    }

    #[test]
    fn test_missing_generation_settings() {
        let config = AppConfig::default();
        assert_eq!(
            config.missing_generation_settings(),
            vec!["BEDROCK_KB_ID", "BEDROCK_MODEL_ARN"]
        );
    }

    #[test]
    fn test_blank_endpoint_url_is_ignored() {
        let config = AppConfig::from_lookup(lookup(&[("BEDROCK_ENDPOINT_URL", " ")])).unwrap();
        assert!(config.bedrock.endpoint_url.is_none());
    }

    #[test]
    fn test_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [bedrock]
            region = "eu-west-1"
            knowledge_base_id = "KB9"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.bedrock.region, "eu-west-1");
        assert_eq!(config.missing_generation_settings(), vec!["BEDROCK_MODEL_ARN"]);
    }

    #[test]
    fn test_from_missing_file() {
        let err = AppConfig::from_file("/nonexistent/kbgate.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError { .. }));
    }
}

// src/configs/initializer.rs
use env_logger::Env;
use log::{debug, info};
use once_cell::sync::OnceCell;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::InvalidValue {
                key: "ROLECHECK_OUTPUT",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value `{value}`")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct RolecheckConfig {
    pub environment: String,
    pub log_level: String,
    pub output: OutputFormat,
}

impl Default for RolecheckConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            output: OutputFormat::Table,
        }
    }
}

impl RolecheckConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            output: match lookup("ROLECHECK_OUTPUT") {
                Some(raw) => raw.parse()?,
                None => defaults.output,
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

static LOGGING_INITIALIZED: OnceCell<()> = OnceCell::new();

pub fn setup_rolecheck_logging(config: &RolecheckConfig) {
    LOGGING_INITIALIZED.get_or_init(|| {
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or(&config.log_level))
            .format_timestamp_millis()
            .try_init();

        info!("✅ Rolecheck logging initialized");
        info!("🔧 Rolecheck environment: {}", config.environment);
        debug!("🔍 Rolecheck debug logging active");
    });
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
    fn test_defaults() {
        let config = RolecheckConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.output, OutputFormat::Table);
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = RolecheckConfig::from_lookup(lookup(&[
            ("ENVIRONMENT", "production"),
            ("RUST_LOG", "rolecheck=trace"),
            ("ROLECHECK_OUTPUT", "JSON"),
        ]))
        .unwrap();
        assert!(config.is_production());
        assert_eq!(config.log_level, "rolecheck=trace");
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_output_format() {
        let err =
            RolecheckConfig::from_lookup(lookup(&[("ROLECHECK_OUTPUT", "yaml")])).unwrap_err();
        assert_eq!(err.to_string(), "ROLECHECK_OUTPUT has invalid value `yaml`");
    }

    #[test]
    fn test_logging_setup_is_idempotent() {
        let config = RolecheckConfig::default();
        setup_rolecheck_logging(&config);
        setup_rolecheck_logging(&config);
    }
}

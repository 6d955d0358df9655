//! Ledger configuration with TOML file support.

use serde::{Deserialize, Serialize};

use permit_utils::LogFormat;

use crate::error::LedgerError;

/// Configuration for an approval ledger.
///
/// Can be loaded from a TOML file via [`LedgerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Largest number of entries accepted by one batch operation. Unset
    /// means batches are unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_batch_len: Option<usize>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl LedgerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, LedgerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LedgerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        let config: Self = toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, LedgerError> {
        toml::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.max_batch_len == Some(0) {
            return Err(LedgerError::Config("max_batch_len must be at least 1".into()));
        }
        self.log_format()?;
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, LedgerError> {
        self.log_format
            .parse()
            .map_err(|e: permit_utils::LoggingError| LedgerError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) -> Result<(), LedgerError> {
        permit_utils::init_tracing(self.log_format()?, &self.log_level)
            .map_err(|e| LedgerError::Config(e.to_string()))
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_batch_len: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = LedgerConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = LedgerConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = LedgerConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.max_batch_len, None);
        assert_eq!(config.log_format, "human");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            max_batch_len = 16
            log_format = "json"
        "#;
        let config = LedgerConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.max_batch_len, Some(16));
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn zero_batch_limit_is_rejected() {
        let err = LedgerConfig::from_toml_str("max_batch_len = 0").unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn batch_limit_survives_toml_round_trip() {
        let config = LedgerConfig {
            max_batch_len: Some(32),
            ..LedgerConfig::default()
        };
        let parsed = LedgerConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed.max_batch_len, Some(32));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let err = LedgerConfig::from_toml_str(r#"log_format = "xml""#).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_batch_len = 8").unwrap();
        let config = LedgerConfig::from_toml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.max_batch_len, Some(8));
    }

    #[test]
    fn logging_installs_once() {
        let config = LedgerConfig::default();
        let _ = config.init_logging();
        assert!(matches!(config.init_logging(), Err(LedgerError::Config(_))));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = LedgerConfig::from_toml_file("/nonexistent/permit.toml");
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }
}

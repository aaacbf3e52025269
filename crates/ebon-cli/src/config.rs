//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Command line flags override these values.
//!
//! | Variable               | Default      | Meaning                          |
//! |------------------------|--------------|----------------------------------|
//! | `EBON_TOLERANCE_CENTS` | `1`          | Rounding tolerance for checks    |
//! | `EBON_LOG`             | `RUST_LOG`, then `info` | tracing filter        |
//! | `EBON_BINDINGS_DIR`    | `./bindings` | TypeScript export directory      |

use std::env;
use std::path::PathBuf;

use ebon_core::DEFAULT_TOLERANCE_CENTS;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Money tolerance for `ebon check`, in cents
    pub tolerance_cents: i64,

    /// tracing-subscriber filter directive
    pub log_filter: String,

    /// Output directory for `ebon bindings`
    pub bindings_dir: PathBuf,
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tolerance_cents = match lookup("EBON_TOLERANCE_CENTS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue("EBON_TOLERANCE_CENTS".to_string()))?,
            None => DEFAULT_TOLERANCE_CENTS,
        };

        if tolerance_cents < 0 {
            return Err(ConfigError::InvalidValue("EBON_TOLERANCE_CENTS".to_string()));
        }

        let log_filter = lookup("EBON_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());

        let bindings_dir = lookup("EBON_BINDINGS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("bindings"));

        Ok(CliConfig {
            tolerance_cents,
            log_filter,
            bindings_dir,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
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
        let config = CliConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.tolerance_cents, DEFAULT_TOLERANCE_CENTS);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.bindings_dir, PathBuf::from("bindings"));
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::from_lookup(lookup(&[
            ("EBON_TOLERANCE_CENTS", " 0 "),
            ("EBON_LOG", "ebon=debug"),
            ("EBON_BINDINGS_DIR", "web/src/types"),
        ]))
        .unwrap();
        assert_eq!(config.tolerance_cents, 0);
        assert_eq!(config.log_filter, "ebon=debug");
        assert_eq!(config.bindings_dir, PathBuf::from("web/src/types"));
    }

    #[test]
    fn test_rust_log_fallback() {
        let config = CliConfig::from_lookup(lookup(&[("RUST_LOG", "warn")])).unwrap();
        assert_eq!(config.log_filter, "warn");

        let config =
            CliConfig::from_lookup(lookup(&[("RUST_LOG", "warn"), ("EBON_LOG", "trace")])).unwrap();
        assert_eq!(config.log_filter, "trace");
    }

    #[test]
    fn test_invalid_tolerance() {
        let err = CliConfig::from_lookup(lookup(&[("EBON_TOLERANCE_CENTS", "one")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for EBON_TOLERANCE_CENTS");

        assert!(CliConfig::from_lookup(lookup(&[("EBON_TOLERANCE_CENTS", "-1")])).is_err());
    }
}

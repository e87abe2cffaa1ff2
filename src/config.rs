//! Runtime configuration from `GLUCOGUARD_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::GlucoguardError;

pub const DEFAULT_MODEL_DIR: &str = "modelo";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_LOG_FILE: &str = "logs/glucoguard.log";

/// Where formatted log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub target: LogTarget,
    /// Fallback filter when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl LogConfig {
    /// Read `GLUCOGUARD_LOG_MODE` (`stdout` or `file`) and `GLUCOGUARD_LOG_FILE`.
    ///
    /// # Errors
    /// Returns `GlucoguardError::Config` on an unknown mode.
    pub fn from_env() -> Result<Self, GlucoguardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GlucoguardError> {
        let mode = lookup("GLUCOGUARD_LOG_MODE").unwrap_or_else(|| "stdout".to_string());
        let target = match mode.as_str() {
            "stdout" => LogTarget::Stdout,
            "file" => LogTarget::File(
                lookup("GLUCOGUARD_LOG_FILE")
                    .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
                    .into(),
            ),
            other => {
                return Err(GlucoguardError::Config(format!(
                    "GLUCOGUARD_LOG_MODE must be 'stdout' or 'file', got '{other}'"
                )))
            }
        };

        Ok(Self {
            target,
            default_filter: "info".to_string(),
        })
    }
}

/// Settings of the inference server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Directory holding the persisted artifact pair.
    pub model_dir: PathBuf,
    pub listen_addr: SocketAddr,
    pub log: LogConfig,
}

impl ServiceConfig {
    /// Read `GLUCOGUARD_MODEL_DIR`, `GLUCOGUARD_LISTEN_ADDR` and the log settings.
    ///
    /// # Errors
    /// Returns `GlucoguardError::Config` if the listen address does not parse.
    pub fn from_env() -> Result<Self, GlucoguardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GlucoguardError> {
        let model_dir = lookup("GLUCOGUARD_MODEL_DIR")
            .unwrap_or_else(|| DEFAULT_MODEL_DIR.to_string())
            .into();

        let raw_addr =
            lookup("GLUCOGUARD_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw_addr.parse().map_err(|e| {
            GlucoguardError::Config(format!("invalid GLUCOGUARD_LISTEN_ADDR '{raw_addr}': {e}"))
        })?;

        Ok(Self {
            model_dir,
            listen_addr,
            log: LogConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(config.model_dir, PathBuf::from("modelo"));
        assert_eq!(config.listen_addr.port(), 5000);
        assert_eq!(config.log.target, LogTarget::Stdout);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("GLUCOGUARD_MODEL_DIR", "/srv/model"),
            ("GLUCOGUARD_LISTEN_ADDR", "0.0.0.0:8080"),
            ("GLUCOGUARD_LOG_MODE", "file"),
            ("GLUCOGUARD_LOG_FILE", "/var/log/gg.log"),
        ]))
        .expect("overrides");
        assert_eq!(config.model_dir, PathBuf::from("/srv/model"));
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(
            config.log.target,
            LogTarget::File(PathBuf::from("/var/log/gg.log"))
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ServiceConfig::from_lookup(lookup(&[("GLUCOGUARD_LISTEN_ADDR", "nowhere")])).is_err());
        assert!(ServiceConfig::from_lookup(lookup(&[("GLUCOGUARD_LOG_MODE", "syslog")])).is_err());
    }
}

//! Settings types.
//!
//! Every struct is `#[serde(default)]` so a partial settings file only
//! overrides the keys it names.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    /// HTTP listener settings.
    pub server: ServerSettings,
    /// Embedded database settings.
    pub database: DatabaseSettings,
    /// Failure injection settings.
    pub chaos: ChaosSettings,
    /// Log output settings.
    pub logging: LoggingSettings,
}

impl CatalogSettings {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let rate = self.chaos.update_failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(SettingsError::InvalidValue(format!(
                "chaos.updateFailureRate must be within 0.0..=1.0, got {rate}"
            )));
        }
        if self.database.pool_size == 0 {
            return Err(SettingsError::InvalidValue(
                "database.poolSize must be at least 1".into(),
            ));
        }
        if self.database.path.is_empty() {
            return Err(SettingsError::InvalidValue(
                "database.path must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Listen port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3002,
        }
    }
}

/// Embedded database settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Database file path. Parent directories are created on startup.
    pub path: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// `SQLite` busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "./data/products.db".to_string(),
            pool_size: 8,
            busy_timeout_ms: 5000,
        }
    }
}

/// Failure injection settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChaosSettings {
    /// Probability that `PUT /products/{id}` fails with a 500 before doing
    /// anything else. `0.0` disables injection.
    pub update_failure_rate: f64,
}

impl Default for ChaosSettings {
    fn default() -> Self {
        Self {
            update_failure_rate: 0.5,
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter directive. `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_keys() {
        let value = serde_json::to_value(CatalogSettings::default()).unwrap();
        assert_eq!(value["database"]["poolSize"], 8);
        assert_eq!(value["database"]["busyTimeoutMs"], 5000);
        assert_eq!(value["chaos"]["updateFailureRate"], 0.5);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: CatalogSettings =
            serde_json::from_str(r#"{"server": {"port": 8080}}"#).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.database.path, "./data/products.db");
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut settings = CatalogSettings::default();
        settings.chaos.update_failure_rate = 1.5;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("updateFailureRate"));
    }

    #[test]
    fn validate_rejects_negative_rate() {
        let mut settings = CatalogSettings::default();
        settings.chaos.update_failure_rate = -0.1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_accepts_rate_bounds() {
        let mut settings = CatalogSettings::default();
        settings.chaos.update_failure_rate = 0.0;
        assert!(settings.validate().is_ok());
        settings.chaos.update_failure_rate = 1.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_pool() {
        let mut settings = CatalogSettings::default();
        settings.database.pool_size = 0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_db_path() {
        let mut settings = CatalogSettings::default();
        settings.database.path = String::new();
        assert!(settings.validate().is_err());
    }
}

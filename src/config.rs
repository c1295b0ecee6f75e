//! Adapter configuration: database connection and path namespace.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::PathStrategy;

/// Adapter configuration.
///
/// The only options interpreted by the core are the store connection and
/// the path namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,

    /// Path namespace; directory-aware (`prefixed`) unless configured
    /// otherwise.
    #[serde(default)]
    pub namespace: PathStrategy,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(flatten)]
    pub db_config: DatabaseType,
}

/// Database type enumeration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DatabaseType {
    #[serde(rename = "sqlite")]
    Sqlite {
        #[serde(default = "default_sqlite_url")]
        url: String,
    },
    #[serde(rename = "postgres")]
    Postgres { url: String },
}

fn default_sqlite_url() -> String {
    "sqlite://dbfs.db?mode=rwc".to_string()
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Build a configuration from a connection URL (simplified interface).
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let db_config = if url.starts_with("sqlite:") {
            DatabaseType::Sqlite {
                url: url.to_string(),
            }
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            DatabaseType::Postgres {
                url: url.to_string(),
            }
        } else {
            return Err(ConfigError::UnsupportedScheme(url.to_string()));
        };

        Ok(Config {
            database: DatabaseConfig { db_config },
            namespace: PathStrategy::default(),
        })
    }

    pub fn with_namespace(mut self, namespace: PathStrategy) -> Self {
        self.namespace = namespace;
        self
    }
}

impl DatabaseConfig {
    /// Get database type string
    pub fn db_type_str(&self) -> &'static str {
        match &self.db_config {
            DatabaseType::Sqlite { .. } => "sqlite",
            DatabaseType::Postgres { .. } => "postgres",
        }
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_shorthand_selects_backend() {
        let cfg = Config::from_url("sqlite::memory:").unwrap();
        assert_eq!(cfg.database.db_type_str(), "sqlite");
        assert_eq!(cfg.namespace, PathStrategy::Prefixed);

        let cfg = Config::from_url("postgres://localhost/files").unwrap();
        assert_eq!(cfg.database.db_type_str(), "postgres");

        assert!(matches!(
            Config::from_url("mysql://localhost/files"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn yaml_round_trip() {
        let yaml = r#"
database:
  type: sqlite
  url: "sqlite://files.db?mode=rwc"
namespace: flat
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.database.db_type_str(), "sqlite");
        assert_eq!(cfg.namespace, PathStrategy::Flat);
    }

    #[test]
    fn namespace_defaults_to_prefixed() {
        let yaml = r#"
database:
  type: postgres
  url: "postgres://localhost/files"
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.namespace, PathStrategy::Prefixed);
    }
}

use crate::error::{Error, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the docstore system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Configuration for the storage backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Provider type: "memory" or "mock"
    #[serde(default = "default_storage_provider")]
    pub provider: String,

    /// Logical database name collections are resolved against
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_storage_provider() -> String {
    "memory".to_string()
}

fn default_database() -> String {
    "docstore".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_storage_provider(),
            database: default_database(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `DOCSTORE_` and use double underscores
    /// for nested values. For example:
    /// - `DOCSTORE_STORAGE__PROVIDER=mock`
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with DOCSTORE_ prefix
        builder = builder.add_source(
            Environment::with_prefix("DOCSTORE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_providers = ["memory", "mock"];
        if !valid_providers.contains(&self.storage.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid storage provider '{}'. Must be one of: {:?}",
                self.storage.provider, valid_providers
            )));
        }

        if self.storage.database.trim().is_empty() {
            return Err(Error::config(
                "Invalid database name: must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Saves the configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, toml_string)
            .map_err(|e| Error::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.storage.provider, "memory");
        assert_eq!(config.storage.database, "docstore");
        config.validate().unwrap();
    }

    #[test]
    fn parses_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [storage]
            provider = "mock"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.provider, "mock");
        // Unspecified fields fall back to defaults
        assert_eq!(config.storage.database, "docstore");
    }

    #[test]
    fn rejects_unknown_provider() {
        let config = Config::from_toml_str(
            r#"
            [storage]
            provider = "cassandra"
            "#,
        )
        .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.storage.database = "inventory".to_string();
        config.save(&path).unwrap();

        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.storage.database, "inventory");
    }
}

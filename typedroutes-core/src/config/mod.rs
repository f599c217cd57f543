//! Configuration system for TypedRoutes
//!
//! Configuration values are resolved in the following order (highest priority wins):
//!
//! 1. **Code** (builder methods on `TypedRoutesServer`) - Highest priority
//! 2. **Environment Variables** (`TR_*`) - Override file config
//! 3. **Config File** (`typedroutes.toml`) - Override defaults
//! 4. **Defaults** - Lowest priority
//!
//! # Example
//!
//! ```no_run
//! use typedroutes_core::config::TypedRoutesConfig;
//!
//! // Load with full supersedence
//! let config = TypedRoutesConfig::load()?;
//!
//! // Or load from specific file
//! let config = TypedRoutesConfig::from_file("typedroutes.toml")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod docs;
pub mod logging;
pub mod server;

pub use docs::DocsConfig;
pub use logging::LoggingConfig;
pub use server::ServerConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "typedroutes.toml";

/// Complete TypedRoutes configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypedRoutesConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub docs: DocsConfig,
}

impl TypedRoutesConfig {
    /// Load configuration with full supersedence chain
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file, then apply the environment
    ///
    /// A missing file is not an error: defaults are used instead.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.server.merge(other.server);
        self.logging.merge(other.logging);
        self.docs.merge(other.docs);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.server.apply_env_vars();
        self.logging.apply_env_vars();
        self.docs.apply_env_vars();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.logging.validate()?;
        self.docs.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TypedRoutesConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.server.redirect_slashes);
        assert!(config.docs.enabled);
        assert_eq!(config.docs.openapi_url, "/openapi.json");
    }

    #[test]
    fn test_config_validation() {
        let config = TypedRoutesConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TypedRoutesConfig::from_toml_str(
            r#"
            [server]
            port = 9100

            [docs]
            title = "Tutorial API"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.docs.title, "Tutorial API");
        assert_eq!(config.docs.docs_url, "/docs");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typedroutes.toml");
        std::fs::write(
            &path,
            r#"
            [server]
            host = "0.0.0.0"
            max_body_size = 2048

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        let config = TypedRoutesConfig::from_file(&path).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.max_body_size, 2048);
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TypedRoutesConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert!(config.docs.enabled);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = TypedRoutesConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML config"));
    }
}

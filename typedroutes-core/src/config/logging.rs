//! Logging configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter directives, e.g. `info` or `typedroutes_core=debug`
    pub level: String,
    /// `human` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "human".to_string() }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("TR_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("TR_LOG_FORMAT") {
            self.format = format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if crate::logging::LogFormat::parse(&self.format).is_none() {
            bail!("Invalid logging format '{}': expected 'human' or 'json'", self.format);
        }
        Ok(())
    }
}

//! API documentation configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Serve the OpenAPI document and the docs pages
    /// Env: TR_DOCS_ENABLED
    pub enabled: bool,
    /// `info.title` of the OpenAPI document
    pub title: String,
    /// `info.version` of the OpenAPI document
    pub version: String,
    pub openapi_url: String,
    /// Swagger UI page
    pub docs_url: String,
    /// ReDoc page
    pub redoc_url: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "TypedRoutes".to_string(),
            version: "0.1.0".to_string(),
            openapi_url: "/openapi.json".to_string(),
            docs_url: "/docs".to_string(),
            redoc_url: "/redoc".to_string(),
        }
    }
}

impl DocsConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(enabled) = env::var("TR_DOCS_ENABLED") {
            if let Ok(e) = enabled.parse() {
                self.enabled = e;
            }
        }
        if let Ok(title) = env::var("TR_DOCS_TITLE") {
            self.title = title;
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("openapi_url", &self.openapi_url),
            ("docs_url", &self.docs_url),
            ("redoc_url", &self.redoc_url),
        ] {
            if !url.starts_with('/') {
                bail!("Invalid docs.{}: '{}' must start with '/'", name, url);
            }
        }
        Ok(())
    }
}

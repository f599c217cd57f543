//! Server configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server listening address
    /// Env: TR_HOST
    /// Default: "127.0.0.1"
    pub host: String,

    /// Server listening port
    /// Env: TR_PORT
    /// Default: 8000
    pub port: u16,

    /// Maximum request body size in bytes
    /// Env: TR_MAX_BODY_SIZE
    /// Default: 1048576 (1MB)
    pub max_body_size: usize,

    /// Redirect `/path` to `/path/` (and back) when only the other form is routed
    /// Env: TR_REDIRECT_SLASHES
    /// Default: true
    pub redirect_slashes: bool,

    /// Seconds to wait for in-flight connections after shutdown is requested
    /// Env: TR_SHUTDOWN_TIMEOUT
    /// Default: 30
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_body_size: 1024 * 1024,
            redirect_slashes: true,
            shutdown_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.host = other.host;
        self.port = other.port;
        self.max_body_size = other.max_body_size;
        self.redirect_slashes = other.redirect_slashes;
        self.shutdown_timeout_secs = other.shutdown_timeout_secs;
    }

    /// Apply environment variables
    pub fn apply_env_vars(&mut self) {
        if let Ok(host) = env::var("TR_HOST") {
            self.host = host;
        }

        if let Ok(port) = env::var("TR_PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        if let Ok(size) = env::var("TR_MAX_BODY_SIZE") {
            if let Ok(s) = size.parse() {
                self.max_body_size = s;
            }
        }

        if let Ok(redirect) = env::var("TR_REDIRECT_SLASHES") {
            if let Ok(r) = redirect.parse() {
                self.redirect_slashes = r;
            }
        }

        if let Ok(timeout) = env::var("TR_SHUTDOWN_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.shutdown_timeout_secs = t;
            }
        }
    }

    /// Socket address string (`host:port`)
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("Invalid port: port must be between 1 and 65535");
        }

        if self.host.is_empty() {
            bail!("Invalid host: host cannot be empty");
        }

        if self.max_body_size == 0 {
            bail!("Invalid max_body_size: must be greater than 0");
        }

        Ok(())
    }
}

//! TypedRoutes server assembly
//!
//! [`build_router`] wires the API handlers and the docs routes into one
//! router; [`TypedRoutesServer`] resolves configuration, starts logging and
//! runs the hyper server.
//!
//! # Example
//!
//! ```no_run
//! use typedroutes_core::TypedRoutesServer;
//!
//! # async fn example() -> anyhow::Result<()> {
//! TypedRoutesServer::new()
//!     .with_port(8080)
//!     .with_docs(false)
//!     .serve()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::time::Duration;

use crate::config::TypedRoutesConfig;
use crate::handlers;
use crate::http::{BoundServer, HttpServer, Router};
use crate::logging::init_logging;
use crate::models::{fake_items_db, FakeItem};
use crate::openapi;

/// State shared read-only by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub fake_items: Vec<FakeItem>,
}

impl Default for AppState {
    fn default() -> Self {
        Self { fake_items: fake_items_db() }
    }
}

/// Build the complete router: API routes, then the docs routes when enabled
pub fn build_router(config: &TypedRoutesConfig) -> crate::Result<Router<AppState>> {
    let router = handlers::routes()
        .into_iter()
        .fold(Router::new(), |router, route| router.route(route))
        .redirect_slashes(config.server.redirect_slashes);

    openapi::mount(router, &config.docs)
}

/// The TypedRoutes HTTP server
pub struct TypedRoutesServer {
    config: TypedRoutesConfig,
}

impl TypedRoutesServer {
    /// Create a server with configuration from `typedroutes.toml` and the environment
    ///
    /// Falls back to defaults when the file cannot be loaded.
    pub fn new() -> Self {
        let config = TypedRoutesConfig::load().unwrap_or_else(|e| {
            eprintln!("Ignoring configuration file: {:#}", e);
            TypedRoutesConfig::default()
        });
        Self { config }
    }

    /// Create a server with an explicit configuration
    pub fn with_config(config: TypedRoutesConfig) -> Self {
        Self { config }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.config.server.max_body_size = size;
        self
    }

    pub fn with_redirect_slashes(mut self, enabled: bool) -> Self {
        self.config.server.redirect_slashes = enabled;
        self
    }

    /// Serve the OpenAPI document and docs pages
    pub fn with_docs(mut self, enabled: bool) -> Self {
        self.config.docs.enabled = enabled;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_log_format(mut self, format: impl Into<String>) -> Self {
        self.config.logging.format = format.into();
        self
    }

    pub fn config(&self) -> &TypedRoutesConfig {
        &self.config
    }

    /// Validate the configuration, start logging and bind the listener
    pub async fn bind(self) -> Result<BoundServer<AppState>> {
        self.config.validate().context("Invalid configuration")?;
        init_logging(&self.config.logging)?;

        let router = build_router(&self.config).context("Failed to build router")?;
        let addr = self.config.server.bind_address();

        log::info!("Starting TypedRoutes server");
        log::info!("   ✓ {} routes registered", router.route_count());
        if self.config.docs.enabled {
            log::info!(
                "   ✓ Docs at {} and {}",
                self.config.docs.docs_url,
                self.config.docs.redoc_url
            );
        }

        let bound = HttpServer::new(router, AppState::default())
            .with_max_body_size(self.config.server.max_body_size)
            .with_shutdown_timeout(Duration::from_secs(self.config.server.shutdown_timeout_secs))
            .bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        log::info!("✅ Server listening on http://{}", bound.local_addr()?);
        Ok(bound)
    }

    /// Bind and serve until Ctrl-C
    pub async fn serve(self) -> Result<()> {
        self.bind().await?.run().await?;
        Ok(())
    }
}

impl Default for TypedRoutesServer {
    fn default() -> Self {
        Self::new()
    }
}

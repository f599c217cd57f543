//! TypedRoutes - Core
//!
//! A small typed HTTP API in Rust: routes declare their path and query
//! parameters and their JSON body models once, and the framework coerces,
//! validates, dispatches and documents them.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use typedroutes_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     TypedRoutesServer::new()
//!         .with_port(8000)
//!         .serve()
//!         .await
//! }
//! ```
//!
//! # Architecture
//!
//! - [`config`] - TOML + environment configuration
//! - [`logging`] - `log` facade backed by `env_logger`
//! - [`http`] - request/response types, router and the hyper server loop
//! - [`validation`] - error taxonomy, lax coercion and constraints
//! - [`params`] - typed path/query parameter declarations
//! - [`body`] - JSON request body decoding
//! - [`models`] - `Item`, `ModelName` and the fake item fixture
//! - [`handlers`] - the API route handlers
//! - [`openapi`] - OpenAPI document and interactive docs pages
//! - [`app`] - router assembly and [`TypedRoutesServer`]
//! - [`hints`] - typed helper functions from the type-hint chapter

pub mod app;
pub mod body;
pub mod config;
pub mod handlers;
pub mod hints;
pub mod http;
pub mod logging;
pub mod models;
pub mod openapi;
pub mod params;
pub mod validation;

pub mod prelude;

pub use app::{build_router, AppState, TypedRoutesServer};
pub use config::TypedRoutesConfig;
pub use crate::http::{ApiError, HttpResponse, Request, Router};

/// Main result type for the framework
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for TypedRoutes
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serialization/deserialization errors
    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Configuration that cannot be turned into a router
    #[error("Configuration Error: {0}")]
    Config(String),
}

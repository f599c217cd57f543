//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use typedroutes_core::prelude::*;
//! ```

// === Server builder ===
pub use crate::app::{build_router, AppState, TypedRoutesServer};

// === Configuration ===
pub use crate::config::{DocsConfig, LoggingConfig, ServerConfig, TypedRoutesConfig};

// === HTTP ===
pub use crate::http::{ApiError, HttpResponse, HttpServer, PathParams, Request, Route, Router};

// === Parameters, bodies and validation ===
pub use crate::body::{FromJsonValue, ObjectReader};
pub use crate::params::{Arguments, FromParam, ParamKind, ParamSpec};
pub use crate::validation::{ValidationError, ValidationErrors};

// === Models ===
pub use crate::models::{Item, ModelName};

//! HTTP layer built on hyper
//!
//! # Architecture
//!
//! - [`server`] - hyper accept loop with graceful shutdown
//! - [`request`] - fully-read request representation
//! - [`response`] - response building
//! - [`router`] - path templates and method dispatch
//! - [`error`] - transport errors and handler errors
//!
//! # Example
//!
//! ```rust,no_run
//! use typedroutes_core::http::{HttpResponse, HttpServer, Router};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let router = Router::<()>::new().get("/users", "read_users", |_req, _params, _state| {
//!     Ok(HttpResponse::ok_json(&["Rick", "Morty"]))
//! });
//! HttpServer::new(router, ()).bind("127.0.0.1:8000").await?.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use error::{ApiError, HttpError};
pub use request::{QueryParams, Request};
pub use response::HttpResponse;
pub use router::{PathParams, PathTemplate, Route, RouteDoc, RouteHandler, Router};
pub use server::{BoundServer, HttpServer};

/// HTTP constants
pub mod constants {
    /// Content-Type values
    pub mod content_types {
        pub const JSON: &str = "application/json";
        pub const HTML: &str = "text/html; charset=utf-8";
    }
}

//! Route handlers of the API
//!
//! Each submodule exposes its handlers and a `routes()` list carrying the
//! parameter declarations used for both extraction and documentation.

pub mod files;
pub mod items;
pub mod models;
pub mod users;

use crate::app::AppState;
use crate::http::Route;

/// Every API route, in matching order
pub fn routes() -> Vec<Route<AppState>> {
    let mut routes = items::routes();
    routes.extend(users::routes());
    routes.extend(models::routes());
    routes.extend(files::routes());
    routes
}

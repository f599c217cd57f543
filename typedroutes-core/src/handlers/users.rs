//! `/users` routes
//!
//! `/users/me` is registered before `/users/{user_id}` so it is not captured
//! as a user id.

use http::Method;
use serde_json::{json, Map};

use super::items::{describe, Q, SHORT};
use crate::app::AppState;
use crate::http::{ApiError, HttpResponse, PathParams, Request, Route};
use crate::params::{Arguments, ParamKind, ParamSpec};

pub const USER_ID: ParamSpec = ParamSpec::path("user_id", ParamKind::String);
pub const OWNER_ID: ParamSpec = ParamSpec::path("user_id", ParamKind::Integer);
pub const ITEM_ID: ParamSpec = ParamSpec::path("item_id", ParamKind::String);

pub fn routes() -> Vec<Route<AppState>> {
    vec![
        Route::new(Method::GET, "/users", "read_users", read_users),
        Route::new(Method::GET, "/users/me", "read_user_me", read_user_me),
        Route::new(Method::GET, "/users/{user_id}", "read_user", read_user)
            .params(&[USER_ID]),
        Route::new(Method::GET, "/users/{user_id}/items/{item_id}", "read_user_item", read_user_item)
            .params(&[OWNER_ID, ITEM_ID, Q, SHORT]),
    ]
}

pub fn read_users(
    _req: &Request,
    _params: &PathParams,
    _state: &AppState,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::ok_json(&["Rick", "Morty"]))
}

pub fn read_user_me(
    _req: &Request,
    _params: &PathParams,
    _state: &AppState,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::ok_json(&json!({"user_id": "the current user"})))
}

pub fn read_user(
    req: &Request,
    params: &PathParams,
    _state: &AppState,
) -> Result<HttpResponse, ApiError> {
    let mut args = Arguments::new(req, params);
    let user_id = args.required::<String>(&USER_ID);
    let user_id = args.finish(user_id)?;

    Ok(HttpResponse::ok_json(&json!({ "user_id": user_id })))
}

pub fn read_user_item(
    req: &Request,
    params: &PathParams,
    _state: &AppState,
) -> Result<HttpResponse, ApiError> {
    let mut args = Arguments::new(req, params);
    let user_id = args.required::<i64>(&OWNER_ID);
    let item_id = args.required::<String>(&ITEM_ID);
    let q = args.optional::<String>(&Q);
    let short = args.required::<bool>(&SHORT);
    let (user_id, item_id, q, short) = args.finish((user_id, item_id, q, short))?;

    let mut item = Map::new();
    item.insert("item_id".to_string(), json!(item_id));
    item.insert("owner_id".to_string(), json!(user_id));
    describe(&mut item, q, short);
    Ok(HttpResponse::ok_json(&item))
}

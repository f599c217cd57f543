//! `/items/` routes

use http::Method;
use serde_json::{json, Map, Value};

use crate::app::AppState;
use crate::http::{ApiError, HttpResponse, PathParams, Request, Route};
use crate::models::Item;
use crate::params::{Arguments, ParamKind, ParamSpec};

pub const LONG_DESCRIPTION: &str = "This is an amazing item that has a long description";

pub const SKIP: ParamSpec = ParamSpec::query("skip", ParamKind::Integer).default_int(0).ge(0);
pub const LIMIT: ParamSpec = ParamSpec::query("limit", ParamKind::Integer).default_int(10).ge(0);
pub const FIXED_Q: ParamSpec = ParamSpec::query("q", ParamKind::String)
    .optional()
    .min_length(3)
    .max_length(50)
    .pattern("^fixedquery$");
pub const ITEM_ID: ParamSpec = ParamSpec::path("item_id", ParamKind::Integer);
pub const Q: ParamSpec = ParamSpec::query("q", ParamKind::String).optional();
pub const SHORT: ParamSpec = ParamSpec::query("short", ParamKind::Boolean).default_bool(false);

pub fn routes() -> Vec<Route<AppState>> {
    vec![
        Route::new(Method::GET, "/items/", "read_items", read_items)
            .params(&[SKIP, LIMIT, FIXED_Q]),
        Route::new(Method::POST, "/items/", "create_item", create_item)
            .body::<Item>(),
        Route::new(Method::GET, "/items/{item_id}", "read_item", read_item)
            .params(&[ITEM_ID, Q, SHORT]),
        Route::new(Method::PUT, "/items/{item_id}", "update_item", update_item)
            .params(&[ITEM_ID, Q])
            .body::<Item>(),
    ]
}

/// Page through the fake items
pub fn read_items(
    req: &Request,
    params: &PathParams,
    state: &AppState,
) -> Result<HttpResponse, ApiError> {
    let mut args = Arguments::new(req, params);
    let skip = args.required::<i64>(&SKIP);
    let limit = args.required::<i64>(&LIMIT);
    let q = args.optional::<String>(&FIXED_Q);
    let (skip, limit, q) = args.finish((skip, limit, q))?;

    let items: Vec<_> = state
        .fake_items
        .iter()
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect();

    let mut results = Map::new();
    results.insert("items".to_string(), json!(items));
    if let Some(q) = q {
        results.insert("q".to_string(), Value::String(q));
    }
    Ok(HttpResponse::ok_json(&results))
}

/// Echo the item, adding `price_with_tax` when a tax is given
pub fn create_item(
    req: &Request,
    params: &PathParams,
    _state: &AppState,
) -> Result<HttpResponse, ApiError> {
    let mut args = Arguments::new(req, params);
    let item = args.body::<Item>();
    let item = args.finish(item)?;

    let mut body = item_object(&item)?;
    if let Some(price_with_tax) = item.price_with_tax() {
        body.insert("price_with_tax".to_string(), json!(price_with_tax));
    }
    Ok(HttpResponse::ok_json(&body))
}

pub fn read_item(
    req: &Request,
    params: &PathParams,
    _state: &AppState,
) -> Result<HttpResponse, ApiError> {
    let mut args = Arguments::new(req, params);
    let item_id = args.required::<i64>(&ITEM_ID);
    let q = args.optional::<String>(&Q);
    let short = args.required::<bool>(&SHORT);
    let (item_id, q, short) = args.finish((item_id, q, short))?;

    let mut item = Map::new();
    item.insert("item_id".to_string(), json!(item_id));
    describe(&mut item, q, short);
    Ok(HttpResponse::ok_json(&item))
}

pub fn update_item(
    req: &Request,
    params: &PathParams,
    _state: &AppState,
) -> Result<HttpResponse, ApiError> {
    let mut args = Arguments::new(req, params);
    let item_id = args.required::<i64>(&ITEM_ID);
    let q = args.optional::<String>(&Q);
    let item = args.body::<Item>();
    let (item_id, q, item) = args.finish((item_id, q, item))?;

    let mut result = Map::new();
    result.insert("item_id".to_string(), json!(item_id));
    result.extend(item_object(&item)?);
    if let Some(q) = q {
        result.insert("q".to_string(), Value::String(q));
    }
    Ok(HttpResponse::ok_json(&result))
}

/// Add `q` when given and the long description unless `short`
pub(crate) fn describe(item: &mut Map<String, Value>, q: Option<String>, short: bool) {
    if let Some(q) = q {
        item.insert("q".to_string(), Value::String(q));
    }
    if !short {
        item.insert("description".to_string(), Value::from(LONG_DESCRIPTION));
    }
}

fn item_object(item: &Item) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(item) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::Internal("item did not serialize to an object".to_string())),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

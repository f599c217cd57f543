//! `/models/{model_name}`

use http::Method;
use serde_json::json;

use crate::app::AppState;
use crate::http::{ApiError, HttpResponse, PathParams, Request, Route};
use crate::models::ModelName;
use crate::params::{Arguments, ParamKind, ParamSpec};

pub const MODEL_NAME: ParamSpec = ParamSpec::path(
    "model_name",
    ParamKind::Enum { schema: "ModelName", values: ModelName::VALUES },
);

pub fn routes() -> Vec<Route<AppState>> {
    vec![Route::new(Method::GET, "/models/{model_name}", "get_model", get_model)
        .params(&[MODEL_NAME])]
}

pub fn get_model(
    req: &Request,
    params: &PathParams,
    _state: &AppState,
) -> Result<HttpResponse, ApiError> {
    let mut args = Arguments::new(req, params);
    let model_name = args.required::<ModelName>(&MODEL_NAME);
    let model_name = args.finish(model_name)?;

    Ok(HttpResponse::ok_json(&json!({
        "model_name": model_name,
        "message": model_name.message(),
    })))
}

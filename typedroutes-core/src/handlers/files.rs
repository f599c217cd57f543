//! `/files/{file_path:path}`

use http::Method;
use serde_json::json;

use crate::app::AppState;
use crate::http::{ApiError, HttpResponse, PathParams, Request, Route};
use crate::params::{Arguments, ParamKind, ParamSpec};

pub const FILE_PATH: ParamSpec = ParamSpec::path("file_path", ParamKind::Path);

pub fn routes() -> Vec<Route<AppState>> {
    vec![Route::new(Method::GET, "/files/{file_path:path}", "read_file", read_file)
        .params(&[FILE_PATH])]
}

/// Echo the captured path; a leading `/` is kept
pub fn read_file(
    req: &Request,
    params: &PathParams,
    _state: &AppState,
) -> Result<HttpResponse, ApiError> {
    let mut args = Arguments::new(req, params);
    let file_path = args.required::<String>(&FILE_PATH);
    let file_path = args.finish(file_path)?;

    Ok(HttpResponse::ok_json(&json!({ "file_path": file_path })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_file_echoes_path() {
        let params: PathParams =
            [("file_path".to_string(), "/home/johndoe/myfile.txt".to_string())].into_iter().collect();
        let response =
            read_file(&Request::get("/files//home/johndoe/myfile.txt"), &params, &AppState::default())
                .unwrap();
        assert_eq!(response.json_body().unwrap(), json!({"file_path": "/home/johndoe/myfile.txt"}));
    }
}

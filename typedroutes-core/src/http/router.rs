//! HTTP routing and request dispatching
//!
//! Routes are declared with path templates such as `/items/{item_id}` or
//! `/files/{file_path:path}`. The router tries them in registration order and
//! the first route matching both path and method handles the request.
//!
//! When no route matches fully:
//! - a path that some route accepts with another method gets `405` and `Allow`,
//! - otherwise, if redirect-slashes is on, a path that matches once its
//!   trailing slash is toggled gets a `307` to that path,
//! - otherwise `404`.

use http::Method;
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{detail, method_not_allowed};
use super::{ApiError, HttpResponse, Request};
use crate::params::ParamSpec;

/// Path parameters extracted from dynamic routes
pub type PathParams = HashMap<String, String>;

/// Route handler function type
///
/// Handlers receive the request, path parameters, and state (read-only), and
/// return a response or an error the router renders.
pub type RouteHandler<S> =
    Arc<dyn Fn(&Request, &PathParams, &S) -> Result<HttpResponse, ApiError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    /// `{name}`: exactly one non-empty segment
    Param(String),
    /// `{name:path}`: the rest of the path, slashes included
    Rest(String),
}

/// A parsed route template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Self {
        let parts: Vec<&str> = template.split('/').collect();
        let last = parts.len().saturating_sub(1);

        let segments = parts
            .iter()
            .enumerate()
            .map(|(i, part)| match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(inner) => match inner.split_once(':') {
                    Some((name, "path")) if i == last => Segment::Rest(name.to_string()),
                    Some((name, _)) => Segment::Param(name.to_string()),
                    None => Segment::Param(inner.to_string()),
                },
                None => Segment::Static(part.to_string()),
            })
            .collect();

        Self { raw: template.to_string(), segments }
    }

    /// The template as registered
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The template in OpenAPI form: `{file_path:path}` becomes `{file_path}`
    pub fn openapi_path(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Static(s) => s.clone(),
                Segment::Param(name) | Segment::Rest(name) => format!("{{{}}}", name),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Names of the template's parameters, in order
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Static(_) => None,
                Segment::Param(name) | Segment::Rest(name) => Some(name.as_str()),
            })
            .collect()
    }

    /// Match a decoded path, returning its parameters
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let path_parts: Vec<&str> = path.split('/').collect();
        let mut params = HashMap::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Rest(name) => {
                    // "/files" has no segment for the capture; "/files/" captures ""
                    let rest = path_parts.get(i..).filter(|r| !r.is_empty())?.join("/");
                    params.insert(name.clone(), rest);
                    return Some(params);
                }
                Segment::Static(expected) => {
                    if path_parts.get(i) != Some(&expected.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = path_parts.get(i).filter(|v| !v.is_empty())?;
                    params.insert(name.clone(), value.to_string());
                }
            }
        }

        if path_parts.len() != self.segments.len() {
            return None;
        }

        Some(params)
    }
}

/// Documentation attached to a route, consumed by the OpenAPI generator
#[derive(Debug, Clone, Default)]
pub struct RouteDoc {
    pub params: Vec<ParamSpec>,
    /// Component name of the JSON request body model
    pub body: Option<String>,
    pub include_in_schema: bool,
}

/// A single route definition
#[derive(Clone)]
pub struct Route<S> {
    method: Method,
    template: PathTemplate,
    name: String,
    handler: RouteHandler<S>,
    doc: RouteDoc,
}

impl<S> Route<S> {
    /// Create a new route; `name` identifies the handler in docs and logs
    pub fn new<F>(method: Method, pattern: &str, name: &str, handler: F) -> Self
    where
        F: Fn(&Request, &PathParams, &S) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    {
        Self {
            method,
            template: PathTemplate::parse(pattern),
            name: name.to_string(),
            handler: Arc::new(handler),
            doc: RouteDoc { include_in_schema: true, ..RouteDoc::default() },
        }
    }

    /// Declare the parameters the handler extracts
    pub fn params(mut self, params: &[ParamSpec]) -> Self {
        self.doc.params.extend_from_slice(params);
        self
    }

    /// Declare a JSON request body of the given model
    pub fn body<T: utoipa::ToSchema>(mut self) -> Self {
        self.doc.body = Some(T::name().into_owned());
        self
    }

    /// Leave this route out of the OpenAPI document
    pub fn hidden(mut self) -> Self {
        self.doc.include_in_schema = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> &RouteDoc {
        &self.doc
    }

    /// Execute this route, rendering handler errors
    pub fn execute(&self, request: &Request, params: &PathParams, state: &S) -> HttpResponse {
        match (self.handler)(request, params, state) {
            Ok(response) => response,
            Err(error) => {
                log::debug!("{} {} -> {}", self.method, self.template.as_str(), error);
                error.into_response()
            }
        }
    }
}

impl<S> std::fmt::Debug for Route<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.template.as_str())
            .field("name", &self.name)
            .finish()
    }
}

/// HTTP router for dispatching requests to handlers
pub struct Router<S = ()> {
    routes: Vec<Route<S>>,
    redirect_slashes: bool,
}

impl<S> Router<S> {
    pub fn new() -> Self {
        Self { routes: Vec::new(), redirect_slashes: true }
    }

    /// Enable or disable trailing-slash redirects
    pub fn redirect_slashes(mut self, enabled: bool) -> Self {
        self.redirect_slashes = enabled;
        self
    }

    /// Add a route to the router
    pub fn route(mut self, route: Route<S>) -> Self {
        self.routes.push(route);
        self
    }

    /// Add a GET route
    pub fn get<F>(self, pattern: &str, name: &str, handler: F) -> Self
    where
        F: Fn(&Request, &PathParams, &S) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    {
        self.route(Route::new(Method::GET, pattern, name, handler))
    }

    /// Add a POST route
    pub fn post<F>(self, pattern: &str, name: &str, handler: F) -> Self
    where
        F: Fn(&Request, &PathParams, &S) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    {
        self.route(Route::new(Method::POST, pattern, name, handler))
    }

    /// Add a PUT route
    pub fn put<F>(self, pattern: &str, name: &str, handler: F) -> Self
    where
        F: Fn(&Request, &PathParams, &S) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    {
        self.route(Route::new(Method::PUT, pattern, name, handler))
    }

    /// Handle a request and return a response
    pub fn handle(&self, request: &Request, state: &S) -> HttpResponse {
        let path = request.decoded_path();
        let mut allowed: Vec<&str> = Vec::new();

        for route in &self.routes {
            if let Some(params) = route.template.matches(&path) {
                if route.method == *request.method() {
                    return route.execute(request, &params, state);
                }
                if !allowed.contains(&route.method.as_str()) {
                    allowed.push(route.method.as_str());
                }
            }
        }

        if !allowed.is_empty() {
            return method_not_allowed(&allowed.join(", "));
        }

        if self.redirect_slashes && path != "/" {
            let toggled = toggle_trailing_slash(request.path());
            let toggled_decoded = toggle_trailing_slash(&path);
            if self.routes.iter().any(|route| route.template.matches(&toggled_decoded).is_some()) {
                let location = match request.query_string() {
                    Some(query) => format!("{}?{}", toggled, query),
                    None => toggled,
                };
                return HttpResponse::redirect(&location);
            }
        }

        detail(http::StatusCode::NOT_FOUND, "Not Found")
    }

    /// All routes, in registration order
    pub fn routes(&self) -> &[Route<S>] {
        &self.routes
    }

    /// Get the number of registered routes
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

impl<S> Default for Router<S> {
    fn default() -> Self {
        Self::new()
    }
}

fn toggle_trailing_slash(path: &str) -> String {
    match path.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => format!("{}/", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn echo(name: &'static str) -> impl Fn(&Request, &PathParams, &()) -> Result<HttpResponse, ApiError> {
        move |_req, params, _state| {
            Ok(HttpResponse::ok_json(&serde_json::json!({ "route": name, "params": params })))
        }
    }

    fn routed(router: &Router, request: Request) -> serde_json::Value {
        router.handle(&request, &()).json_body().unwrap()
    }

    #[test]
    fn test_route_pattern_matching() {
        let template = PathTemplate::parse("/users/{user_id}");
        let params = template.matches("/users/123").unwrap();
        assert_eq!(params.get("user_id"), Some(&"123".to_string()));
        assert!(template.matches("/users/").is_none());
        assert!(template.matches("/users/1/items").is_none());
    }

    #[test]
    fn test_path_parameter_extraction() {
        let template = PathTemplate::parse("/users/{user_id}/items/{item_id}");
        let params = template.matches("/users/3/items/foo").unwrap();
        assert_eq!(params.get("user_id"), Some(&"3".to_string()));
        assert_eq!(params.get("item_id"), Some(&"foo".to_string()));
        assert_eq!(template.param_names(), vec!["user_id", "item_id"]);
    }

    #[test]
    fn test_static_route_matching() {
        let template = PathTemplate::parse("/items/");
        assert!(template.matches("/items/").unwrap().is_empty());
        assert!(template.matches("/items").is_none());
    }

    #[test]
    fn test_path_converter_captures_slashes() {
        let template = PathTemplate::parse("/files/{file_path:path}");
        let params = template.matches("/files//home/johndoe/myfile.txt").unwrap();
        assert_eq!(params.get("file_path"), Some(&"/home/johndoe/myfile.txt".to_string()));

        let params = template.matches("/files/a/b").unwrap();
        assert_eq!(params.get("file_path"), Some(&"a/b".to_string()));

        let params = template.matches("/files/").unwrap();
        assert_eq!(params.get("file_path"), Some(&String::new()));

        assert!(template.matches("/files").is_none());
        assert_eq!(template.openapi_path(), "/files/{file_path}");
    }

    #[test]
    fn test_first_registered_route_wins() {
        let router = Router::<()>::new()
            .get("/users/me", "read_user_me", echo("me"))
            .get("/users/{user_id}", "read_user", echo("user"));

        assert_eq!(routed(&router, Request::get("/users/me"))["route"], "me");
        assert_eq!(routed(&router, Request::get("/users/42"))["route"], "user");
    }

    #[test]
    fn test_method_not_allowed() {
        let router = Router::<()>::new()
            .get("/items/{item_id}", "read_item", echo("read"))
            .put("/items/{item_id}", "update_item", echo("update"));

        let response = router.handle(&Request::new(Method::DELETE, "/items/1"), &());
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.header("allow"), Some("GET, PUT"));
        assert_eq!(response.json_body().unwrap()["detail"], "Method Not Allowed");
    }

    #[test]
    fn test_not_found() {
        let router = Router::<()>::new().get("/users", "read_users", echo("users"));
        let response = router.handle(&Request::get("/nothing/here"), &());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.json_body().unwrap()["detail"], "Not Found");
    }

    #[test]
    fn test_redirect_slashes_keeps_query() {
        let router = Router::<()>::new().get("/items/", "read_items", echo("items"));
        let response = router.handle(&Request::get("/items?skip=1"), &());
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.header("location"), Some("/items/?skip=1"));

        let router = Router::<()>::new().get("/users", "read_users", echo("users"));
        let response = router.handle(&Request::get("/users/"), &());
        assert_eq!(response.header("location"), Some("/users"));
    }

    #[test]
    fn test_redirect_slashes_disabled() {
        let router =
            Router::<()>::new().redirect_slashes(false).get("/items/", "read_items", echo("items"));
        let response = router.handle(&Request::get("/items"), &());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_percent_encoded_path_is_decoded_before_matching() {
        let router = Router::<()>::new().get("/users/{user_id}", "read_user", echo("user"));
        let body = routed(&router, Request::get("/users/john%20doe"));
        assert_eq!(body["params"]["user_id"], "john doe");
    }

    #[test]
    fn test_handler_errors_are_rendered() {
        let router = Router::<()>::new().get("/broken", "broken", |_req, _params, _state| {
            Err(ApiError::NotFound("thing".to_string()))
        });
        let response = router.handle(&Request::get("/broken"), &());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

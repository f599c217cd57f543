//! OpenAPI document generation and the interactive docs pages
//!
//! The document is derived from the router's route table: every visible
//! route contributes one operation, its [`ParamSpec`]s become parameters and
//! its body model becomes a JSON request body referencing the component
//! schema. Components come from the models' `utoipa::ToSchema` derives.

use utoipa::openapi::path::{
    HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder,
};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::schema::{ObjectBuilder, SchemaFormat, SchemaType, Type};
use utoipa::openapi::{
    ComponentsBuilder, ContentBuilder, InfoBuilder, OpenApi, OpenApiBuilder, PathsBuilder, Ref,
    RefOr, Required, ResponseBuilder, Schema,
};

use crate::config::DocsConfig;
use crate::hints::title_case;
use crate::http::constants::content_types;
use crate::http::{HttpResponse, Route, Router};
use crate::models::{Item, ModelName};
use crate::params::{ParamKind, ParamLocation, ParamSpec};
use crate::validation::{HttpValidationError, ValidationError};

const VALIDATION_ERROR_SCHEMA: &str = "HTTPValidationError";

/// `operationId`: handler name and path template with non-word characters as `_`, then the method
pub fn operation_id(name: &str, path: &str, method: &http::Method) -> String {
    let raw: String = format!("{}{}", name, path)
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{}_{}", raw, method.as_str().to_ascii_lowercase())
}

/// `summary`: the handler name as words, title-cased
pub fn summary(name: &str) -> String {
    title_case(&name.replace('_', " "))
}

fn http_method(method: &http::Method) -> Option<HttpMethod> {
    const METHODS: [(http::Method, HttpMethod); 8] = [
        (http::Method::GET, HttpMethod::Get),
        (http::Method::POST, HttpMethod::Post),
        (http::Method::PUT, HttpMethod::Put),
        (http::Method::DELETE, HttpMethod::Delete),
        (http::Method::PATCH, HttpMethod::Patch),
        (http::Method::HEAD, HttpMethod::Head),
        (http::Method::OPTIONS, HttpMethod::Options),
        (http::Method::TRACE, HttpMethod::Trace),
    ];
    METHODS.into_iter().find(|(m, _)| m == method).map(|(_, h)| h)
}

fn json_schema_ref(name: &str) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(name))
}

fn param_schema(spec: &ParamSpec) -> RefOr<Schema> {
    let kind = match spec.kind {
        ParamKind::Enum { schema, .. } => return json_schema_ref(schema),
        ParamKind::Integer => Type::Integer,
        ParamKind::Boolean => Type::Boolean,
        ParamKind::String | ParamKind::Path => Type::String,
    };

    let nullable = !spec.required && spec.default.is_none();
    let schema_type = if nullable {
        SchemaType::Array(vec![kind, Type::Null])
    } else {
        SchemaType::Type(kind)
    };

    let mut builder = ObjectBuilder::new()
        .schema_type(schema_type)
        .title(Some(summary(spec.name)))
        .min_length(spec.string.min_length)
        .max_length(spec.string.max_length)
        .pattern(spec.string.pattern)
        .default(spec.default.map(|d| d.to_json()));
    if spec.kind == ParamKind::Path {
        builder = builder.format(Some(SchemaFormat::Custom("path".to_string())));
    }

    RefOr::T(Schema::Object(builder.build()))
}

fn parameter_in(location: ParamLocation) -> ParameterIn {
    match location {
        ParamLocation::Path => ParameterIn::Path,
        ParamLocation::Query => ParameterIn::Query,
    }
}

fn operation<S>(route: &Route<S>) -> Operation {
    let doc = route.doc();
    let path = route.template().openapi_path();

    let mut builder = OperationBuilder::new()
        .operation_id(Some(operation_id(route.name(), &path, route.method())))
        .summary(Some(summary(route.name())));

    for spec in &doc.params {
        let parameter = ParameterBuilder::new()
            .name(spec.name)
            .parameter_in(parameter_in(spec.location))
            .required(if spec.required { Required::True } else { Required::False })
            .schema(Some(param_schema(spec)))
            .build();
        builder = builder.parameter(parameter);
    }

    if let Some(body) = &doc.body {
        let content = ContentBuilder::new().schema(Some(json_schema_ref(body))).build();
        let request_body = RequestBodyBuilder::new()
            .content(content_types::JSON, content)
            .required(Some(Required::True))
            .build();
        builder = builder.request_body(Some(request_body));
    }

    let any_json = ContentBuilder::new()
        .schema(Some(RefOr::T(Schema::Object(ObjectBuilder::new().build()))))
        .build();
    builder = builder.response(
        "200",
        RefOr::T(
            ResponseBuilder::new()
                .description("Successful Response")
                .content(content_types::JSON, any_json)
                .build(),
        ),
    );

    if !doc.params.is_empty() || doc.body.is_some() {
        let content =
            ContentBuilder::new().schema(Some(json_schema_ref(VALIDATION_ERROR_SCHEMA))).build();
        builder = builder.response(
            "422",
            RefOr::T(
                ResponseBuilder::new()
                    .description("Validation Error")
                    .content(content_types::JSON, content)
                    .build(),
            ),
        );
    }

    builder.build()
}

/// Build the OpenAPI document for every route not marked hidden
pub fn build_document<S>(router: &Router<S>, docs: &DocsConfig) -> OpenApi {
    // Operations grouped per path, paths in first-registration order
    let mut grouped: Vec<(String, Vec<(HttpMethod, Operation)>)> = Vec::new();

    for route in router.routes().iter().filter(|r| r.doc().include_in_schema) {
        let Some(method) = http_method(route.method()) else {
            log::warn!("Route {} uses a method OpenAPI cannot describe", route.name());
            continue;
        };
        let path = route.template().openapi_path();
        let idx = match grouped.iter().position(|(p, _)| *p == path) {
            Some(idx) => idx,
            None => {
                grouped.push((path, Vec::new()));
                grouped.len() - 1
            }
        };
        grouped[idx].1.push((method, operation(route)));
    }

    let paths = grouped
        .into_iter()
        .fold(PathsBuilder::new(), |paths, (path, operations)| {
            let item = operations
                .into_iter()
                .fold(PathItemBuilder::new(), |item, (method, op)| item.operation(method, op))
                .build();
            paths.path(path, item)
        })
        .build();

    let components = ComponentsBuilder::new()
        .schema_from::<Item>()
        .schema_from::<ModelName>()
        .schema_from::<ValidationError>()
        .schema_from::<HttpValidationError>()
        .build();

    OpenApiBuilder::new()
        .info(InfoBuilder::new().title(docs.title.clone()).version(docs.version.clone()).build())
        .paths(paths)
        .components(Some(components))
        .build()
}

/// Render the document as JSON
pub fn render_document(document: &OpenApi, pretty: bool) -> crate::Result<String> {
    let rendered = if pretty { document.to_pretty_json() } else { document.to_json() };
    Ok(rendered?)
}

/// Swagger UI page loading the document from `openapi_url`
pub fn swagger_ui_html(title: &str, openapi_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<link type="text/css" rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
<title>{title} - Swagger UI</title>
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
<script>
const ui = SwaggerUIBundle({{
    url: '{openapi_url}',
    dom_id: '#swagger-ui',
    layout: 'BaseLayout',
    deepLinking: true,
    showExtensions: true,
    showCommonExtensions: true,
    presets: [SwaggerUIBundle.presets.apis, SwaggerUIBundle.SwaggerUIStandalonePreset],
}})
</script>
</body>
</html>
"#
    )
}

/// ReDoc page loading the document from `openapi_url`
pub fn redoc_html(title: &str, openapi_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>{title} - ReDoc</title>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>body {{ margin: 0; padding: 0; }}</style>
</head>
<body>
<noscript>ReDoc requires Javascript to function. Please enable it to browse the documentation.</noscript>
<redoc spec-url="{openapi_url}"></redoc>
<script src="https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js"></script>
</body>
</html>
"#
    )
}

/// Add the document and docs page routes, hidden from the document itself
///
/// The document is built from the routes present before mounting.
pub fn mount<S: 'static>(router: Router<S>, docs: &DocsConfig) -> crate::Result<Router<S>> {
    if !docs.enabled {
        return Ok(router);
    }

    for url in [&docs.openapi_url, &docs.docs_url, &docs.redoc_url] {
        if let Some(route) = router.routes().iter().find(|route| route.template().matches(url).is_some()) {
            return Err(crate::Error::Config(format!(
                "Docs URL {} is already served by route {}",
                url,
                route.name()
            )));
        }
    }

    let document = render_document(&build_document(&router, docs), false)?;
    let swagger = swagger_ui_html(&docs.title, &docs.openapi_url);
    let redoc = redoc_html(&docs.title, &docs.openapi_url);

    let router = router
        .route(
            Route::new(http::Method::GET, &docs.openapi_url, "openapi", move |_req, _params, _state| {
                Ok(HttpResponse::raw_json(http::StatusCode::OK, document.clone()))
            })
            .hidden(),
        )
        .route(
            Route::new(http::Method::GET, &docs.docs_url, "swagger_ui_html", move |_req, _params, _state| {
                Ok(HttpResponse::html(http::StatusCode::OK, swagger.clone()))
            })
            .hidden(),
        )
        .route(
            Route::new(http::Method::GET, &docs.redoc_url, "redoc_html", move |_req, _params, _state| {
                Ok(HttpResponse::html(http::StatusCode::OK, redoc.clone()))
            })
            .hidden(),
        );

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Request;

    #[test]
    fn test_operation_id() {
        assert_eq!(operation_id("read_items", "/items/", &http::Method::GET), "read_items_items__get");
        assert_eq!(
            operation_id("read_user_item", "/users/{user_id}/items/{item_id}", &http::Method::GET),
            "read_user_item_users__user_id__items__item_id__get"
        );
        assert_eq!(
            operation_id("update_item", "/items/{item_id}", &http::Method::PUT),
            "update_item_items__item_id__put"
        );
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary("read_user_me"), "Read User Me");
    }

    #[test]
    fn test_mount_serves_docs() {
        let router = Router::<()>::new().get("/users", "read_users", |_req, _params, _state| {
            Ok(HttpResponse::ok_json(&["Rick"]))
        });
        let router = mount(router, &DocsConfig::default()).unwrap();

        let response = router.handle(&Request::get("/openapi.json"), &());
        let document = response.json_body().unwrap();
        assert_eq!(document["info"]["title"], "TypedRoutes");
        assert!(document["paths"]["/users"]["get"].is_object());
        assert!(document["paths"].get("/docs").is_none());

        let response = router.handle(&Request::get("/docs"), &());
        assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
        assert!(String::from_utf8_lossy(response.body_bytes()).contains("/openapi.json"));

        let response = router.handle(&Request::get("/redoc"), &());
        assert!(String::from_utf8_lossy(response.body_bytes()).contains("redoc"));
    }

    #[test]
    fn test_docs_url_colliding_with_route() {
        let router = Router::<()>::new().get("/users/{user_id}", "read_user", |_req, _params, _state| {
            Ok(HttpResponse::ok_json(&["Rick"]))
        });
        let docs = DocsConfig { docs_url: "/users/docs".to_string(), ..DocsConfig::default() };
        let Err(err) = mount(router, &docs) else {
            panic!("docs URL under /users/{{user_id}} should be rejected");
        };
        assert!(matches!(err, crate::Error::Config(_)));
        assert!(err.to_string().contains("read_user"));
    }

    #[test]
    fn test_docs_disabled() {
        let docs = DocsConfig { enabled: false, ..DocsConfig::default() };
        let router = mount(Router::<()>::new(), &docs).unwrap();
        assert_eq!(router.route_count(), 0);
    }
}

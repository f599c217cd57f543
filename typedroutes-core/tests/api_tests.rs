//! Router-level tests of the full API
//!
//! Requests go through `build_router` exactly as the server dispatches them,
//! without a socket.

use http::{Method, StatusCode};
use serde_json::{json, Value};
use typedroutes_core::{build_router, AppState, HttpResponse, Request, TypedRoutesConfig};

fn send(request: Request) -> HttpResponse {
    let router = build_router(&TypedRoutesConfig::default()).unwrap();
    router.handle(&request, &AppState::default())
}

fn get(target: &str) -> (StatusCode, Value) {
    let response = send(Request::get(target));
    (response.status(), response.json_body().unwrap_or(Value::Null))
}

fn send_json(method: Method, target: &str, body: Value) -> (StatusCode, Value) {
    let response = send(Request::new(method, target).with_json(&body));
    (response.status(), response.json_body().unwrap())
}

fn detail_types(body: &Value) -> Vec<&str> {
    body["detail"].as_array().unwrap().iter().map(|e| e["type"].as_str().unwrap()).collect()
}

#[test]
fn read_items_defaults() {
    let (status, body) = get("/items/");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"items": [{"item_name": "Foo"}, {"item_name": "Bar"}, {"item_name": "Baz"}]})
    );
}

#[test]
fn read_items_paging_and_query() {
    let (status, body) = get("/items/?skip=1&limit=1&q=fixedquery");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"items": [{"item_name": "Bar"}], "q": "fixedquery"}));
}

#[test]
fn read_items_query_constraints() {
    let (status, body) = get("/items/?q=ab");
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"detail": [{
            "type": "string_too_short",
            "loc": ["query", "q"],
            "msg": "String should have at least 3 characters",
            "input": "ab",
            "ctx": {"min_length": 3}
        }]})
    );

    let (_, body) = get("/items/?q=notfixed");
    assert_eq!(body["detail"][0]["type"], "string_pattern_mismatch");
    assert_eq!(body["detail"][0]["ctx"]["pattern"], "^fixedquery$");

    let (_, body) = get(&format!("/items/?q={}", "x".repeat(51)));
    assert_eq!(body["detail"][0]["type"], "string_too_long");
}

#[test]
fn read_items_reports_every_bad_parameter() {
    let (status, body) = get("/items/?skip=abc&limit=-1");
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(detail_types(&body), vec!["int_parsing", "greater_than_equal"]);
    assert_eq!(
        body["detail"][0]["msg"],
        "Input should be a valid integer, unable to parse string as an integer"
    );
}

#[test]
fn create_item_echoes_with_tax() {
    let (status, body) =
        send_json(Method::POST, "/items/", json!({"name": "Foo", "price": 50.5, "tax": 4.5}));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"name": "Foo", "description": null, "price": 50.5, "tax": 4.5, "price_with_tax": 55.0})
    );
}

#[test]
fn create_item_without_tax() {
    let (_, body) = send_json(
        Method::POST,
        "/items/",
        json!({"name": "Foo", "description": "A thing", "price": "12.5"}),
    );
    assert_eq!(body, json!({"name": "Foo", "description": "A thing", "price": 12.5, "tax": null}));
}

#[test]
fn create_item_field_errors() {
    let (status, body) = send_json(Method::POST, "/items/", json!({"price": "free"}));
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(detail_types(&body), vec!["missing", "float_parsing"]);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "name"]));
    assert_eq!(body["detail"][1]["loc"], json!(["body", "price"]));
    assert_eq!(body["detail"][1]["input"], "free");
}

#[test]
fn create_item_body_shape_errors() {
    let response = send(Request::new(Method::POST, "/items/"));
    let body = response.json_body().unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "missing");
    assert_eq!(body["detail"][0]["loc"], json!(["body"]));

    let response = send(Request::new(Method::POST, "/items/").with_body("{\"name\": "));
    let body = response.json_body().unwrap();
    assert_eq!(body["detail"][0]["type"], "json_invalid");
    assert_eq!(body["detail"][0]["loc"][0], "body");
    assert!(body["detail"][0]["loc"][1].is_u64());

    let (_, body) = send_json(Method::POST, "/items/", json!(["not", "an", "object"]));
    assert_eq!(body["detail"][0]["type"], "model_attributes_type");
}

#[test]
fn read_item_long_and_short() {
    let (status, body) = get("/items/42?q=search");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "item_id": 42,
            "q": "search",
            "description": "This is an amazing item that has a long description"
        })
    );

    for word in ["1", "True", "on", "yes"] {
        let (_, body) = get(&format!("/items/42?short={}", word));
        assert_eq!(body, json!({"item_id": 42}), "short={}", word);
    }
}

#[test]
fn read_item_bad_inputs() {
    let (status, body) = get("/items/foo");
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["path", "item_id"]));
    assert_eq!(body["detail"][0]["input"], "foo");

    let (_, body) = get("/items/1?short=maybe");
    assert_eq!(detail_types(&body), vec!["bool_parsing"]);
}

#[test]
fn update_item_merges_body_and_query() {
    let (status, body) = send_json(
        Method::PUT,
        "/items/7?q=note",
        json!({"name": "Bar", "price": 3.5, "tax": 0.5}),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"item_id": 7, "name": "Bar", "description": null, "price": 3.5, "tax": 0.5, "q": "note"})
    );
}

#[test]
fn update_item_collects_path_and_body_errors() {
    let (status, body) = send_json(Method::PUT, "/items/seven", json!({"name": "Bar"}));
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(detail_types(&body), vec!["int_parsing", "missing"]);
}

#[test]
fn users_routes() {
    assert_eq!(get("/users"), (StatusCode::OK, json!(["Rick", "Morty"])));
    assert_eq!(get("/users/me"), (StatusCode::OK, json!({"user_id": "the current user"})));
    assert_eq!(get("/users/alice"), (StatusCode::OK, json!({"user_id": "alice"})));
}

#[test]
fn read_user_item() {
    let (status, body) = get("/users/3/items/abc?short=true");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"item_id": "abc", "owner_id": 3}));

    let (status, _) = get("/users/me/items/abc");
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn get_model_messages() {
    assert_eq!(
        get("/models/alexnet").1,
        json!({"model_name": "alexnet", "message": "Deep Learning FTW!"})
    );
    assert_eq!(get("/models/lenet").1["message"], "LeCNN all the images");
    assert_eq!(get("/models/resnet").1["message"], "Have some residuals");

    let (status, body) = get("/models/vgg16");
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"detail": [{
            "type": "enum",
            "loc": ["path", "model_name"],
            "msg": "Input should be 'alexnet', 'resnet' or 'lenet'",
            "input": "vgg16",
            "ctx": {"expected": "'alexnet', 'resnet' or 'lenet'"}
        }]})
    );
}

#[test]
fn read_file_captures_rest_of_path() {
    assert_eq!(
        get("/files//home/johndoe/myfile.txt"),
        (StatusCode::OK, json!({"file_path": "/home/johndoe/myfile.txt"}))
    );
    assert_eq!(get("/files/a/b%20c.txt").1, json!({"file_path": "a/b c.txt"}));
}

#[test]
fn read_file_without_capture_segment_redirects() {
    let response = send(Request::get("/files"));
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), Some("/files/"));

    assert_eq!(get("/files/"), (StatusCode::OK, json!({"file_path": ""})));
}

#[test]
fn routing_fallbacks() {
    let response = send(Request::new(Method::DELETE, "/users"));
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.header("allow"), Some("GET"));

    let response = send(Request::get("/items?limit=2"));
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), Some("/items/?limit=2"));

    let response = send(Request::get("/users/"));
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), Some("/users"));

    let (status, body) = get("/nowhere");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not Found"}));
}

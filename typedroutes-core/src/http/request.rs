//! HTTP request representation
//!
//! [`Request`] is a fully-read request: method, raw path, parsed query and the
//! collected body. The server builds it from a hyper request; tests build it
//! directly with [`Request::new`].

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method};
use http_body_util::{BodyExt, Limited};
use std::borrow::Cow;

use super::constants::content_types;
use super::ApiError;

/// Parsed query parameters, in the order they appear in the URL
pub type QueryParams = Vec<(String, String)>;

#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    query_params: QueryParams,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Create a request from a method and a request target (`/path?query`)
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (target.to_string(), None),
        };
        let query_params = query.as_deref().map(parse_query).unwrap_or_default();

        Self { method, path, query, query_params, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// Shorthand for a GET request
    pub fn get(target: &str) -> Self {
        Self::new(Method::GET, target)
    }

    /// Set the raw body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a JSON body and its content type
    pub fn with_json(mut self, value: &serde_json::Value) -> Self {
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_types::JSON));
        self.with_body(value.to_string())
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Read a hyper request, enforcing the body size limit
    pub async fn from_hyper<B>(req: hyper::Request<B>, max_body_size: usize) -> Result<Self, ApiError>
    where
        B: hyper::body::Body,
        B::Error: std::error::Error + Send + Sync + 'static,
    {
        let (parts, body) = req.into_parts();

        let declared = parts
            .headers
            .get(http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared.is_some_and(|len| len > max_body_size) {
            return Err(ApiError::PayloadTooLarge { limit: max_body_size });
        }

        let body = match Limited::new(body, max_body_size).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() => {
                return Err(ApiError::PayloadTooLarge { limit: max_body_size });
            }
            Err(e) => {
                return Err(ApiError::BadRequest(format!(
                    "There was an error reading the body: {}",
                    e
                )))
            }
        };

        let target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        let mut request = Self::new(parts.method, &target).with_body(body);
        request.headers = parts.headers;
        Ok(request)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The raw (still percent-encoded) path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The percent-decoded path used for route matching
    pub fn decoded_path(&self) -> Cow<'_, str> {
        urlencoding::decode(&self.path).unwrap_or(Cow::Borrowed(self.path.as_str()))
    }

    /// The raw query string, without the leading `?`
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query_params
    }

    /// Get a query parameter; when a key repeats, the last value wins
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Parse `a=1&b=two+words&flag` into ordered pairs
fn parse_query(query: &str) -> QueryParams {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_and_query() {
        let request = Request::get("/items/?skip=1&limit=2");
        assert_eq!(request.path(), "/items/");
        assert_eq!(request.query_string(), Some("skip=1&limit=2"));
        assert_eq!(request.query_param("skip"), Some("1"));
        assert_eq!(request.query_param("limit"), Some("2"));
        assert_eq!(request.query_param("q"), None);
    }

    #[test]
    fn test_path_without_query() {
        let request = Request::get("/users");
        assert_eq!(request.path(), "/users");
        assert!(request.query_params().is_empty());
        assert_eq!(request.query_string(), None);
    }

    #[test]
    fn test_query_decoding() {
        let request = Request::get("/items/5?q=hello+big%20world&empty=&flag");
        assert_eq!(request.query_param("q"), Some("hello big world"));
        assert_eq!(request.query_param("empty"), Some(""));
        assert_eq!(request.query_param("flag"), Some(""));
    }

    #[test]
    fn test_last_repeated_key_wins() {
        let request = Request::get("/items/5?q=first&q=second");
        assert_eq!(request.query_param("q"), Some("second"));
        assert_eq!(request.query_params().len(), 2);
    }

    #[test]
    fn test_decoded_path() {
        let request = Request::get("/files/home%2Fjohndoe/my%20file.txt");
        assert_eq!(request.decoded_path(), "/files/home/johndoe/my file.txt");
        assert_eq!(request.path(), "/files/home%2Fjohndoe/my%20file.txt");
    }

    #[test]
    fn test_with_json_sets_content_type() {
        let request = Request::new(Method::POST, "/items/")
            .with_json(&serde_json::json!({"name": "Foo", "price": 1.0}));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert!(!request.body().is_empty());
    }

    #[tokio::test]
    async fn test_from_hyper_reads_body() {
        let hyper_request = hyper::Request::builder()
            .method(Method::PUT)
            .uri("/items/3?q=x")
            .body(http_body_util::Full::new(Bytes::from_static(b"{\"name\":\"a\"}")))
            .unwrap();

        let request = Request::from_hyper(hyper_request, 1024).await.unwrap();
        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.path(), "/items/3");
        assert_eq!(request.query_param("q"), Some("x"));
        assert_eq!(request.body(), b"{\"name\":\"a\"}");
    }

    #[tokio::test]
    async fn test_from_hyper_enforces_limit() {
        let hyper_request = hyper::Request::builder()
            .method(Method::POST)
            .uri("/items/")
            .body(http_body_util::Full::new(Bytes::from(vec![b'x'; 64])))
            .unwrap();

        let err = Request::from_hyper(hyper_request, 16).await.unwrap_err();
        assert!(matches!(err, ApiError::PayloadTooLarge { limit: 16 }));
    }
}

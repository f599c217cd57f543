//! HTTP response building
//!
//! [`HttpResponse`] is what handlers produce. It converts into a hyper
//! response at the edge of the server, and stays inspectable for tests.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE, LOCATION};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use serde::Serialize;

use super::constants::content_types;

/// HTTP response builder with fluent API
///
/// # Example
///
/// ```rust
/// use typedroutes_core::http::HttpResponse;
///
/// let response = HttpResponse::ok_json(&serde_json::json!({"user_id": "the current user"}));
/// ```
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    /// Create an empty response with the given status code
    pub fn new(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// JSON response; a value that cannot be serialized becomes a 500
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status).content_type(content_types::JSON).body(body),
            Err(e) => {
                log::error!("Failed to serialize response body: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .content_type(content_types::JSON)
                    .body(r#"{"detail":"Internal Server Error"}"#)
            }
        }
    }

    /// 200 OK with a JSON body
    pub fn ok_json<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::json(StatusCode::OK, value)
    }

    /// JSON response from an already-encoded document
    pub fn raw_json(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(status).content_type(content_types::JSON).body(body)
    }

    /// HTML response
    pub fn html(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(status).content_type(content_types::HTML).body(body)
    }

    /// 307 Temporary Redirect, preserving method and body
    pub fn redirect(location: &str) -> Self {
        Self::new(StatusCode::TEMPORARY_REDIRECT).with_header(LOCATION, location)
    }

    /// Set a header; values that are not valid header text are dropped
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                self.headers.insert(name, v);
            }
            Err(_) => log::warn!("Dropping invalid value for header {}", name),
        }
        self
    }

    fn content_type(self, content_type: &str) -> Self {
        self.with_header(CONTENT_TYPE, content_type)
    }

    fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Parse the body as JSON
    pub fn json_body(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }

    /// Convert into a hyper response
    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut response = hyper::Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

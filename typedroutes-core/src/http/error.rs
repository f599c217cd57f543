//! HTTP error types
//!
//! [`HttpError`] covers the transport: binding, accepting, serving connections.
//! [`ApiError`] is what a route handler returns instead of a response; the router
//! renders it with a uniform JSON shape: `{"detail": ...}`.

use http::StatusCode;

use super::HttpResponse;
use crate::validation::{ValidationError, ValidationErrors};

/// Transport and server errors
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handler outcome that is not a successful response
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request parameters or body failed validation (422)
    #[error("request validation failed with {} error(s)", .0.len())]
    Validation(ValidationErrors),
    /// Resource does not exist (404)
    #[error("{0} not found")]
    NotFound(String),
    /// Body exceeded the configured limit (413)
    #[error("request body too large (limit {limit} bytes)")]
    PayloadTooLarge { limit: usize },
    /// Body could not be read at all (400)
    #[error("malformed request: {0}")]
    BadRequest(String),
    /// Anything the client cannot fix (500)
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Validation(error.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render as a JSON response
    pub fn into_response(self) -> HttpResponse {
        let status = self.status();
        match self {
            ApiError::Validation(errors) => HttpResponse::json(status, &errors.into_body()),
            ApiError::NotFound(_) => detail(status, "Not Found"),
            ApiError::PayloadTooLarge { .. } => detail(status, "Request body too large"),
            ApiError::BadRequest(message) => detail(status, &message),
            ApiError::Internal(message) => {
                log::error!("Internal error while handling request: {}", message);
                detail(status, "Internal Server Error")
            }
        }
    }
}

/// `{"detail": "<message>"}` with the given status
pub fn detail(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::json(status, &serde_json::json!({ "detail": message }))
}

/// 405 Method Not Allowed with Allow header
pub fn method_not_allowed(allowed: &str) -> HttpResponse {
    detail(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
        .with_header(http::header::ALLOW, allowed)
}

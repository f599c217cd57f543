//! Request validation errors
//!
//! Every failure to coerce or validate a path parameter, query parameter or
//! body field becomes one [`ValidationError`]. Extractors collect all of them
//! before giving up, and the router renders the collection as a `422` with the
//! body `{"detail": [ ... ]}`.
//!
//! Error codes and messages follow the pydantic v2 wording so that clients of
//! the tutorial API see the payloads they expect.

pub mod coerce;
pub mod constraints;

pub use coerce::{parse_bool_str, parse_float_str, parse_int_str};
pub use constraints::{IntConstraints, StringConstraints};

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// One element of an error location, e.g. `["body", "price"]` or `["body", "friends", 2]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum LocItem {
    Key(String),
    Index(usize),
}

impl From<&str> for LocItem {
    fn from(key: &str) -> Self {
        LocItem::Key(key.to_string())
    }
}

impl From<String> for LocItem {
    fn from(key: String) -> Self {
        LocItem::Key(key)
    }
}

impl From<usize> for LocItem {
    fn from(index: usize) -> Self {
        LocItem::Index(index)
    }
}

/// What went wrong with a single input value
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Missing,
    IntParsing,
    /// Integral, but outside the 64-bit signed range
    IntParsingSize,
    IntType,
    IntFromFloat,
    FloatParsing,
    FloatType,
    BoolParsing,
    StringType,
    StringTooShort { min_length: usize },
    StringTooLong { max_length: usize },
    StringPatternMismatch { pattern: String },
    GreaterThanEqual { ge: i64 },
    Enum { expected: String },
    ListType,
    DatetimeParsing { error: String },
    JsonInvalid { error: String },
    ModelAttributesType,
}

impl ErrorKind {
    /// Machine-readable error code (the `type` field)
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Missing => "missing",
            ErrorKind::IntParsing => "int_parsing",
            ErrorKind::IntParsingSize => "int_parsing_size",
            ErrorKind::IntType => "int_type",
            ErrorKind::IntFromFloat => "int_from_float",
            ErrorKind::FloatParsing => "float_parsing",
            ErrorKind::FloatType => "float_type",
            ErrorKind::BoolParsing => "bool_parsing",
            ErrorKind::StringType => "string_type",
            ErrorKind::StringTooShort { .. } => "string_too_short",
            ErrorKind::StringTooLong { .. } => "string_too_long",
            ErrorKind::StringPatternMismatch { .. } => "string_pattern_mismatch",
            ErrorKind::GreaterThanEqual { .. } => "greater_than_equal",
            ErrorKind::Enum { .. } => "enum",
            ErrorKind::ListType => "list_type",
            ErrorKind::DatetimeParsing { .. } => "datetime_parsing",
            ErrorKind::JsonInvalid { .. } => "json_invalid",
            ErrorKind::ModelAttributesType => "model_attributes_type",
        }
    }

    /// Human-readable message (the `msg` field)
    pub fn message(&self) -> String {
        match self {
            ErrorKind::Missing => "Field required".to_string(),
            ErrorKind::IntParsing => {
                "Input should be a valid integer, unable to parse string as an integer".to_string()
            }
            ErrorKind::IntParsingSize => {
                "Unable to parse input string as an integer, exceeded maximum size".to_string()
            }
            ErrorKind::IntType => "Input should be a valid integer".to_string(),
            ErrorKind::IntFromFloat => {
                "Input should be a valid integer, got a number with a fractional part".to_string()
            }
            ErrorKind::FloatParsing => {
                "Input should be a valid number, unable to parse string as a number".to_string()
            }
            ErrorKind::FloatType => "Input should be a valid number".to_string(),
            ErrorKind::BoolParsing => {
                "Input should be a valid boolean, unable to interpret input".to_string()
            }
            ErrorKind::StringType => "Input should be a valid string".to_string(),
            ErrorKind::StringTooShort { min_length } => {
                format!("String should have at least {} {}", min_length, characters(*min_length))
            }
            ErrorKind::StringTooLong { max_length } => {
                format!("String should have at most {} {}", max_length, characters(*max_length))
            }
            ErrorKind::StringPatternMismatch { pattern } => {
                format!("String should match pattern '{}'", pattern)
            }
            ErrorKind::GreaterThanEqual { ge } => {
                format!("Input should be greater than or equal to {}", ge)
            }
            ErrorKind::Enum { expected } => format!("Input should be {}", expected),
            ErrorKind::ListType => "Input should be a valid list".to_string(),
            ErrorKind::DatetimeParsing { error } => {
                format!("Input should be a valid datetime, {}", error)
            }
            ErrorKind::JsonInvalid { .. } => "JSON decode error".to_string(),
            ErrorKind::ModelAttributesType => {
                "Input should be a valid dictionary or object to extract fields from".to_string()
            }
        }
    }

    /// Extra context (the optional `ctx` field)
    pub fn context(&self) -> Option<Map<String, Value>> {
        let (key, value) = match self {
            ErrorKind::StringTooShort { min_length } => ("min_length", Value::from(*min_length)),
            ErrorKind::StringTooLong { max_length } => ("max_length", Value::from(*max_length)),
            ErrorKind::StringPatternMismatch { pattern } => ("pattern", Value::from(pattern.clone())),
            ErrorKind::GreaterThanEqual { ge } => ("ge", Value::from(*ge)),
            ErrorKind::Enum { expected } => ("expected", Value::from(expected.clone())),
            ErrorKind::DatetimeParsing { error } | ErrorKind::JsonInvalid { error } => {
                ("error", Value::from(error.clone()))
            }
            _ => return None,
        };

        let mut ctx = Map::new();
        ctx.insert(key.to_string(), value);
        Some(ctx)
    }
}

fn characters(count: usize) -> &'static str {
    if count == 1 {
        "character"
    } else {
        "characters"
    }
}

/// Render enum choices the way the error messages list them: `'a', 'b' or 'c'`
pub fn expected_choices(values: &[&str]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// A single validation failure, serialized as one entry of `detail`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: String,
    #[schema(inline)]
    pub loc: Vec<LocItem>,
    pub msg: String,
    #[schema(value_type = Object)]
    pub input: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub ctx: Option<Map<String, Value>>,
}

impl ValidationError {
    pub fn new(kind: &ErrorKind, loc: Vec<LocItem>, input: Value) -> Self {
        Self {
            kind: kind.code().to_string(),
            loc,
            msg: kind.message(),
            input,
            ctx: kind.context(),
        }
    }

    /// A required value that was not supplied
    pub fn missing(loc: Vec<LocItem>) -> Self {
        Self::new(&ErrorKind::Missing, loc, Value::Null)
    }
}

/// The `422` response body
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(as = HTTPValidationError)]
pub struct HttpValidationError {
    pub detail: Vec<ValidationError>,
}

/// Accumulator for validation failures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_body(self) -> HttpValidationError {
        HttpValidationError { detail: self.errors }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self { errors: vec![error] }
    }
}

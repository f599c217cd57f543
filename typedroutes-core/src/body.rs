//! JSON request body decoding
//!
//! Bodies are decoded in two steps: the raw bytes become a `serde_json::Value`
//! ([`decode_json`]), then the value is validated field by field into the
//! declared model ([`FromJsonValue`]). The second step coerces laxly and
//! reports every failing field, which a plain `serde` derive cannot do.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::validation::coerce::{bool_from_json, float_from_json, int_from_json, string_from_json};
use crate::validation::{ErrorKind, LocItem, ValidationError, ValidationErrors};

/// A type that can be validated out of a JSON value
///
/// On failure the implementation records its errors under `loc` and returns `None`.
pub trait FromJsonValue: Sized {
    fn from_json(value: &Value, loc: &[LocItem], errors: &mut ValidationErrors) -> Option<Self>;
}

fn record<T>(
    result: Result<T, ErrorKind>,
    value: &Value,
    loc: &[LocItem],
    errors: &mut ValidationErrors,
) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(kind) => {
            errors.push(ValidationError::new(&kind, loc.to_vec(), value.clone()));
            None
        }
    }
}

impl FromJsonValue for i64 {
    fn from_json(value: &Value, loc: &[LocItem], errors: &mut ValidationErrors) -> Option<Self> {
        record(int_from_json(value), value, loc, errors)
    }
}

impl FromJsonValue for f64 {
    fn from_json(value: &Value, loc: &[LocItem], errors: &mut ValidationErrors) -> Option<Self> {
        record(float_from_json(value), value, loc, errors)
    }
}

impl FromJsonValue for bool {
    fn from_json(value: &Value, loc: &[LocItem], errors: &mut ValidationErrors) -> Option<Self> {
        record(bool_from_json(value), value, loc, errors)
    }
}

impl FromJsonValue for String {
    fn from_json(value: &Value, loc: &[LocItem], errors: &mut ValidationErrors) -> Option<Self> {
        record(string_from_json(value), value, loc, errors)
    }
}

impl<T: FromJsonValue> FromJsonValue for Vec<T> {
    fn from_json(value: &Value, loc: &[LocItem], errors: &mut ValidationErrors) -> Option<Self> {
        let Value::Array(elements) = value else {
            errors.push(ValidationError::new(&ErrorKind::ListType, loc.to_vec(), value.clone()));
            return None;
        };

        let mut items = Vec::with_capacity(elements.len());
        let mut failed = false;
        for (index, element) in elements.iter().enumerate() {
            let mut element_loc = loc.to_vec();
            element_loc.push(index.into());
            match T::from_json(element, &element_loc, errors) {
                Some(item) => items.push(item),
                None => failed = true,
            }
        }

        (!failed).then_some(items)
    }
}

/// Datetimes as RFC 3339 or `YYYY-MM-DD[T ]HH:MM[:SS[.f]]`; naive values are taken as UTC
impl FromJsonValue for DateTime<Utc> {
    fn from_json(value: &Value, loc: &[LocItem], errors: &mut ValidationErrors) -> Option<Self> {
        record(parse_datetime(value), value, loc, errors)
    }
}

fn parse_datetime(value: &Value) -> Result<DateTime<Utc>, ErrorKind> {
    let Value::String(raw) = value else {
        return Err(ErrorKind::DatetimeParsing { error: "input is not a string".to_string() });
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] =
        &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ErrorKind::DatetimeParsing { error: "invalid datetime format".to_string() })
}

/// Field-by-field access to a JSON object being validated into a model
pub struct ObjectReader<'a> {
    object: &'a Map<String, Value>,
    loc: &'a [LocItem],
    errors: &'a mut ValidationErrors,
    failed: bool,
}

impl<'a> ObjectReader<'a> {
    /// Start reading; a non-object records `model_attributes_type` and yields `None`
    pub fn new(value: &'a Value, loc: &'a [LocItem], errors: &'a mut ValidationErrors) -> Option<Self> {
        match value {
            Value::Object(object) => Some(Self { object, loc, errors, failed: false }),
            _ => {
                errors.push(ValidationError::new(
                    &ErrorKind::ModelAttributesType,
                    loc.to_vec(),
                    value.clone(),
                ));
                None
            }
        }
    }

    fn field_loc(&self, field: &str) -> Vec<LocItem> {
        let mut loc = self.loc.to_vec();
        loc.push(field.into());
        loc
    }

    fn decode<T: FromJsonValue>(&mut self, field: &str, value: &Value) -> Option<T> {
        let loc = self.field_loc(field);
        let decoded = T::from_json(value, &loc, self.errors);
        if decoded.is_none() {
            self.failed = true;
        }
        decoded
    }

    /// A field that must be present and not null
    pub fn required<T: FromJsonValue>(&mut self, field: &str) -> Option<T> {
        match self.object.get(field) {
            Some(value) => self.decode(field, value),
            None => {
                let loc = self.field_loc(field);
                self.errors.push(ValidationError::missing(loc));
                self.failed = true;
                None
            }
        }
    }

    /// A field that may be absent or null
    pub fn optional<T: FromJsonValue>(&mut self, field: &str) -> Option<T> {
        match self.object.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.decode(field, value),
        }
    }

    /// A field that falls back to `default` when absent
    pub fn with_default<T: FromJsonValue>(&mut self, field: &str, default: T) -> Option<T> {
        match self.object.get(field) {
            None => Some(default),
            Some(value) => self.decode(field, value),
        }
    }

    /// True once any field failed; the model must then be discarded
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Finish reading, building the model only if every field succeeded
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Option<T> {
        if self.failed {
            None
        } else {
            build()
        }
    }
}

/// Parse the raw body as JSON
///
/// An empty body is a missing body. Malformed JSON is reported at
/// `["body", <byte offset>]` with the decoder message in `ctx.error`.
pub fn decode_json(body: &[u8]) -> Result<Value, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::missing(vec!["body".into()]));
    }

    serde_json::from_slice(body).map_err(|e| {
        let offset = byte_offset(body, e.line(), e.column());
        ValidationError::new(
            &ErrorKind::JsonInvalid { error: decoder_message(&e) },
            vec!["body".into(), offset.into()],
            Value::Object(Map::new()),
        )
    })
}

/// serde_json reports 1-based line and column; turn them into a 0-based byte offset
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let line_start: usize = body
        .split(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    (line_start + column.saturating_sub(1)).min(body.len())
}

fn decoder_message(error: &serde_json::Error) -> String {
    let full = error.to_string();
    match full.rfind(" at line ") {
        Some(idx) => full[..idx].to_string(),
        None => full,
    }
}

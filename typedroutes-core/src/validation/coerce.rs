//! Lax coercion of raw input into scalar types
//!
//! Path and query parameters always arrive as strings; JSON bodies may carry a
//! number as a string. Both are accepted when the string spells a valid value
//! of the declared type.

use super::ErrorKind;
use serde_json::Value;
use std::num::IntErrorKind;

/// 2^63; `i64::MAX as f64` rounds up to this value
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

const TRUE_WORDS: &[&str] = &["1", "on", "t", "true", "y", "yes"];
const FALSE_WORDS: &[&str] = &["0", "off", "f", "false", "n", "no"];

/// Parse an integer from a string, allowing surrounding whitespace
pub fn parse_int_str(raw: &str) -> Result<i64, ErrorKind> {
    raw.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ErrorKind::IntParsingSize,
        _ => ErrorKind::IntParsing,
    })
}

/// Parse a number from a string, allowing surrounding whitespace
pub fn parse_float_str(raw: &str) -> Result<f64, ErrorKind> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ErrorKind::FloatParsing);
    }
    trimmed.parse::<f64>().map_err(|_| ErrorKind::FloatParsing)
}

/// Parse a boolean from one of the accepted words (case-insensitive)
pub fn parse_bool_str(raw: &str) -> Result<bool, ErrorKind> {
    let lowered = raw.trim().to_ascii_lowercase();
    if TRUE_WORDS.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSE_WORDS.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(ErrorKind::BoolParsing)
    }
}

/// Integer from a JSON value: integers, integral floats and numeric strings
pub fn int_from_json(value: &Value) -> Result<i64, ErrorKind> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(ErrorKind::IntParsingSize)
            } else if let Some(f) = n.as_f64() {
                if f.fract() != 0.0 {
                    Err(ErrorKind::IntFromFloat)
                } else if (-I64_BOUND..I64_BOUND).contains(&f) {
                    Ok(f as i64)
                } else {
                    Err(ErrorKind::IntParsingSize)
                }
            } else {
                Err(ErrorKind::IntType)
            }
        }
        Value::String(s) => parse_int_str(s),
        _ => Err(ErrorKind::IntType),
    }
}

/// Number from a JSON value: any JSON number or a numeric string
pub fn float_from_json(value: &Value) -> Result<f64, ErrorKind> {
    match value {
        Value::Number(n) => n.as_f64().ok_or(ErrorKind::FloatType),
        Value::String(s) => parse_float_str(s),
        _ => Err(ErrorKind::FloatType),
    }
}

/// Strings are never produced from other JSON types
pub fn string_from_json(value: &Value) -> Result<String, ErrorKind> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ErrorKind::StringType),
    }
}

/// Boolean from a JSON value: `true`/`false`, `0`/`1` or one of the accepted words
pub fn bool_from_json(value: &Value) -> Result<bool, ErrorKind> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(ErrorKind::BoolParsing),
        },
        Value::String(s) => parse_bool_str(s),
        _ => Err(ErrorKind::BoolParsing),
    }
}

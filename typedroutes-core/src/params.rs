//! Typed path and query parameters
//!
//! A handler declares each parameter once as a constant [`ParamSpec`]. The
//! same declaration drives extraction (through [`Arguments`]) and the OpenAPI
//! parameter list (through [`crate::http::Route::params`]).
//!
//! Extraction never stops at the first problem: every failing parameter, and
//! the body, is recorded and reported together in one `422`.
//!
//! ```rust,ignore
//! const ITEM_ID: ParamSpec = ParamSpec::path("item_id", ParamKind::Integer);
//! const Q: ParamSpec = ParamSpec::query("q", ParamKind::String).optional();
//!
//! let mut args = Arguments::new(req, params);
//! let item_id = args.required::<i64>(&ITEM_ID);
//! let q = args.optional::<String>(&Q);
//! let (item_id, q) = args.finish((item_id, q))?;
//! ```

use serde_json::Value;

use crate::body::{decode_json, FromJsonValue};
use crate::http::{ApiError, PathParams, Request};
use crate::validation::{
    parse_bool_str, parse_int_str, ErrorKind, IntConstraints, LocItem,
    StringConstraints, ValidationError, ValidationErrors,
};

/// Where a parameter is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
}

impl ParamLocation {
    /// Name used in error locations and in the OpenAPI `in` field
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
        }
    }
}

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Boolean,
    String,
    /// Remainder of the path, slashes included
    Path,
    /// String enum documented as the named component schema
    Enum { schema: &'static str, values: &'static [&'static str] },
}

/// Default applied when an optional parameter is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Int(i64),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_json(&self) -> Value {
        match self {
            DefaultValue::Int(i) => Value::from(*i),
            DefaultValue::Bool(b) => Value::from(*b),
        }
    }
}

/// Declaration of a single path or query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub location: ParamLocation,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<DefaultValue>,
    pub string: StringConstraints,
    pub int: IntConstraints,
}

impl ParamSpec {
    const fn new(name: &'static str, location: ParamLocation, kind: ParamKind) -> Self {
        Self {
            name,
            location,
            kind,
            required: true,
            default: None,
            string: StringConstraints::NONE,
            int: IntConstraints::NONE,
        }
    }

    /// A path parameter; always required
    pub const fn path(name: &'static str, kind: ParamKind) -> Self {
        Self::new(name, ParamLocation::Path, kind)
    }

    /// A required query parameter
    pub const fn query(name: &'static str, kind: ParamKind) -> Self {
        Self::new(name, ParamLocation::Query, kind)
    }

    /// Absent means `None`
    pub const fn optional(self) -> Self {
        Self { required: false, ..self }
    }

    pub const fn default_int(self, value: i64) -> Self {
        Self { required: false, default: Some(DefaultValue::Int(value)), ..self }
    }

    pub const fn default_bool(self, value: bool) -> Self {
        Self { required: false, default: Some(DefaultValue::Bool(value)), ..self }
    }

    pub const fn min_length(self, min_length: usize) -> Self {
        Self { string: StringConstraints { min_length: Some(min_length), ..self.string }, ..self }
    }

    pub const fn max_length(self, max_length: usize) -> Self {
        Self { string: StringConstraints { max_length: Some(max_length), ..self.string }, ..self }
    }

    pub const fn pattern(self, pattern: &'static str) -> Self {
        Self { string: StringConstraints { pattern: Some(pattern), ..self.string }, ..self }
    }

    pub const fn ge(self, ge: i64) -> Self {
        Self { int: IntConstraints { ge: Some(ge) }, ..self }
    }

    fn loc(&self) -> Vec<LocItem> {
        vec![self.location.as_str().into(), self.name.into()]
    }

    fn raw<'r>(&self, request: &'r Request, path: &'r PathParams) -> Option<&'r str> {
        match self.location {
            ParamLocation::Path => path.get(self.name).map(String::as_str),
            ParamLocation::Query => request.query_param(self.name),
        }
    }
}

/// A type a raw parameter string can be coerced into
pub trait FromParam: Sized {
    fn from_param(raw: &str, spec: &ParamSpec) -> Result<Self, ErrorKind>;

    /// The declared default, if it has this type
    fn from_default(_default: DefaultValue) -> Option<Self> {
        None
    }
}

impl FromParam for i64 {
    fn from_param(raw: &str, spec: &ParamSpec) -> Result<Self, ErrorKind> {
        let value = parse_int_str(raw)?;
        spec.int.check(value)?;
        Ok(value)
    }

    fn from_default(default: DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Int(i) => Some(i),
            DefaultValue::Bool(_) => None,
        }
    }
}

impl FromParam for bool {
    fn from_param(raw: &str, _spec: &ParamSpec) -> Result<Self, ErrorKind> {
        parse_bool_str(raw)
    }

    fn from_default(default: DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Bool(b) => Some(b),
            DefaultValue::Int(_) => None,
        }
    }
}

impl FromParam for String {
    fn from_param(raw: &str, spec: &ParamSpec) -> Result<Self, ErrorKind> {
        spec.string.check(raw)?;
        Ok(raw.to_string())
    }
}

/// Extraction results that are complete once no error was recorded
pub trait Extracted {
    type Output;

    fn complete(self) -> Option<Self::Output>;
}

impl Extracted for () {
    type Output = ();

    fn complete(self) -> Option<()> {
        Some(())
    }
}

impl<A> Extracted for Option<A> {
    type Output = A;

    fn complete(self) -> Option<A> {
        self
    }
}

macro_rules! impl_extracted_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> Extracted for ($(Option<$name>,)+) {
            type Output = ($($name,)+);

            #[allow(non_snake_case)]
            fn complete(self) -> Option<Self::Output> {
                let ($($name,)+) = self;
                Some(($($name?,)+))
            }
        }
    };
}

impl_extracted_tuple!(A);
impl_extracted_tuple!(A, B);
impl_extracted_tuple!(A, B, C);
impl_extracted_tuple!(A, B, C, D);
impl_extracted_tuple!(A, B, C, D, E);
impl_extracted_tuple!(A, B, C, D, E, F);

/// Collects handler arguments and the validation errors met on the way
pub struct Arguments<'r> {
    request: &'r Request,
    path: &'r PathParams,
    errors: ValidationErrors,
}

impl<'r> Arguments<'r> {
    pub fn new(request: &'r Request, path: &'r PathParams) -> Self {
        Self { request, path, errors: ValidationErrors::new() }
    }

    /// A parameter that must end up with a value, from the request or the declared default
    pub fn required<T: FromParam>(&mut self, spec: &ParamSpec) -> Option<T> {
        match spec.raw(self.request, self.path) {
            Some(raw) => self.coerce(spec, raw),
            None => match spec.default.and_then(T::from_default) {
                Some(value) => Some(value),
                None => {
                    self.errors.push(ValidationError::missing(spec.loc()));
                    None
                }
            },
        }
    }

    /// A parameter that may be absent; `Some(None)` when it is
    pub fn optional<T: FromParam>(&mut self, spec: &ParamSpec) -> Option<Option<T>> {
        match spec.raw(self.request, self.path) {
            Some(raw) => self.coerce(spec, raw).map(Some),
            None => Some(None),
        }
    }

    /// The JSON request body, decoded into `T`
    pub fn body<T: FromJsonValue>(&mut self) -> Option<T> {
        let loc: Vec<LocItem> = vec!["body".into()];
        match decode_json(self.request.body()) {
            Ok(value) => T::from_json(&value, &loc, &mut self.errors),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    /// Fail with every recorded error, or hand back the extracted values
    pub fn finish<E: Extracted>(self, values: E) -> Result<E::Output, ApiError> {
        if !self.errors.is_empty() {
            return Err(ApiError::Validation(self.errors));
        }
        values
            .complete()
            .ok_or_else(|| ApiError::Internal("argument extracted without a value".to_string()))
    }

    fn coerce<T: FromParam>(&mut self, spec: &ParamSpec, raw: &str) -> Option<T> {
        match T::from_param(raw, spec) {
            Ok(value) => Some(value),
            Err(kind) => {
                self.errors.push(ValidationError::new(&kind, spec.loc(), Value::from(raw)));
                None
            }
        }
    }
}

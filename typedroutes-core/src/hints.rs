//! Typed helper functions
//!
//! Small functions whose signatures do the documenting: names, ages, item
//! lists, price tables, optional greetings, and a `User` record validated
//! laxly from JSON.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

use crate::body::{FromJsonValue, ObjectReader};
use crate::validation::{LocItem, ValidationErrors};

/// Upper-case the first letter of every alphabetic run, lower-case the rest
///
/// `"john o'REILLY"` becomes `"John O'Reilly"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", title_case(first_name), title_case(last_name))
}

pub fn name_with_age(name: &str, age: i64) -> String {
    format!("{} is this old: {}", name, age)
}

/// One value of every scalar kind, handed back unchanged
pub fn get_items(
    item_a: &str,
    item_b: i64,
    item_c: f64,
    item_d: bool,
    item_e: &[u8],
) -> (String, i64, f64, bool, Bytes) {
    (item_a.to_string(), item_b, item_c, item_d, Bytes::copy_from_slice(item_e))
}

/// `("Noah", 27, 27.11, true, b"xndao")`
pub fn describe_items(items: &(String, i64, f64, bool, Bytes)) -> String {
    format!("{:?}", items)
}

pub fn title_items<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|item| title_case(item.as_ref())).collect()
}

/// One `name: price` line per entry, in the given order
pub fn price_lines(prices: &[(String, f64)]) -> Vec<String> {
    prices.iter().map(|(name, price)| format!("{}: {}", name, format_price(*price))).collect()
}

/// Integral prices keep one decimal place (`3.0`, not `3`)
fn format_price(price: f64) -> String {
    if price.is_finite() && price.fract() == 0.0 {
        format!("{:.1}", price)
    } else {
        price.to_string()
    }
}

/// A fixed-shape tuple and a set of byte strings
///
/// The set is ordered and deduplicated by construction.
pub fn process_items(
    items_t: (i64, i64, String),
    items_s: BTreeSet<Vec<u8>>,
) -> ((i64, i64, String), BTreeSet<Vec<u8>>) {
    (items_t, items_s)
}

/// `(1, 2, "tag") {b"a", b"b"}`
pub fn describe_processed(items_t: &(i64, i64, String), items_s: &BTreeSet<Vec<u8>>) -> String {
    let set: Vec<String> =
        items_s.iter().map(|raw| format!("{:?}", Bytes::copy_from_slice(raw))).collect();
    format!("{:?} {{{}}}", items_t, set.join(", "))
}

/// Either an integer or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IntOrStr {
    Int(i64),
    Str(String),
}

impl IntOrStr {
    /// Integer when the text spells one, otherwise the text itself
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => IntOrStr::Int(n),
            Err(_) => IntOrStr::Str(raw.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            IntOrStr::Int(_) => "int",
            IntOrStr::Str(_) => "str",
        }
    }
}

impl fmt::Display for IntOrStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntOrStr::Int(n) => write!(f, "{}", n),
            IntOrStr::Str(s) => f.write_str(s),
        }
    }
}

pub fn process_item(item: &IntOrStr) -> String {
    format!("{} ({})", item, item.kind())
}

pub fn say_hi(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Hey {}!", name),
        None => "Hello World".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

pub fn person_name(person: &Person) -> &str {
    &person.name
}

/// A user record with lax field coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub signup_ts: Option<DateTime<Utc>>,
    pub friends: Vec<i64>,
}

impl User {
    pub const DEFAULT_NAME: &'static str = "John Doe";

    /// Validate a JSON document into a user, reporting every failing field
    pub fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match Self::from_json(value, &[], &mut errors) {
            Some(user) => Ok(user),
            None => Err(errors),
        }
    }
}

impl FromJsonValue for User {
    fn from_json(value: &Value, loc: &[LocItem], errors: &mut ValidationErrors) -> Option<Self> {
        let mut reader = ObjectReader::new(value, loc, errors)?;
        let id = reader.required::<i64>("id");
        let name = reader.with_default("name", Self::DEFAULT_NAME.to_string());
        let signup_ts = reader.optional::<DateTime<Utc>>("signup_ts");
        let friends = reader.with_default("friends", Vec::<i64>::new());

        reader.finish(|| Some(User { id: id?, name: name?, signup_ts, friends: friends? }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("john", "doe"), "John Doe");
        assert_eq!(full_name("mARY-ann", "o'neil"), "Mary-Ann O'Neil");
    }

    #[test]
    fn test_name_with_age() {
        assert_eq!(name_with_age("Noah Bruce", 27), "Noah Bruce is this old: 27");
    }

    #[test]
    fn test_title_items_and_prices() {
        assert_eq!(title_items(&["foo", "bar baz"]), vec!["Foo", "Bar Baz"]);
        let prices = vec![("apple".to_string(), 2.5), ("pear".to_string(), 3.0)];
        assert_eq!(price_lines(&prices), vec!["apple: 2.5", "pear: 3.0"]);
    }

    #[test]
    fn test_get_items_keeps_every_kind() {
        let data = [120, 110, 100, 97, 111];
        let items = get_items("Noah", 27, 27.11, true, &data);
        assert_eq!(items.4, Bytes::from_static(b"xndao"));
        assert_eq!(describe_items(&items), r#"("Noah", 27, 27.11, true, b"xndao")"#);
    }

    #[test]
    fn test_process_items_dedups_set() {
        let set: BTreeSet<Vec<u8>> =
            [b"b".to_vec(), b"a".to_vec(), b"b".to_vec()].into_iter().collect();
        let (items_t, items_s) = process_items((1, 2, "tag".to_string()), set);
        assert_eq!(items_s.len(), 2);
        assert_eq!(describe_processed(&items_t, &items_s), r#"(1, 2, "tag") {b"a", b"b"}"#);
    }

    #[test]
    fn test_process_item_union() {
        assert_eq!(IntOrStr::parse("42"), IntOrStr::Int(42));
        assert_eq!(IntOrStr::parse("forty"), IntOrStr::Str("forty".to_string()));
        assert_eq!(process_item(&IntOrStr::parse("42")), "42 (int)");
        assert_eq!(process_item(&IntOrStr::parse("forty")), "forty (str)");
        assert_eq!(serde_json::to_value(IntOrStr::Int(7)).unwrap(), json!(7));
    }

    #[test]
    fn test_say_hi() {
        assert_eq!(say_hi(Some("Noah")), "Hey Noah!");
        assert_eq!(say_hi(None), "Hello World");
    }

    #[test]
    fn test_person_name() {
        let noah = Person::new("Noah");
        assert_eq!(person_name(&noah), "Noah");
    }

    #[test]
    fn test_user_lax_coercion() {
        let user = User::from_value(&json!({
            "id": "123",
            "signup_ts": "2017-06-01 12:22",
            "friends": [1, "2", "3"],
        }))
        .unwrap();

        assert_eq!(user.id, 123);
        assert_eq!(user.name, "John Doe");
        assert_eq!(user.friends, vec![1, 2, 3]);
        assert_eq!(user.signup_ts.unwrap().to_rfc3339(), "2017-06-01T12:22:00+00:00");
    }

    #[test]
    fn test_user_errors() {
        let errors = User::from_value(&json!({"friends": [1, "two"]})).unwrap_err();
        let locs: Vec<Vec<LocItem>> = errors.errors().iter().map(|e| e.loc.clone()).collect();
        assert_eq!(locs, vec![vec![LocItem::from("id")], vec![LocItem::from("friends"), LocItem::from(1)]]);
    }
}

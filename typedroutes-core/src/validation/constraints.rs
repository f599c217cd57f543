//! Value constraints declared alongside parameters and model fields

use super::ErrorKind;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Length and pattern limits for string values
///
/// Lengths count characters, not bytes. The pattern is searched for anywhere
/// in the value, so anchor it (`^...$`) to require a full match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static str>,
}

impl StringConstraints {
    pub const NONE: Self = Self { min_length: None, max_length: None, pattern: None };

    pub fn is_empty(&self) -> bool {
        self.min_length.is_none() && self.max_length.is_none() && self.pattern.is_none()
    }

    pub fn check(&self, value: &str) -> Result<(), ErrorKind> {
        let length = value.chars().count();

        if let Some(min_length) = self.min_length {
            if length < min_length {
                return Err(ErrorKind::StringTooShort { min_length });
            }
        }

        if let Some(max_length) = self.max_length {
            if length > max_length {
                return Err(ErrorKind::StringTooLong { max_length });
            }
        }

        if let Some(pattern) = self.pattern {
            if !pattern_matches(pattern, value) {
                return Err(ErrorKind::StringPatternMismatch { pattern: pattern.to_string() });
            }
        }

        Ok(())
    }
}

/// Bounds for integer values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntConstraints {
    pub ge: Option<i64>,
}

impl IntConstraints {
    pub const NONE: Self = Self { ge: None };

    pub fn check(&self, value: i64) -> Result<(), ErrorKind> {
        if let Some(ge) = self.ge {
            if value < ge {
                return Err(ErrorKind::GreaterThanEqual { ge });
            }
        }
        Ok(())
    }
}

lazy_static! {
    /// Compiled constraint patterns keyed by source; `None` marks an invalid pattern
    static ref PATTERNS: RwLock<HashMap<&'static str, Option<Regex>>> = RwLock::new(HashMap::new());
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::error!("Invalid constraint pattern '{}': {}", pattern, e);
            None
        }
    }
}

fn pattern_matches(pattern: &'static str, value: &str) -> bool {
    {
        let cache = PATTERNS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(compiled) = cache.get(pattern) {
            return compiled.as_ref().is_some_and(|re| re.is_match(value));
        }
    }

    let mut cache = PATTERNS.write().unwrap_or_else(PoisonError::into_inner);
    let compiled = cache.entry(pattern).or_insert_with(|| compile(pattern));
    compiled.as_ref().is_some_and(|re| re.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: StringConstraints =
        StringConstraints { min_length: Some(3), max_length: Some(50), pattern: Some("^fixedquery$") };

    #[test]
    fn test_string_constraints_pass() {
        assert_eq!(Q.check("fixedquery"), Ok(()));
        assert_eq!(StringConstraints::NONE.check(""), Ok(()));
        assert!(StringConstraints::NONE.is_empty());
    }

    #[test]
    fn test_length_checked_before_pattern() {
        assert_eq!(Q.check("ab"), Err(ErrorKind::StringTooShort { min_length: 3 }));
        assert_eq!(Q.check(&"x".repeat(51)), Err(ErrorKind::StringTooLong { max_length: 50 }));
    }

    #[test]
    fn test_pattern_mismatch() {
        assert_eq!(
            Q.check("fixedquery!"),
            Err(ErrorKind::StringPatternMismatch { pattern: "^fixedquery$".to_string() })
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let c = StringConstraints { max_length: Some(3), ..StringConstraints::NONE };
        assert_eq!(c.check("héé"), Ok(()));
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        let c = StringConstraints { pattern: Some("(unclosed"), ..StringConstraints::NONE };
        assert!(c.check("(unclosed").is_err());
    }

    #[test]
    fn test_pattern_compiled_once_across_threads() {
        const TAG: StringConstraints =
            StringConstraints { min_length: None, max_length: None, pattern: Some("^tag-[0-9]+$") };

        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    (0..100).all(|n| TAG.check(&format!("tag-{}", i * 100 + n)).is_ok())
                        && TAG.check("tag-x").is_err()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        let cache = PATTERNS.read().unwrap();
        assert!(cache.get("^tag-[0-9]+$").is_some_and(Option::is_some));
    }

    #[test]
    fn test_int_ge() {
        let c = IntConstraints { ge: Some(0) };
        assert_eq!(c.check(0), Ok(()));
        assert_eq!(c.check(-1), Err(ErrorKind::GreaterThanEqual { ge: 0 }));
        assert_eq!(IntConstraints::NONE.check(i64::MIN), Ok(()));
    }
}

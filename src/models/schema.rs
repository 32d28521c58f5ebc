//! Request loading and response dumping.
//!
//! Input schemas are plain structs that implement [`Schema`]: they walk a raw
//! JSON object with [`Fields`], collecting one reason per bad field instead of
//! stopping at the first failure. Unknown keys are ignored. Output schemas are
//! `Serialize` response structs produced through [`Dump`], so the set and order
//! of exposed fields is fixed by the response type.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Key used for errors that concern the whole payload rather than one field.
pub const BODY_KEY: &str = "_body";

/// Request payload rejected by an input schema. Maps field name to reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid request body")]
pub struct ValidationError {
    pub fields: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn body(reason: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(BODY_KEY.to_string(), reason.into());
        Self { fields }
    }

    pub fn reason(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// Constraint on a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrRule {
    NonEmpty,
    MinChars(usize),
}

impl StrRule {
    fn check(self, value: &str) -> Result<(), String> {
        match self {
            StrRule::NonEmpty if value.is_empty() => Err("must not be empty".to_string()),
            StrRule::MinChars(min) if value.chars().count() < min => {
                Err(format!("must be at least {min} characters"))
            }
            _ => Ok(()),
        }
    }
}

/// Constraint on an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntRule {
    AtLeast(i32),
}

impl IntRule {
    fn check(self, value: i32) -> Result<(), String> {
        match self {
            IntRule::AtLeast(min) if value < min => Err(format!("must be at least {min}")),
            _ => Ok(()),
        }
    }
}

/// Typed record loaded from an untrusted JSON payload.
pub trait Schema: Sized {
    fn load(raw: &Value) -> Result<Self, ValidationError>;
}

/// Stored record exposed through a whitelisting response type.
pub trait Dump: Sized {
    type Output: Serialize;

    fn dump(&self) -> Self::Output;

    /// Keeps the order of `records`.
    fn dump_many(records: &[Self]) -> Vec<Self::Output> {
        records.iter().map(Self::dump).collect()
    }
}

/// Field reader over a JSON object that accumulates per-field errors.
///
/// Accessors always return a value so a record can be assembled in one
/// expression; [`Fields::finish`] discards it if anything failed.
pub struct Fields<'a> {
    raw: &'a Map<String, Value>,
    errors: BTreeMap<String, String>,
}

impl<'a> Fields<'a> {
    pub fn new(raw: &'a Value) -> Result<Self, ValidationError> {
        match raw {
            Value::Object(raw) => Ok(Self {
                raw,
                errors: BTreeMap::new(),
            }),
            _ => Err(ValidationError::body("expected a JSON object")),
        }
    }

    fn present(&mut self, name: &str) -> Option<&'a Value> {
        let raw: &'a Map<String, Value> = self.raw;
        match raw.get(name) {
            None => {
                self.fail(name, "missing required field".to_string());
                None
            }
            Some(Value::Null) => {
                self.fail(name, "must not be null".to_string());
                None
            }
            Some(value) => Some(value),
        }
    }

    fn fail(&mut self, name: &str, reason: String) {
        self.errors.entry(name.to_string()).or_insert(reason);
    }

    /// Required string field.
    pub fn string(&mut self, name: &str, rules: &[StrRule]) -> String {
        let Some(value) = self.present(name) else {
            return String::new();
        };
        let Some(text) = value.as_str() else {
            self.fail(name, "must be a string".to_string());
            return String::new();
        };
        if let Some(reason) = rules.iter().find_map(|rule| rule.check(text).err()) {
            self.fail(name, reason);
        }
        text.to_string()
    }

    /// Required integer field; must be a JSON integer that fits in `i32`.
    pub fn integer(&mut self, name: &str, rules: &[IntRule]) -> i32 {
        let Some(value) = self.present(name) else {
            return 0;
        };
        let Some(number) = value.as_i64().and_then(|n| i32::try_from(n).ok()) else {
            self.fail(name, "must be an integer".to_string());
            return 0;
        };
        if let Some(reason) = rules.iter().find_map(|rule| rule.check(number).err()) {
            self.fail(name, reason);
        }
        number
    }

    pub fn finish<T>(self, record: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(record)
        } else {
            Err(ValidationError {
                fields: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Probe {
        name: String,
        count: i32,
    }

    impl Schema for Probe {
        fn load(raw: &Value) -> Result<Self, ValidationError> {
            let mut f = Fields::new(raw)?;
            let probe = Probe {
                name: f.string("name", &[StrRule::NonEmpty, StrRule::MinChars(3)]),
                count: f.integer("count", &[IntRule::AtLeast(1)]),
            };
            f.finish(probe)
        }
    }

    #[test]
    fn test_load_ignores_unknown_fields() {
        let probe = Probe::load(&json!({"name": "abc", "count": 2, "extra": true})).unwrap();
        assert_eq!(
            probe,
            Probe {
                name: "abc".into(),
                count: 2
            }
        );
    }

    #[test]
    fn test_load_collects_every_bad_field() {
        let err = Probe::load(&json!({"count": "7"})).unwrap_err();
        assert_eq!(err.reason("name"), Some("missing required field"));
        assert_eq!(err.reason("count"), Some("must be an integer"));
        assert_eq!(err.fields.len(), 2);
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let err = Probe::load(&json!({"name": "", "count": 1})).unwrap_err();
        assert_eq!(err.reason("name"), Some("must not be empty"));

        let err = Probe::load(&json!({"name": "ab", "count": 0})).unwrap_err();
        assert_eq!(err.reason("name"), Some("must be at least 3 characters"));
        assert_eq!(err.reason("count"), Some("must be at least 1"));
    }

    #[test]
    fn test_min_chars_counts_characters_not_bytes() {
        assert!(Probe::load(&json!({"name": "été", "count": 1})).is_ok());
    }

    #[test]
    fn test_rejects_null_floats_and_out_of_range() {
        let err = Probe::load(&json!({"name": null, "count": 1.5})).unwrap_err();
        assert_eq!(err.reason("name"), Some("must not be null"));
        assert_eq!(err.reason("count"), Some("must be an integer"));

        let err = Probe::load(&json!({"name": "abc", "count": 4_294_967_296_i64})).unwrap_err();
        assert_eq!(err.reason("count"), Some("must be an integer"));
    }

    #[test]
    fn test_non_object_payload() {
        let err = Probe::load(&json!(["name"])).unwrap_err();
        assert_eq!(err.reason(BODY_KEY), Some("expected a JSON object"));
    }
}

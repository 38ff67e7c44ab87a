//! Option values and truthiness
//!
//! Action options, plugin options, condition arguments and custom settings all
//! share one small value type so that configuration files stay schema-free.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strings that count as "true" for custom values, compared case-insensitively
pub const TRUTHY_STRINGS: &[&str] = &["1", "true", "yes", "on", "y"];

/// A configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// `true` / `false`
    Bool(bool),
    /// Integer
    Int(i64),
    /// String
    String(String),
    /// Ordered list of values
    Array(Vec<OptionValue>),
}

impl OptionValue {
    /// Borrow as string (strings only)
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret as boolean (bools only)
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Interpret as integer, accepting numeric strings
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Flatten into a list of strings
    ///
    /// Scalars become a one-element list so that `extensions = "rs"` and
    /// `extensions = ["rs"]` mean the same thing.
    #[must_use]
    pub fn to_string_list(&self) -> Vec<String> {
        match self {
            Self::Array(items) => items.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Decide whether a value is "truthy"
///
/// This is the single rule used everywhere a configured value is read as a
/// switch (custom value conditions, plugin toggles, environment flags):
///
/// - `Bool(b)` is `b`
/// - `Int(n)` is `n != 0`
/// - `String(s)` is true iff the trimmed, lower-cased string is one of
///   [`TRUTHY_STRINGS`]; every other string (including `"0"`, `"no"`, `""`
///   and arbitrary text) is false
/// - `Array(a)` is `!a.is_empty()`
///
/// Falsy is the exact negation, and an absent value is falsy.
#[must_use]
pub fn is_truthy(value: &OptionValue) -> bool {
    match value {
        OptionValue::Bool(b) => *b,
        OptionValue::Int(n) => *n != 0,
        OptionValue::String(s) => is_truthy_str(s),
        OptionValue::Array(items) => !items.is_empty(),
    }
}

/// String flavour of [`is_truthy`], for environment variables and IO arguments
#[must_use]
pub fn is_truthy_str(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    TRUTHY_STRINGS.contains(&value.as_str())
}

/// Look up an option by name and read it as a string
#[must_use]
pub fn option_str<'a>(options: &'a IndexMap<String, OptionValue>, key: &str) -> Option<&'a str> {
    options.get(key).and_then(OptionValue::as_str)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_truthy_strings() {
        for s in ["1", "true", "TRUE", "yes", "Yes", "on", "y", " y "] {
            assert!(is_truthy(&OptionValue::from(s)), "{s:?} should be truthy");
        }
    }

    #[test]
    fn test_falsy_strings() {
        for s in ["0", "false", "no", "off", "n", "", "maybe", "2"] {
            assert!(!is_truthy(&OptionValue::from(s)), "{s:?} should be falsy");
        }
    }

    #[test]
    fn test_truthy_scalars() {
        assert!(is_truthy(&OptionValue::Bool(true)));
        assert!(!is_truthy(&OptionValue::Bool(false)));
        assert!(is_truthy(&OptionValue::Int(3)));
        assert!(is_truthy(&OptionValue::Int(-1)));
        assert!(!is_truthy(&OptionValue::Int(0)));
        assert!(!is_truthy(&OptionValue::Array(vec![])));
        assert!(is_truthy(&OptionValue::Array(vec![OptionValue::Int(0)])));
    }

    #[test]
    fn test_untagged_deserialization() {
        let values: Vec<OptionValue> =
            serde_json::from_str(r#"[true, 42, "text", ["a", 1]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                OptionValue::Bool(true),
                OptionValue::Int(42),
                OptionValue::String("text".to_string()),
                OptionValue::Array(vec![OptionValue::from("a"), OptionValue::Int(1)]),
            ]
        );
    }

    #[test]
    fn test_string_list() {
        assert_eq!(OptionValue::from("rs").to_string_list(), vec!["rs"]);
        assert_eq!(
            OptionValue::Array(vec![OptionValue::from("rs"), OptionValue::from("toml")])
                .to_string_list(),
            vec!["rs", "toml"]
        );
    }

    #[test]
    fn test_as_int_accepts_numeric_strings() {
        assert_eq!(OptionValue::from(" 12 ").as_int(), Some(12));
        assert_eq!(OptionValue::from("twelve").as_int(), None);
        assert_eq!(OptionValue::Bool(true).as_int(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(OptionValue::Int(5).to_string(), "5");
        assert_eq!(
            OptionValue::Array(vec![OptionValue::from("a"), OptionValue::from("b")]).to_string(),
            "a,b"
        );
    }
}

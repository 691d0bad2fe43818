//! Field values accumulated by a wizard session.
//!
//! Wizard steps collect loosely-typed form input (text, numbers, flags,
//! timestamps, string lists) keyed by field name. `FieldValue` is the small
//! sum type the session store keeps per field; the navigation gate only ever
//! asks "is this provided?", while typed extraction happens at finalize time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single form value captured by a wizard step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flag (e.g. `is_championship`)
    Boolean(bool),
    /// Integer value (durations, percentages, referenced ids)
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// UTC timestamp (event date, publish date, registration windows)
    Timestamp(DateTime<Utc>),
    /// Free-form text
    Text(String),
    /// List of strings (reminder intervals, rule bullets)
    List(Vec<String>),
}

impl FieldValue {
    /// Whether the value counts as "not provided" for the navigation gate.
    ///
    /// An empty string and an empty list are treated exactly like an absent
    /// field; every other value counts as provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Returns the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an integer value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a flag.
    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the timestamp content, if this is a timestamp.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Returns the list content, if this is a string list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_counts_as_missing() {
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(FieldValue::Text("   ".to_string()).is_empty());
        assert!(!FieldValue::Text("Spa".to_string()).is_empty());
    }

    #[test]
    fn test_empty_list_counts_as_missing() {
        assert!(FieldValue::List(Vec::new()).is_empty());
        assert!(!FieldValue::List(vec!["48".to_string()]).is_empty());
    }

    #[test]
    fn test_scalar_values_always_provided() {
        assert!(!FieldValue::Integer(0).is_empty());
        assert!(!FieldValue::Boolean(false).is_empty());
        assert!(!FieldValue::Float(0.0).is_empty());
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(FieldValue::from("gt3").as_text(), Some("gt3"));
        assert_eq!(FieldValue::from(45i64).as_integer(), Some(45));
        assert_eq!(FieldValue::from(true).as_boolean(), Some(true));
        assert!(FieldValue::from("gt3").as_integer().is_none());
    }
}

//! Error types for descriptor construction and value conversion

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Result type for `load`/`save`
pub type Result<T> = std::result::Result<T, InvalidValue>;

/// A value failed validation or conversion.
///
/// `path` locates the failing sub-value inside the value handed to the
/// outermost descriptor: `$` is the value itself, `$.name` a record field,
/// `$[3]` a list or tuple position.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid value at {path}: {reason}")]
pub struct InvalidValue {
    pub path: String,
    pub reason: String,
}

impl InvalidValue {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            path: "$".to_string(),
            reason: reason.into(),
        }
    }

    /// Value is of the wrong kind for a descriptor
    pub fn mismatch(expected: &str, actual: &Value) -> Self {
        Self::new(format!("expected {}, got {}", expected, actual.type_name()))
    }

    /// Re-root this error under a record field
    pub fn in_field(self, name: &str) -> Self {
        self.nest(format_args!(".{}", name))
    }

    /// Re-root this error under a list or tuple position
    pub fn at_index(self, index: usize) -> Self {
        self.nest(format_args!("[{}]", index))
    }

    fn nest(mut self, segment: fmt::Arguments<'_>) -> Self {
        let rest = self.path.strip_prefix('$').unwrap_or(&self.path);
        self.path = format!("${}{}", segment, rest);
        self
    }
}

/// Malformed schema construction
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Duplicate record field: {0}")]
    DuplicateField(String),

    #[error("Value of type {0} is not hashable")]
    Unhashable(&'static str),

    #[error("Ambiguous value table: {0}")]
    AmbiguousTable(String),

    #[error("Invalid date/time pattern: {0}")]
    InvalidPattern(String),

    #[error("Only record schemas can be trimmed, got {0}")]
    NotARecord(&'static str),

    #[error("Invalid type definition: {0}")]
    InvalidDefinition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path() {
        let err = InvalidValue::new("boom");
        assert_eq!(err.path, "$");
        assert_eq!(err.to_string(), "invalid value at $: boom");
    }

    #[test]
    fn test_nested_path() {
        let err = InvalidValue::new("boom").in_field("b").at_index(2).in_field("a");
        assert_eq!(err.path, "$.a[2].b");
    }

    #[test]
    fn test_mismatch_names_both_kinds() {
        let err = InvalidValue::mismatch("int", &Value::Str("x".into()));
        assert_eq!(err.reason, "expected int, got string");
    }
}

//! Enumerated-value descriptor support

use crate::error::SchemaError;
use crate::value::Value;

/// A deduplicated set of literal values, in first-seen order
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSet {
    members: Vec<Value>,
}

impl ValueSet {
    /// Members must be hashable values
    pub fn new<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Result<Self, SchemaError> {
        let mut set = Self { members: Vec::new() };
        for value in values {
            let value = value.into();
            if !value.is_hashable() {
                return Err(SchemaError::Unhashable(value.type_name()));
            }
            set.insert(value);
        }
        Ok(set)
    }

    fn insert(&mut self, value: Value) {
        if !self.members.contains(&value) {
            self.members.push(value);
        }
    }

    /// Membership; unhashable values never match
    pub fn contains(&self, value: &Value) -> bool {
        value.is_hashable() && self.members.contains(value)
    }

    /// Set union by value equality
    pub fn merge(&self, other: &ValueSet) -> ValueSet {
        let mut merged = self.clone();
        for value in &other.members {
            merged.insert(value.clone());
        }
        merged
    }

    pub fn members(&self) -> &[Value] {
        &self.members
    }
}

//! Shared leaf descriptors and descriptor constructors
//!
//! Leaf descriptors are process-wide singletons: every call to [`int`]
//! returns a handle to the same node, so reusing a leaf across schemas
//! deduplicates inside unions.

use std::sync::OnceLock;

use crate::descriptor::{Kind, Record, Type, ValueSet};
use crate::error::SchemaError;
use crate::value::Value;

macro_rules! singleton {
    ($(#[$meta:meta])* $name:ident => $init:expr) => {
        $(#[$meta])*
        pub fn $name() -> Type {
            static CELL: OnceLock<Type> = OnceLock::new();
            CELL.get_or_init(|| $init).clone()
        }
    };
}

singleton!(
    /// Matches every value
    any => Type::new(Kind::Any)
);
singleton!(null => Type::new(Kind::Null));
singleton!(boolean => Type::new(Kind::Bool));
singleton!(
    /// Integers; booleans are excluded
    int => Type::new(Kind::Int)
);
singleton!(float => Type::new(Kind::Float));
singleton!(
    /// Text of any encoding
    string => Type::new(Kind::String)
);
singleton!(
    /// Calendar dates; date-times are excluded
    date => Type::new(Kind::Date)
);
singleton!(datetime => Type::new(Kind::DateTime));
singleton!(
    /// `int | float`
    number => int() | float()
);
singleton!(
    /// `any` that may be absent from a record
    optional => any().optional()
);

/// `any` that is filled in with `value` when absent from a record
pub fn default(value: impl Into<Value>) -> Type {
    any().default(value)
}

/// Enumerated-value descriptor
pub fn set<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Result<Type, SchemaError> {
    Ok(Type::new(Kind::Set(ValueSet::new(values)?)))
}

/// Homogeneous list of `element`
pub fn list(element: Type) -> Type {
    Type::new(Kind::List(element))
}

/// Fixed-arity tuple, one descriptor per position
pub fn tuple(positions: impl IntoIterator<Item = Type>) -> Type {
    Type::new(Kind::Tuple(positions.into_iter().collect()))
}

/// Strict record schema
pub fn dict<K: Into<String>>(fields: impl IntoIterator<Item = (K, Type)>) -> Result<Type, SchemaError> {
    Ok(Type::new(Kind::Dict(Record::new(fields)?)))
}

/// Record schema that drops undeclared fields
pub fn trimmed_dict<K: Into<String>>(
    fields: impl IntoIterator<Item = (K, Type)>,
) -> Result<Type, SchemaError> {
    dict(fields)?.trimmed()
}

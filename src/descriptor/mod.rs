//! Type Descriptors
//!
//! A descriptor is an immutable node in a composition tree. Every descriptor
//! answers three questions about a value:
//!
//! - `test`: does the value have this shape? Never fails.
//! - `load`: convert from external to internal form, validating as it goes.
//! - `save`: convert from internal to external form, validating as it goes.
//!
//! If `test(v)` is false then both `load(v)` and `save(v)` fail with
//! [`InvalidValue`]. Under a representation adapter `test` describes the
//! external form, so only `load` is bound; `save` takes the internal form.
//! Conversions return fresh values; inputs are never mutated.
//!
//! Descriptors are reference-counted. Cloning a [`Type`] shares the node, and
//! equality between descriptors is node identity: two structurally identical
//! descriptors built independently are different descriptors.

pub mod container;
pub mod format;
pub mod record;
pub mod set;
pub mod union;

pub use format::{ContainerKind, Format, ValueTable};
pub use record::Record;
pub use set::ValueSet;

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use crate::error::{InvalidValue, Result, SchemaError};
use crate::value::Value;

/// Conversion direction shared by the recursive `load`/`save` walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Load,
    Save,
}

/// The closed set of descriptor families
#[derive(Debug)]
pub(crate) enum Kind {
    Any,
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    DateTime,
    Set(ValueSet),
    Union(Vec<Type>),
    Optional(Type),
    Default(Type, Value),
    List(Type),
    Tuple(Vec<Type>),
    Dict(Record),
    Format(Type, Format),
}

/// How a record treats a field that is absent from the value
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Presence<'a> {
    Required,
    Optional,
    Default(&'a Value),
}

/// A composable type descriptor
#[derive(Clone)]
pub struct Type(Arc<Kind>);

impl Type {
    pub(crate) fn new(kind: Kind) -> Self {
        Self(Arc::new(kind))
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.0
    }

    /// Whether both handles point at the same descriptor node
    pub fn same(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Family name for diagnostics
    pub fn name(&self) -> &'static str {
        match self.kind() {
            Kind::Any => "any",
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Date => "date",
            Kind::DateTime => "datetime",
            Kind::Set(_) => "set",
            Kind::Union(_) => "union",
            Kind::Optional(_) => "optional",
            Kind::Default(..) => "default",
            Kind::List(_) => "list",
            Kind::Tuple(_) => "tuple",
            Kind::Dict(_) => "dict",
            Kind::Format(..) => "format",
        }
    }

    // ---------------------------------------------------------------------
    // Contract
    // ---------------------------------------------------------------------

    /// Shape predicate
    pub fn test(&self, value: &Value) -> bool {
        match self.kind() {
            Kind::Any => true,
            Kind::Null => value.is_null(),
            Kind::Bool => matches!(value, Value::Bool(_)),
            // Booleans are their own variant and never count as integers
            Kind::Int => matches!(value, Value::Int(_)),
            Kind::Float => matches!(value, Value::Float(_)),
            Kind::String => matches!(value, Value::Str(_)),
            // A date-time is never a date
            Kind::Date => matches!(value, Value::Date(_)),
            Kind::DateTime => matches!(value, Value::DateTime(_)),
            Kind::Set(set) => set.contains(value),
            Kind::Union(alternatives) => union::test(alternatives, value),
            Kind::Optional(inner) | Kind::Default(inner, _) => inner.test(value),
            Kind::List(element) => container::test_list(element, value),
            Kind::Tuple(positions) => container::test_tuple(positions, value),
            Kind::Dict(record) => record.test(value),
            Kind::Format(inner, format) => format
                .decode(inner, value)
                .map_or(false, |decoded| inner.test(&decoded)),
        }
    }

    /// Convert an external value into internal form
    pub fn load(&self, value: &Value) -> Result<Value> {
        self.convert(value, Direction::Load)
    }

    /// Convert an internal value into external form
    pub fn save(&self, value: &Value) -> Result<Value> {
        self.convert(value, Direction::Save)
    }

    pub(crate) fn convert(&self, value: &Value, direction: Direction) -> Result<Value> {
        match self.kind() {
            Kind::Any => Ok(value.clone()),
            Kind::Union(alternatives) => union::convert(alternatives, value, direction),
            Kind::Optional(inner) | Kind::Default(inner, _) => inner.convert(value, direction),
            Kind::List(element) => container::convert_list(element, value, direction),
            Kind::Tuple(positions) => container::convert_tuple(positions, value, direction),
            Kind::Dict(record) => record.convert(value, direction),
            Kind::Format(inner, format) => match direction {
                Direction::Load => inner.convert(&format.decode(inner, value)?, direction),
                Direction::Save => format.encode(inner.convert(value, direction)?),
            },
            // Leaves and value sets convert by identity once the shape holds
            _ if self.test(value) => Ok(value.clone()),
            Kind::Set(_) => Err(InvalidValue::new(format!(
                "{} value is not one of the allowed values",
                value.type_name()
            ))),
            _ => Err(InvalidValue::mismatch(self.name(), value)),
        }
    }

    /// Presence policy when this descriptor types a record field.
    /// Adapters are transparent.
    pub(crate) fn presence(&self) -> Presence<'_> {
        match self.kind() {
            Kind::Optional(_) => Presence::Optional,
            Kind::Default(_, value) => Presence::Default(value),
            Kind::Format(inner, _) => inner.presence(),
            _ => Presence::Required,
        }
    }

    // ---------------------------------------------------------------------
    // Combinators
    // ---------------------------------------------------------------------

    /// Allow the field to be absent from a record
    pub fn optional(&self) -> Type {
        Type::new(Kind::Optional(self.clone()))
    }

    /// Allow the field to be absent, filling in `value` on load and omitting
    /// it on save when the field equals `value`.
    ///
    /// `value` is not checked against this descriptor.
    pub fn default(&self, value: impl Into<Value>) -> Type {
        Type::new(Kind::Default(self.clone(), value.into()))
    }

    /// Build or extend a union; see [`union::compose`]
    pub fn union(&self, other: impl Into<Type>) -> Type {
        union::compose(self, &other.into())
    }

    /// Wrap in a representation adapter
    pub fn format(&self, format: impl Into<Format>) -> Type {
        Type::new(Kind::Format(self.clone(), format.into()))
    }

    /// Record variant that drops undeclared fields instead of rejecting them
    pub fn trimmed(&self) -> std::result::Result<Type, SchemaError> {
        match self.kind() {
            Kind::Dict(record) => Ok(Type::new(Kind::Dict(record.trimmed()))),
            _ => Err(SchemaError::NotARecord(self.name())),
        }
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    /// Union alternatives in priority order
    pub fn alternatives(&self) -> Option<&[Type]> {
        match self.kind() {
            Kind::Union(alternatives) => Some(alternatives),
            _ => None,
        }
    }

    /// Members of an enumerated-value descriptor
    pub fn members(&self) -> Option<&[Value]> {
        match self.kind() {
            Kind::Set(set) => Some(set.members()),
            _ => None,
        }
    }

    /// Record schema, if this is one
    pub fn record(&self) -> Option<&Record> {
        match self.kind() {
            Kind::Dict(record) => Some(record),
            _ => None,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Kind::Set(set) => write!(f, "set{:?}", set.members()),
            Kind::Union(alternatives) => f.debug_tuple("union").field(alternatives).finish(),
            Kind::Optional(inner) => write!(f, "{:?}.optional", inner),
            Kind::Default(inner, value) => write!(f, "{:?}.default({:?})", inner, value),
            Kind::List(element) => f.debug_tuple("list").field(element).finish(),
            Kind::Tuple(positions) => {
                let mut t = f.debug_tuple("tuple");
                for position in positions {
                    t.field(position);
                }
                t.finish()
            }
            Kind::Dict(record) => fmt::Debug::fmt(record, f),
            Kind::Format(inner, format) => write!(f, "{:?}.format({:?})", inner, format),
            _ => f.write_str(self.name()),
        }
    }
}

/// `()` stands for the null descriptor, so `string() | ()` reads as
/// "string or null".
impl From<()> for Type {
    fn from(_: ()) -> Self {
        crate::builtins::null()
    }
}

impl From<&Type> for Type {
    fn from(ty: &Type) -> Self {
        ty.clone()
    }
}

impl<T: Into<Type>> BitOr<T> for Type {
    type Output = Type;

    fn bitor(self, rhs: T) -> Type {
        self.union(rhs)
    }
}

impl<T: Into<Type>> BitOr<T> for &Type {
    type Output = Type;

    fn bitor(self, rhs: T) -> Type {
        self.union(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::*;
    use chrono::NaiveDate;

    #[test]
    fn test_int_excludes_bool() {
        let t = int();
        assert!(t.test(&Value::Int(1)));
        for value in [Value::Bool(true), Value::Float(1.2), Value::from("a"), Value::Null] {
            assert!(!t.test(&value));
            assert!(t.load(&value).is_err());
            assert!(t.save(&value).is_err());
        }
    }

    #[test]
    fn test_date_excludes_datetime() {
        let day = NaiveDate::from_ymd_opt(2013, 9, 21).unwrap();
        let moment = day.and_hms_opt(11, 42, 33).unwrap();
        assert!(date().test(&Value::Date(day)));
        assert!(!date().test(&Value::DateTime(moment)));
        assert!(datetime().test(&Value::DateTime(moment)));
        assert!(!datetime().test(&Value::Date(day)));
    }

    #[test]
    fn test_any_is_identity() {
        let value = Value::dict([("a", Value::list([1, 2]))]);
        assert!(any().test(&value));
        assert_eq!(any().load(&value).unwrap(), value);
        assert_eq!(any().save(&value).unwrap(), value);
    }

    #[test]
    fn test_optional_and_default_delegate() {
        assert!(boolean().optional().test(&Value::Bool(false)));
        assert!(!boolean().default(false).test(&Value::Int(0)));
        assert!(boolean().default(false).load(&Value::Null).is_err());
    }

    #[test]
    fn test_presence_sees_through_format() {
        let t = int().default(0).format(Format::Json);
        assert_eq!(t.presence(), Presence::Default(&Value::Int(0)));
        assert_eq!(int().presence(), Presence::Required);
    }

    #[test]
    fn test_trimmed_requires_record() {
        assert!(matches!(int().trimmed(), Err(SchemaError::NotARecord("int"))));
    }

    #[test]
    fn test_identity_equality() {
        assert_eq!(int(), int());
        assert_ne!(list(int()), list(int()));
    }

    #[test]
    fn test_debug_rendering() {
        assert_eq!(format!("{:?}", list(int()).optional()), "list(int).optional");
    }
}

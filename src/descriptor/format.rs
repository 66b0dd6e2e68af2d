//! Representation adapters
//!
//! An adapter changes how a descriptor's value looks from the outside
//! without changing the inner descriptor. `load` decodes and then hands the
//! result to the inner descriptor; `save` lets the inner descriptor convert
//! first and then encodes.
//!
//! | Adapter   | External form                                  |
//! |-----------|------------------------------------------------|
//! | Pattern   | date/time text rendered with a strftime pattern |
//! | Table     | literals substituted through a value table      |
//! | Cast      | the other container kind (list vs tuple)        |
//! | Json      | a string of JSON text                           |

use std::fmt::Write as _;

use chrono::format::{self, Item, ParseResult, Parsed, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Kind, Type};
use crate::error::{InvalidValue, Result, SchemaError};
use crate::value::Value;

/// A representation adapter
#[derive(Debug, Clone)]
pub enum Format {
    /// Date or date-time text, per a strftime pattern
    Pattern(String),
    /// Literal substitution table
    Table(ValueTable),
    /// Accept and produce this container kind in place of the other one
    Cast(ContainerKind),
    /// JSON text embedding
    Json,
}

/// The two sequence container kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    List,
    Tuple,
}

impl ContainerKind {
    fn of(value: &Value) -> Option<(ContainerKind, &[Value])> {
        match value {
            Value::List(items) => Some((ContainerKind::List, items.as_slice())),
            Value::Tuple(items) => Some((ContainerKind::Tuple, items.as_slice())),
            _ => None,
        }
    }

    fn other(self) -> ContainerKind {
        match self {
            ContainerKind::List => ContainerKind::Tuple,
            ContainerKind::Tuple => ContainerKind::List,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::Tuple => "tuple",
        }
    }

    fn build(self, items: &[Value]) -> Value {
        match self {
            ContainerKind::List => Value::List(items.to_vec()),
            ContainerKind::Tuple => Value::Tuple(items.to_vec()),
        }
    }

    /// Re-wrap `value`, which must be of kind `from`, as `to`
    fn cast(from: ContainerKind, to: ContainerKind, value: &Value) -> Result<Value> {
        match ContainerKind::of(value) {
            Some((kind, items)) if kind == from => Ok(to.build(items)),
            _ => Err(InvalidValue::mismatch(from.name(), value)),
        }
    }
}

/// Bidirectional mapping between internal and external literals
#[derive(Debug, Clone)]
pub struct ValueTable {
    /// (internal, external)
    entries: Vec<(Value, Value)>,
}

impl ValueTable {
    /// Build from `(internal, external)` pairs.
    ///
    /// Every literal must be hashable and each side must be free of repeats,
    /// so that both directions resolve to exactly one literal.
    pub fn new<A, B>(entries: impl IntoIterator<Item = (A, B)>) -> std::result::Result<Self, SchemaError>
    where
        A: Into<Value>,
        B: Into<Value>,
    {
        let mut table = Self { entries: Vec::new() };
        for (internal, external) in entries {
            let (internal, external) = (internal.into(), external.into());
            for literal in [&internal, &external] {
                if !literal.is_hashable() {
                    return Err(SchemaError::Unhashable(literal.type_name()));
                }
            }
            if table.to_external(&internal).is_some() {
                return Err(SchemaError::AmbiguousTable(format!(
                    "internal value {:?} is mapped twice",
                    internal
                )));
            }
            if table.to_internal(&external).is_some() {
                return Err(SchemaError::AmbiguousTable(format!(
                    "external value {:?} is mapped twice",
                    external
                )));
            }
            table.entries.push((internal, external));
        }
        Ok(table)
    }

    pub fn to_internal(&self, external: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(_, ext)| ext == external)
            .map(|(internal, _)| internal)
    }

    pub fn to_external(&self, internal: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(int, _)| int == internal)
            .map(|(_, external)| external)
    }
}

impl Format {
    /// Date/time text adapter.
    ///
    /// The pattern uses strftime specifiers as chrono reads them, except that
    /// `%f` means six digits of microseconds.
    pub fn pattern(pattern: impl Into<String>) -> std::result::Result<Self, SchemaError> {
        let pattern = microsecond_fraction(&pattern.into());
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(SchemaError::InvalidPattern(pattern));
        }
        Ok(Format::Pattern(pattern))
    }

    /// External form to the form `inner` loads
    pub(crate) fn decode(&self, inner: &Type, value: &Value) -> Result<Value> {
        match self {
            Format::Pattern(pattern) => parse_pattern(pattern, Temporal::of(inner), value),
            Format::Table(table) => Ok(table.to_internal(value).unwrap_or(value).clone()),
            Format::Cast(kind) => ContainerKind::cast(*kind, kind.other(), value),
            Format::Json => {
                let text = value
                    .as_str()
                    .ok_or_else(|| InvalidValue::mismatch("JSON text", value))?;
                let json: serde_json::Value = serde_json::from_str(text)
                    .map_err(|e| InvalidValue::new(format!("malformed JSON text: {}", e)))?;
                Ok(Value::from(json))
            }
        }
    }

    /// Form the inner descriptor saved to the external form
    pub(crate) fn encode(&self, value: Value) -> Result<Value> {
        match self {
            Format::Pattern(pattern) => render_pattern(pattern, &value),
            Format::Table(table) => Ok(match table.to_external(&value) {
                Some(external) => external.clone(),
                None => value,
            }),
            Format::Cast(kind) => ContainerKind::cast(kind.other(), *kind, &value),
            Format::Json => {
                let json = value.to_json()?;
                serde_json::to_string(&json)
                    .map(Value::Str)
                    .map_err(|e| InvalidValue::new(format!("cannot encode JSON: {}", e)))
            }
        }
    }
}

/// Rewrite bare `%f` as chrono's fixed six-digit `%6f`
fn microsecond_fraction(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('f') => out.push_str("%6f"),
            Some(next) => {
                out.push('%');
                out.push(next);
            }
            None => out.push('%'),
        }
    }
    out
}

/// What a pattern's text decodes to, decided by the inner descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Temporal {
    Date,
    DateTime,
    /// A date-time when the text fixes a time, otherwise a date
    Either,
}

impl Temporal {
    fn of(inner: &Type) -> Temporal {
        match inner.kind() {
            Kind::Date => Temporal::Date,
            Kind::DateTime => Temporal::DateTime,
            Kind::Optional(inner) | Kind::Default(inner, _) => Temporal::of(inner),
            _ => Temporal::Either,
        }
    }
}

fn parse_pattern(pattern: &str, target: Temporal, value: &Value) -> Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| InvalidValue::mismatch("date/time text", value))?;
    let mismatch = |e: format::ParseError| {
        InvalidValue::new(format!("'{}' does not match pattern '{}': {}", text, pattern, e))
    };

    let mut parsed = Parsed::new();
    format::parse(&mut parsed, text, StrftimeItems::new(pattern)).map_err(mismatch)?;

    let decoded: ParseResult<Value> = match target {
        Temporal::Date => parsed.to_naive_date().map(Value::Date),
        Temporal::DateTime => {
            midnight_defaults(&mut parsed);
            parsed.to_naive_datetime_with_offset(0).map(Value::DateTime)
        }
        Temporal::Either => parsed
            .to_naive_datetime_with_offset(0)
            .map(Value::DateTime)
            .or_else(|_| parsed.to_naive_date().map(Value::Date)),
    };
    decoded.map_err(mismatch)
}

/// Time fields the text left out read as midnight. A setter refuses to
/// overwrite a field the text did fix, so its error is expected there.
fn midnight_defaults(parsed: &mut Parsed) {
    let _ = parsed.set_hour(0);
    let _ = parsed.set_minute(0);
    let _ = parsed.set_second(0);
}

fn render_pattern(pattern: &str, value: &Value) -> Result<Value> {
    let mut out = String::new();
    let written = match value {
        Value::DateTime(dt) => write!(out, "{}", dt.format(pattern)),
        Value::Date(d) => write!(out, "{}", d.format(pattern)),
        other => return Err(InvalidValue::mismatch("date or datetime", other)),
    };
    written.map_err(|_| {
        InvalidValue::new(format!(
            "cannot render {} with pattern '{}'",
            value.type_name(),
            pattern
        ))
    })?;
    Ok(Value::Str(out))
}

impl From<ValueTable> for Format {
    fn from(table: ValueTable) -> Self {
        Format::Table(table)
    }
}

impl From<ContainerKind> for Format {
    fn from(kind: ContainerKind) -> Self {
        Format::Cast(kind)
    }
}

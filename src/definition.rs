//! Declarative type definitions
//!
//! Schemas can be written as data and built into descriptors. The same shape
//! reads from JSON or TOML:
//!
//! ```json
//! {
//!   "type": "dict",
//!   "fields": {
//!     "name": { "type": "string" },
//!     "tags": { "type": "list", "of": { "type": "string" }, "optional": true },
//!     "active": { "type": "bool", "default": false },
//!     "seen": { "type": "datetime", "format": { "kind": "pattern", "pattern": "%Y-%m-%d %H:%M:%S" } }
//!   }
//! }
//! ```
//!
//! Modifiers apply in a fixed order: `format`, then `optional`, then `default`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::builtins;
use crate::descriptor::{ContainerKind, Format, Type, ValueTable};
use crate::error::SchemaError;
use crate::value::Value;

/// A type definition with its modifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDef {
    #[serde(flatten)]
    pub kind: KindDef,

    /// Representation adapter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatDef>,

    /// Field may be absent
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,

    /// Field is filled in with this value when absent; `null` is a value here
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<serde_json::Value>,
}

/// Descriptor family
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KindDef {
    Any,
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    Datetime,
    Number,
    Set {
        values: Vec<serde_json::Value>,
    },
    Union {
        of: Vec<TypeDef>,
    },
    List {
        of: Box<TypeDef>,
    },
    Tuple {
        of: Vec<TypeDef>,
    },
    Dict {
        fields: BTreeMap<String, TypeDef>,
        #[serde(default)]
        trimmed: bool,
    },
}

/// Representation adapter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormatDef {
    Pattern { pattern: String },
    /// `[internal, external]` pairs
    Table { entries: Vec<(serde_json::Value, serde_json::Value)> },
    Cast { from: ContainerKind },
    Json,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl TypeDef {
    /// Parse a JSON definition
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a TOML definition
    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a definition file; `.toml` files are TOML, everything else JSON
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    /// Build the descriptor this definition describes
    pub fn build(&self) -> Result<Type, SchemaError> {
        let mut ty = self.kind.build()?;
        if let Some(format) = &self.format {
            ty = ty.format(format.build()?);
        }
        if self.optional {
            ty = ty.optional();
        }
        if let Some(value) = &self.default {
            ty = ty.default(Value::from(value.clone()));
        }
        Ok(ty)
    }
}

impl KindDef {
    fn build(&self) -> Result<Type, SchemaError> {
        Ok(match self {
            KindDef::Any => builtins::any(),
            KindDef::Null => builtins::null(),
            KindDef::Bool => builtins::boolean(),
            KindDef::Int => builtins::int(),
            KindDef::Float => builtins::float(),
            KindDef::String => builtins::string(),
            KindDef::Date => builtins::date(),
            KindDef::Datetime => builtins::datetime(),
            KindDef::Number => builtins::number(),
            KindDef::Set { values } => builtins::set(values.iter().cloned().map(Value::from))?,
            KindDef::Union { of } => {
                let mut alternatives = of.iter().map(TypeDef::build);
                let first = alternatives.next().ok_or_else(|| {
                    SchemaError::InvalidDefinition("union needs at least one alternative".into())
                })??;
                alternatives.try_fold(first, |acc, ty| Ok::<_, SchemaError>(acc | ty?))?
            }
            KindDef::List { of } => builtins::list(of.build()?),
            KindDef::Tuple { of } => {
                builtins::tuple(of.iter().map(TypeDef::build).collect::<Result<Vec<_>, _>>()?)
            }
            KindDef::Dict { fields, trimmed } => {
                let fields = fields
                    .iter()
                    .map(|(name, def)| Ok((name.clone(), def.build()?)))
                    .collect::<Result<Vec<_>, SchemaError>>()?;
                let record = builtins::dict(fields)?;
                if *trimmed {
                    record.trimmed()?
                } else {
                    record
                }
            }
        })
    }
}

impl FormatDef {
    fn build(&self) -> Result<Format, SchemaError> {
        Ok(match self {
            FormatDef::Pattern { pattern } => Format::pattern(pattern.clone())?,
            FormatDef::Table { entries } => Format::Table(ValueTable::new(
                entries
                    .iter()
                    .map(|(internal, external)| (Value::from(internal.clone()), Value::from(external.clone()))),
            )?),
            FormatDef::Cast { from } => Format::Cast(*from),
            FormatDef::Json => Format::Json,
        })
    }
}

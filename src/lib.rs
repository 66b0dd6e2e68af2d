//! Typed Descriptors
//!
//! A small algebra of composable type descriptors that validate, load
//! (external → internal) and save (internal → external) dynamically-typed
//! values against declarative schemas.
//!
//! ## Features
//!
//! - **Leaf types**: any, null, bool, int, float, string, date, datetime
//! - **Modifiers**: optional fields, default values, unions (`a | b`)
//! - **Containers**: homogeneous lists, fixed-arity tuples, records with a
//!   strict or trimmed undeclared-field policy
//! - **Enumerated values**: fixed sets of literals, closed under union
//! - **Representation adapters**: date/time text, value tables, list/tuple
//!   casts, JSON text embedding
//! - **Definitions**: schemas written as JSON or TOML
//!
//! ## Example
//!
//! ```
//! use typed_descriptors::{boolean, dict, string, Value};
//!
//! let schema = dict([("a", string()), ("c", boolean().default(false))]).unwrap();
//!
//! let loaded = schema.load(&Value::dict([("a", "x")])).unwrap();
//! assert_eq!(loaded, Value::dict([("a", Value::from("x")), ("c", Value::Bool(false))]));
//!
//! let saved = schema.save(&loaded).unwrap();
//! assert_eq!(saved, Value::dict([("a", "x")]));
//! ```

pub mod builtins;
pub mod config;
pub mod definition;
pub mod descriptor;
pub mod error;
pub mod value;

pub use builtins::{
    any, boolean, date, datetime, default, dict, float, int, list, null, number, optional, set,
    string, trimmed_dict, tuple,
};
pub use config::{OutputFormat, TypedConfig};
pub use definition::{FormatDef, KindDef, TypeDef};
pub use descriptor::{ContainerKind, Format, Record, Type, ValueSet, ValueTable};
pub use error::{InvalidValue, Result, SchemaError};
pub use value::Value;

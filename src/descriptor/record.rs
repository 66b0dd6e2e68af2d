//! Structured record (dict) descriptor

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use super::{Direction, Presence, Type};
use crate::error::{InvalidValue, Result, SchemaError};
use crate::value::Value;

/// Field map with a strict or trimmed undeclared-field policy
#[derive(Clone)]
pub struct Record {
    fields: BTreeMap<String, Type>,
    trimmed: bool,
}

impl Record {
    /// Build a strict record; field names must be unique
    pub fn new<K: Into<String>>(
        fields: impl IntoIterator<Item = (K, Type)>,
    ) -> std::result::Result<Self, SchemaError> {
        let mut map = BTreeMap::new();
        for (name, ty) in fields {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(SchemaError::DuplicateField(name));
            }
            map.insert(name, ty);
        }
        Ok(Self {
            fields: map,
            trimmed: false,
        })
    }

    pub(super) fn trimmed(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            trimmed: true,
        }
    }

    /// Whether undeclared fields are dropped rather than rejected
    pub fn is_trimmed(&self) -> bool {
        self.trimmed
    }

    pub fn field(&self, name: &str) -> Option<&Type> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub(super) fn test(&self, value: &Value) -> bool {
        let Some(map) = value.as_dict() else {
            return false;
        };

        let mut validated = 0;
        for (name, ty) in &self.fields {
            match map.get(name) {
                Some(field) if ty.test(field) => validated += 1,
                Some(_) => return false,
                None if ty.presence() == Presence::Required => return false,
                None => {}
            }
        }

        self.trimmed || validated == map.len()
    }

    pub(super) fn convert(&self, value: &Value, direction: Direction) -> Result<Value> {
        let Some(map) = value.as_dict() else {
            return Err(InvalidValue::mismatch("dict", value));
        };

        let mut out = BTreeMap::new();
        for (name, ty) in &self.fields {
            match (map.get(name), ty.presence()) {
                (Some(field), Presence::Default(default))
                    if direction == Direction::Save && field == default => {}
                (Some(field), _) => {
                    let converted = ty
                        .convert(field, direction)
                        .map_err(|e| e.in_field(name))?;
                    out.insert(name.clone(), converted);
                }
                (None, Presence::Default(default)) if direction == Direction::Load => {
                    out.insert(name.clone(), default.clone());
                }
                (None, Presence::Required) => {
                    return Err(InvalidValue::new(format!("dict is missing field '{}'", name)));
                }
                (None, _) => {}
            }
        }

        let undeclared: Vec<&str> = map
            .keys()
            .filter(|key| !self.fields.contains_key(*key))
            .map(String::as_str)
            .collect();
        if !undeclared.is_empty() {
            if !self.trimmed {
                return Err(InvalidValue::new(format!(
                    "dict has unexpected fields: {}",
                    undeclared.join(", ")
                )));
            }
            debug!(fields = ?undeclared, "trimmed record dropped undeclared fields");
        }

        Ok(Value::Dict(out))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.trimmed {
            f.write_str("trimmed ")?;
        }
        f.write_str("dict")?;
        f.debug_map().entries(&self.fields).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::*;
    use crate::descriptor::Format;
    use chrono::NaiveDate;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = dict([("a", int()), ("a", string())]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField(name) if name == "a"));
    }

    #[test]
    fn test_strict_record_test() {
        let t = dict([("a", int()), ("b", boolean()), ("c", list(string()))]).unwrap();

        assert!(t.test(&v(json!({"a": 1, "b": true, "c": ["X", "Y"]}))));

        assert!(!t.test(&v(json!({}))));
        assert!(!t.test(&v(json!({"a": 1}))));
        assert!(!t.test(&v(json!({"a": 1, "b": true}))));
        assert!(!t.test(&v(json!({"a": 1, "b": true, "c": "foo"}))));
        assert!(!t.test(&v(json!({"a": 1, "b": true, "c": [1, 2, 3]}))));
        assert!(!t.test(&v(json!({"a": 1, "b": true, "c": ["X", "Y"], "d": "bar"}))));
    }

    #[test]
    fn test_optional_fields() {
        let t = dict([
            ("a", int()),
            ("b", boolean().optional()),
            ("c", list(string()).optional()),
        ])
        .unwrap();

        assert!(t.test(&v(json!({"a": 1, "b": true, "c": ["X", "Y"]}))));
        assert!(t.test(&v(json!({"a": 1}))));
        assert!(t.test(&v(json!({"a": 1, "b": true}))));
        assert!(t.test(&v(json!({"a": 1, "c": ["X", "Y"]}))));

        assert!(!t.test(&v(json!({}))));
        assert!(!t.test(&v(json!({"a": 1, "b": 0.01}))));
        assert!(!t.test(&v(json!({"a": 1, "b": true, "c": ["X", "Y"], "d": "bar"}))));
    }

    #[test]
    fn test_strict_rejects_undeclared_trimmed_drops() {
        let strict = dict([("a", int())]).unwrap();
        let input = v(json!({"a": 1, "z": 9}));

        let err = strict.load(&input).unwrap_err();
        assert!(err.reason.contains("unexpected fields: z"));
        assert!(strict.save(&input).is_err());
        assert!(!strict.test(&input));

        let trimmed = strict.trimmed().unwrap();
        assert!(trimmed.record().unwrap().is_trimmed());
        assert!(trimmed.test(&input));
        assert_eq!(trimmed.load(&input).unwrap(), v(json!({"a": 1})));
        assert_eq!(trimmed.save(&input).unwrap(), v(json!({"a": 1})));
        assert!(trimmed.load(&v(json!({"z": 9}))).is_err());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let t = dict([("a", int()), ("c", boolean().default(false))]).unwrap();
        let input = v(json!({"a": 1}));
        let loaded = t.load(&input).unwrap();
        assert_eq!(input, v(json!({"a": 1})));
        assert_eq!(loaded, v(json!({"a": 1, "c": false})));
    }

    fn mixed_record() -> (Type, Value, Value) {
        let pattern = "%Y-%m-%d %H:%M:%S";
        let dt = NaiveDate::from_ymd_opt(2013, 9, 21).unwrap().and_hms_opt(11, 42, 33).unwrap();
        let t = dict([
            ("a", string()),
            ("b", int().optional()),
            ("c", boolean().default(false)),
            ("d", set([0, 1]).unwrap().default(0)),
            ("e", datetime().format(Format::pattern(pattern).unwrap()).optional()),
            ("f", optional()),
            ("g", default(())),
            ("h", (int() | ()).default(())),
        ])
        .unwrap();
        (t, Value::DateTime(dt), Value::from("2013-09-21 11:42:33"))
    }

    #[test]
    fn test_load_fills_defaults() {
        let (t, dt, dt_str) = mixed_record();

        assert_eq!(
            t.load(&v(json!({"a": ""}))).unwrap(),
            v(json!({"a": "", "c": false, "d": 0, "g": null, "h": null}))
        );
        assert_eq!(
            t.load(&v(json!({"a": "", "f": 1, "g": "foo"}))).unwrap(),
            v(json!({"a": "", "c": false, "d": 0, "f": 1, "g": "foo", "h": null}))
        );
        assert_eq!(
            t.load(&v(json!({"a": "", "b": 2, "c": true, "d": 1}))).unwrap(),
            v(json!({"a": "", "b": 2, "c": true, "d": 1, "g": null, "h": null}))
        );

        let input = Value::dict([("a", Value::from("")), ("e", dt_str), ("h", Value::Int(1))]);
        let expected = Value::dict([
            ("a", Value::from("")),
            ("c", Value::Bool(false)),
            ("d", Value::Int(0)),
            ("e", dt),
            ("g", Value::Null),
            ("h", Value::Int(1)),
        ]);
        assert_eq!(t.load(&input).unwrap(), expected);
    }

    #[test]
    fn test_save_omits_defaults() {
        let (t, dt, dt_str) = mixed_record();

        assert_eq!(t.save(&v(json!({"a": ""}))).unwrap(), v(json!({"a": ""})));
        assert_eq!(
            t.save(&v(json!({"a": "", "d": 0, "h": null}))).unwrap(),
            v(json!({"a": ""}))
        );
        assert_eq!(
            t.save(&v(json!({"a": "", "c": false, "d": 0, "f": 1, "g": [1, 2, 3], "h": null})))
                .unwrap(),
            v(json!({"a": "", "f": 1, "g": [1, 2, 3]}))
        );
        assert_eq!(
            t.save(&v(json!({"a": "", "b": 2, "c": true, "d": 1, "g": null, "h": null})))
                .unwrap(),
            v(json!({"a": "", "b": 2, "c": true, "d": 1}))
        );

        let input = Value::dict([
            ("a", Value::from("")),
            ("c", Value::Bool(false)),
            ("e", dt),
            ("h", Value::Int(1)),
        ]);
        let expected = Value::dict([("a", Value::from("")), ("e", dt_str), ("h", Value::Int(1))]);
        assert_eq!(t.save(&input).unwrap(), expected);
    }

    #[test]
    fn test_invalid_fields_fail_both_ways() {
        let (t, _, _) = mixed_record();
        for input in [
            json!({}),
            json!({"a": "", "b": "foo"}),
            json!({"a": "", "d": 2}),
            json!({"a": "", "e": "2012-12-12T12:12:12"}),
            json!({"a": "", "h": "foo"}),
        ] {
            let input = v(input);
            assert!(!t.test(&input));
            assert!(t.load(&input).is_err());
            assert!(t.save(&input).is_err());
        }
    }

    #[test]
    fn test_missing_field_reason() {
        let (t, _, _) = mixed_record();
        let err = t.load(&v(json!({}))).unwrap_err();
        assert_eq!(err.reason, "dict is missing field 'a'");
    }

    #[test]
    fn test_nested_field_path() {
        let inner = dict([("city", string())]).unwrap();
        let t = dict([("address", inner)]).unwrap();
        let err = t.load(&v(json!({"address": {"city": 5}}))).unwrap_err();
        assert_eq!(err.path, "$.address.city");
    }
}

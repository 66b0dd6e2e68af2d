//! Ordered alternation with first-match semantics

use tracing::{debug, trace};

use super::{Direction, Kind, Type};
use crate::error::{InvalidValue, Result};
use crate::value::Value;

/// Compose two descriptors into a union.
///
/// - two value sets merge into one value set
/// - union operands are flattened into their alternatives
/// - alternatives keep left-to-right order; a node already present (by
///   identity) is not added twice
pub fn compose(left: &Type, right: &Type) -> Type {
    if let (Kind::Set(a), Kind::Set(b)) = (left.kind(), right.kind()) {
        return Type::new(Kind::Set(a.merge(b)));
    }

    let mut alternatives: Vec<Type> = Vec::new();
    for ty in branches(left).iter().chain(branches(right)) {
        if !alternatives.iter().any(|seen| seen.same(ty)) {
            alternatives.push(ty.clone());
        }
    }
    Type::new(Kind::Union(alternatives))
}

fn branches(ty: &Type) -> &[Type] {
    match ty.kind() {
        Kind::Union(alternatives) => alternatives,
        _ => std::slice::from_ref(ty),
    }
}

pub(super) fn test(alternatives: &[Type], value: &Value) -> bool {
    alternatives.iter().any(|ty| ty.test(value))
}

/// Commit to the first alternative that converts the value
pub(super) fn convert(alternatives: &[Type], value: &Value, direction: Direction) -> Result<Value> {
    for (index, ty) in alternatives.iter().enumerate() {
        match ty.convert(value, direction) {
            Ok(converted) => return Ok(converted),
            Err(err) => trace!(index, alternative = ty.name(), %err, "union alternative rejected value"),
        }
    }

    debug!(
        alternatives = alternatives.len(),
        kind = value.type_name(),
        "value matches no union alternative"
    );
    Err(InvalidValue::new(format!(
        "{} value matches none of the valid types",
        value.type_name()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::*;
    use crate::descriptor::{Format, ValueTable};

    #[test]
    fn test_union_alternatives() {
        let t1 = string() | int();
        assert_eq!(t1.alternatives().unwrap(), &[string(), int()]);
        assert!(t1.test(&Value::from("a")));
        assert!(t1.test(&Value::Int(1209)));
        assert!(!t1.test(&Value::Bool(true)));
        assert!(!t1.test(&Value::Float(1.2)));
        assert!(!t1.test(&Value::Null));
    }

    #[test]
    fn test_union_with_unit_is_null() {
        let t = string() | ();
        assert_eq!(t.alternatives().unwrap(), &[string(), null()]);
    }

    #[test]
    fn test_union_flattens_in_order() {
        let t1 = string() | int();
        let t3 = &t1 | boolean();
        assert_eq!(t3.alternatives().unwrap(), &[string(), int(), boolean()]);

        let t4 = null() | &t1;
        assert_eq!(t4.alternatives().unwrap(), &[null(), string(), int()]);

        let t5 = t3 | t4;
        assert_eq!(t5.alternatives().unwrap(), &[string(), int(), boolean(), null()]);
    }

    #[test]
    fn test_structurally_equal_nodes_stay_distinct() {
        let t = list(int()) | list(int());
        assert_eq!(t.alternatives().unwrap().len(), 2);
    }

    #[test]
    fn test_first_match_wins() {
        let upper = int().format(ValueTable::new([(1, "one")]).unwrap());
        let lower = int().format(ValueTable::new([(1, "uno")]).unwrap());
        let t = &upper | &lower;
        assert_eq!(t.save(&Value::Int(1)).unwrap(), Value::from("one"));

        let t = lower | upper;
        assert_eq!(t.save(&Value::Int(1)).unwrap(), Value::from("uno"));
    }

    #[test]
    fn test_union_load_save() {
        let t = float() | boolean() | null();
        for value in [Value::Float(0.01), Value::Bool(false), Value::Null] {
            assert_eq!(t.load(&value).unwrap(), value);
            assert_eq!(t.save(&value).unwrap(), value);
        }
        for value in [Value::Int(1), Value::from("aerg"), Value::list([1, 2, 3])] {
            let err = t.load(&value).unwrap_err();
            assert!(err.reason.contains("none of the valid types"));
            assert!(t.save(&value).is_err());
        }
    }

    #[test]
    fn test_number() {
        let t = number();
        assert_eq!(t.load(&Value::Float(0.01)).unwrap(), Value::Float(0.01));
        assert_eq!(t.save(&Value::Int(1)).unwrap(), Value::Int(1));
        for value in [Value::Bool(false), Value::from("aerg"), Value::Null] {
            assert!(t.load(&value).is_err());
        }
    }

    #[test]
    fn test_json_branch_order() {
        let t = string() | int().format(Format::Json);
        // "5" is a string first; the JSON branch never sees it
        assert_eq!(t.load(&Value::from("5")).unwrap(), Value::from("5"));
    }
}

//! Homogeneous list and fixed-arity tuple descriptors

use super::{Direction, Type};
use crate::error::{InvalidValue, Result};
use crate::value::Value;

pub(super) fn test_list(element: &Type, value: &Value) -> bool {
    match value {
        Value::List(items) => items.iter().all(|item| element.test(item)),
        _ => false,
    }
}

pub(super) fn convert_list(element: &Type, value: &Value, direction: Direction) -> Result<Value> {
    let Value::List(items) = value else {
        return Err(InvalidValue::mismatch("list", value));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| element.convert(item, direction).map_err(|e| e.at_index(i)))
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}

pub(super) fn test_tuple(positions: &[Type], value: &Value) -> bool {
    match value {
        Value::Tuple(items) => {
            items.len() == positions.len()
                && positions.iter().zip(items).all(|(ty, item)| ty.test(item))
        }
        _ => false,
    }
}

pub(super) fn convert_tuple(positions: &[Type], value: &Value, direction: Direction) -> Result<Value> {
    let Value::Tuple(items) = value else {
        return Err(InvalidValue::mismatch("tuple", value));
    };
    if items.len() != positions.len() {
        return Err(InvalidValue::new(format!(
            "expected tuple of {} items, got {}",
            positions.len(),
            items.len()
        )));
    }

    positions
        .iter()
        .zip(items)
        .enumerate()
        .map(|(i, (ty, item))| ty.convert(item, direction).map_err(|e| e.at_index(i)))
        .collect::<Result<Vec<_>>>()
        .map(Value::Tuple)
}

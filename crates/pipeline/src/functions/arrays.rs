use value::{
    FieldValue,
    Number,
};

use super::{
    strict,
    strict_all,
};
use crate::EvaluateResult;

fn array_operand(x: &EvaluateResult) -> Result<&[FieldValue], EvaluateResult> {
    let [value] = strict([x])?;
    value.as_array().ok_or(EvaluateResult::Error)
}

pub fn array_length(array: &EvaluateResult) -> EvaluateResult {
    match array_operand(array) {
        Ok(elements) => EvaluateResult::Value(FieldValue::Int64(elements.len() as i64)),
        Err(outcome) => outcome,
    }
}

pub fn array_reverse(array: &EvaluateResult) -> EvaluateResult {
    match array_operand(array) {
        Ok(elements) => {
            EvaluateResult::Value(FieldValue::Array(elements.iter().rev().cloned().collect()))
        },
        Err(outcome) => outcome,
    }
}

pub fn array_concat(operands: &[EvaluateResult]) -> EvaluateResult {
    let values = match strict_all(operands) {
        Ok(values) => values,
        Err(outcome) => return outcome,
    };
    let mut out = vec![];
    for value in values {
        match value.as_array() {
            Some(elements) => out.extend_from_slice(elements),
            None => return EvaluateResult::Error,
        }
    }
    EvaluateResult::Value(FieldValue::Array(out))
}

/// Negative indexes count back from the end. An index past either end is
/// unset rather than an error.
pub fn array_get(array: &EvaluateResult, index: &EvaluateResult) -> EvaluateResult {
    let [array, index] = match strict([array, index]) {
        Ok(values) => values,
        Err(outcome) => return outcome,
    };
    let (Some(elements), Some(Number::Int(index))) = (array.as_array(), index.as_number()) else {
        return EvaluateResult::Error;
    };
    let len = elements.len() as i64;
    let position = if index < 0 { len + index } else { index };
    match usize::try_from(position).ok().and_then(|p| elements.get(p)) {
        Some(element) => EvaluateResult::Value(element.clone()),
        None => EvaluateResult::Unset,
    }
}

/// A missing key is unset.
pub fn map_get(map: &EvaluateResult, key: &EvaluateResult) -> EvaluateResult {
    let [map, key] = match strict([map, key]) {
        Ok(values) => values,
        Err(outcome) => return outcome,
    };
    let (Some(map), Some(key)) = (map.as_map(), key.as_str()) else {
        return EvaluateResult::Error;
    };
    match map.get(key) {
        Some(value) => EvaluateResult::Value(value.clone()),
        None => EvaluateResult::Unset,
    }
}

use std::cmp::Ordering;

use value::FieldValue;

use crate::EvaluateResult;

/// The total order, except that reaching a NaN at any depth leaves the pair
/// unordered. Elements past the first difference are not inspected.
fn compare_without_nan(l: &FieldValue, r: &FieldValue) -> Option<Ordering> {
    if l.is_nan() || r.is_nan() {
        return None;
    }
    match (l, r) {
        (FieldValue::Array(l), FieldValue::Array(r)) => {
            for (l, r) in l.iter().zip(r) {
                let cmp = compare_without_nan(l, r)?;
                if cmp.is_ne() {
                    return Some(cmp);
                }
            }
            Some(l.len().cmp(&r.len()))
        },
        (FieldValue::Map(l), FieldValue::Map(r)) => {
            for ((lk, lv), (rk, rv)) in l.iter().zip(r.iter()) {
                let cmp = match lk.cmp(rk) {
                    Ordering::Equal => compare_without_nan(lv, rv)?,
                    cmp => cmp,
                };
                if cmp.is_ne() {
                    return Some(cmp);
                }
            }
            Some(l.len().cmp(&r.len()))
        },
        (FieldValue::Vector(l), FieldValue::Vector(r)) if l.len() == r.len() => {
            for (l, r) in l.values().iter().zip(r.values()) {
                let cmp = l.partial_cmp(r)?;
                if cmp.is_ne() {
                    return Some(cmp);
                }
            }
            Some(Ordering::Equal)
        },
        (l, r) => Some(l.compare(r)),
    }
}

/// Shared shape of the six comparison operators. Unset or error operands are
/// errors and a null operand makes the result null. Operands that touch a NaN
/// or have different types are never equal and never ordered.
fn compare_with(
    l: &EvaluateResult,
    r: &EvaluateResult,
    unordered: bool,
    test: fn(Ordering) -> bool,
) -> EvaluateResult {
    let (EvaluateResult::Value(l), EvaluateResult::Value(r)) = (l, r) else {
        return EvaluateResult::Error;
    };
    if l.is_null() || r.is_null() {
        return EvaluateResult::NULL;
    }
    if l.type_order() != r.type_order() {
        return EvaluateResult::boolean(unordered);
    }
    match compare_without_nan(l, r) {
        Some(cmp) => EvaluateResult::boolean(test(cmp)),
        None => EvaluateResult::boolean(unordered),
    }
}

pub fn equal(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    compare_with(l, r, false, Ordering::is_eq)
}

pub fn not_equal(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    compare_with(l, r, true, Ordering::is_ne)
}

pub fn less_than(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    compare_with(l, r, false, Ordering::is_lt)
}

pub fn less_than_or_equal(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    compare_with(l, r, false, Ordering::is_le)
}

pub fn greater_than(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    compare_with(l, r, false, Ordering::is_gt)
}

pub fn greater_than_or_equal(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    compare_with(l, r, false, Ordering::is_ge)
}

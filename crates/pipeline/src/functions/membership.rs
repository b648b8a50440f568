//! Set membership uses value equality, so `1` and `1.0` are different
//! members. A null never matches anything here, not even another null.
use value::FieldValue;

use crate::EvaluateResult;

/// Unwraps a scalar operand and an array operand. Unset or error operands and
/// non-array arrays are errors; then a null on either side is null.
fn operands<'a>(
    x: &'a EvaluateResult,
    array: &'a EvaluateResult,
) -> Result<(&'a FieldValue, &'a [FieldValue]), EvaluateResult> {
    let (EvaluateResult::Value(x), EvaluateResult::Value(array)) = (x, array) else {
        return Err(EvaluateResult::Error);
    };
    let elements = match array {
        FieldValue::Array(elements) => elements.as_slice(),
        FieldValue::Null => return Err(EvaluateResult::NULL),
        _ => return Err(EvaluateResult::Error),
    };
    if x.is_null() {
        return Err(EvaluateResult::NULL);
    }
    Ok((x, elements))
}

/// Both operands must be arrays.
fn array_operands<'a>(
    array: &'a EvaluateResult,
    candidates: &'a EvaluateResult,
) -> Result<(&'a [FieldValue], &'a [FieldValue]), EvaluateResult> {
    let (EvaluateResult::Value(array), EvaluateResult::Value(candidates)) = (array, candidates)
    else {
        return Err(EvaluateResult::Error);
    };
    match (array, candidates) {
        (FieldValue::Array(array), FieldValue::Array(candidates)) => Ok((array, candidates)),
        (FieldValue::Array(_) | FieldValue::Null, FieldValue::Array(_) | FieldValue::Null) => {
            Err(EvaluateResult::NULL)
        },
        _ => Err(EvaluateResult::Error),
    }
}

fn contains(haystack: &[FieldValue], needle: &FieldValue) -> bool {
    !needle.is_null() && haystack.iter().any(|element| !element.is_null() && element == needle)
}

pub fn equal_any(x: &EvaluateResult, candidates: &EvaluateResult) -> EvaluateResult {
    match operands(x, candidates) {
        Ok((x, candidates)) => EvaluateResult::boolean(contains(candidates, x)),
        Err(outcome) => outcome,
    }
}

pub fn not_equal_any(x: &EvaluateResult, candidates: &EvaluateResult) -> EvaluateResult {
    match operands(x, candidates) {
        Ok((x, candidates)) => EvaluateResult::boolean(!contains(candidates, x)),
        Err(outcome) => outcome,
    }
}

pub fn array_contains(array: &EvaluateResult, x: &EvaluateResult) -> EvaluateResult {
    match operands(x, array) {
        Ok((x, array)) => EvaluateResult::boolean(contains(array, x)),
        Err(outcome) => outcome,
    }
}

pub fn array_contains_any(array: &EvaluateResult, candidates: &EvaluateResult) -> EvaluateResult {
    match array_operands(array, candidates) {
        Ok((array, candidates)) => {
            EvaluateResult::boolean(candidates.iter().any(|c| contains(array, c)))
        },
        Err(outcome) => outcome,
    }
}

/// A null among the required candidates can never be satisfied.
pub fn array_contains_all(array: &EvaluateResult, candidates: &EvaluateResult) -> EvaluateResult {
    match array_operands(array, candidates) {
        Ok((array, candidates)) => {
            EvaluateResult::boolean(candidates.iter().all(|c| contains(array, c)))
        },
        Err(outcome) => outcome,
    }
}

#[cfg(test)]
mod tests {
    use value::{
        val,
        Decimal128,
        GeoPoint,
    };

    use super::*;

    fn v(value: FieldValue) -> EvaluateResult {
        EvaluateResult::Value(value)
    }

    #[test]
    fn test_equal_any() {
        let candidates = v(val!([null, 1]));
        assert_eq!(equal_any(&v(val!(1)), &candidates), EvaluateResult::TRUE);
        assert_eq!(equal_any(&v(val!(null)), &candidates), EvaluateResult::NULL);
        assert_eq!(equal_any(&v(val!(2)), &candidates), EvaluateResult::FALSE);
        // Membership does not unify numeric widths.
        assert_eq!(equal_any(&v(val!(1.0)), &candidates), EvaluateResult::FALSE);
        assert_eq!(
            equal_any(&v(val!(f64::NAN)), &v(FieldValue::Array(vec![val!(f64::NAN)]))),
            EvaluateResult::TRUE
        );
        assert_eq!(
            not_equal_any(&v(val!(2)), &candidates),
            EvaluateResult::TRUE
        );
        assert_eq!(
            equal_any(&v(val!(1)), &v(val!(null))),
            EvaluateResult::NULL
        );
        assert_eq!(equal_any(&v(val!(1)), &v(val!(1))), EvaluateResult::Error);
        assert_eq!(
            equal_any(&EvaluateResult::Unset, &candidates),
            EvaluateResult::Error
        );
    }

    #[test]
    fn test_signed_zero_members_are_distinct() -> anyhow::Result<()> {
        let decimals = v(FieldValue::Array(vec![FieldValue::Decimal128(
            Decimal128::new("0")?,
        )]));
        let negative_zero = v(FieldValue::Decimal128(Decimal128::new("-0")?));
        assert_eq!(equal_any(&negative_zero, &decimals), EvaluateResult::FALSE);
        assert_eq!(not_equal_any(&negative_zero, &decimals), EvaluateResult::TRUE);

        let points = v(FieldValue::Array(vec![FieldValue::GeoPoint(GeoPoint::new(
            0.0, 0.0,
        )?)]));
        assert_eq!(
            array_contains(&points, &v(FieldValue::GeoPoint(GeoPoint::new(-0.0, 0.0)?))),
            EvaluateResult::FALSE
        );
        assert_eq!(
            array_contains(&points, &v(FieldValue::GeoPoint(GeoPoint::new(0.0, 0.0)?))),
            EvaluateResult::TRUE
        );
        Ok(())
    }

    #[test]
    fn test_array_contains() {
        let array = v(val!([1, "a", null, [2]]));
        assert_eq!(array_contains(&array, &v(val!("a"))), EvaluateResult::TRUE);
        assert_eq!(array_contains(&array, &v(val!([2]))), EvaluateResult::TRUE);
        assert_eq!(array_contains(&array, &v(val!(null))), EvaluateResult::NULL);
        assert_eq!(array_contains(&array, &v(val!(2))), EvaluateResult::FALSE);
        assert_eq!(
            array_contains(&v(val!("a")), &v(val!("a"))),
            EvaluateResult::Error
        );
        assert_eq!(
            array_contains(&EvaluateResult::Unset, &v(val!("a"))),
            EvaluateResult::Error
        );
    }

    #[test]
    fn test_array_contains_any_and_all() {
        let array = v(val!([1, 2, null]));
        assert_eq!(
            array_contains_any(&array, &v(val!([3, 2]))),
            EvaluateResult::TRUE
        );
        assert_eq!(
            array_contains_any(&array, &v(val!([null, 3]))),
            EvaluateResult::FALSE
        );
        assert_eq!(
            array_contains_all(&array, &v(val!([2, 1, 1]))),
            EvaluateResult::TRUE
        );
        assert_eq!(
            array_contains_all(&array, &v(val!([1, null]))),
            EvaluateResult::FALSE
        );
        assert_eq!(array_contains_all(&array, &v(val!([]))), EvaluateResult::TRUE);
        assert_eq!(
            array_contains_any(&v(val!(null)), &v(val!([1]))),
            EvaluateResult::NULL
        );
        assert_eq!(
            array_contains_any(&array, &v(val!(1))),
            EvaluateResult::Error
        );
    }
}

use value::FieldValue;

use crate::EvaluateResult;

/// True unless the operand is unset. Errors still propagate.
pub fn exists(x: &EvaluateResult) -> EvaluateResult {
    match x {
        EvaluateResult::Value(_) => EvaluateResult::TRUE,
        EvaluateResult::Unset => EvaluateResult::FALSE,
        EvaluateResult::Error => EvaluateResult::Error,
    }
}

pub fn is_absent(x: &EvaluateResult) -> EvaluateResult {
    match x {
        EvaluateResult::Value(_) => EvaluateResult::FALSE,
        EvaluateResult::Unset => EvaluateResult::TRUE,
        EvaluateResult::Error => EvaluateResult::Error,
    }
}

/// Null checks apply to present values only; use `exists` for missing fields.
pub fn is_null(x: &EvaluateResult) -> EvaluateResult {
    match x {
        EvaluateResult::Value(value) => EvaluateResult::boolean(value.is_null()),
        EvaluateResult::Unset | EvaluateResult::Error => EvaluateResult::Error,
    }
}

pub fn is_not_null(x: &EvaluateResult) -> EvaluateResult {
    match x {
        EvaluateResult::Value(value) => EvaluateResult::boolean(!value.is_null()),
        EvaluateResult::Unset | EvaluateResult::Error => EvaluateResult::Error,
    }
}

/// NaN checks are defined for numbers only; a null operand is null.
fn nan_check(x: &EvaluateResult, expected: bool) -> EvaluateResult {
    match x {
        EvaluateResult::Value(FieldValue::Null) => EvaluateResult::NULL,
        EvaluateResult::Value(value) if value.as_number().is_some() => {
            EvaluateResult::boolean(value.is_nan() == expected)
        },
        EvaluateResult::Value(_) | EvaluateResult::Unset | EvaluateResult::Error => {
            EvaluateResult::Error
        },
    }
}

pub fn is_nan(x: &EvaluateResult) -> EvaluateResult {
    nan_check(x, true)
}

pub fn is_not_nan(x: &EvaluateResult) -> EvaluateResult {
    nan_check(x, false)
}

#[cfg(test)]
mod tests {
    use value::{
        val,
        Decimal128,
        FieldValue,
    };

    use super::*;

    #[test]
    fn test_existence() {
        let present = EvaluateResult::from(val!(null));
        assert_eq!(exists(&present), EvaluateResult::TRUE);
        assert_eq!(exists(&EvaluateResult::Unset), EvaluateResult::FALSE);
        assert_eq!(exists(&EvaluateResult::Error), EvaluateResult::Error);
        assert_eq!(is_absent(&present), EvaluateResult::FALSE);
        assert_eq!(is_absent(&EvaluateResult::Unset), EvaluateResult::TRUE);
    }

    #[test]
    fn test_null_checks() {
        assert_eq!(is_null(&EvaluateResult::NULL), EvaluateResult::TRUE);
        assert_eq!(is_null(&EvaluateResult::from(val!(0))), EvaluateResult::FALSE);
        assert_eq!(is_null(&EvaluateResult::Unset), EvaluateResult::Error);
        assert_eq!(is_not_null(&EvaluateResult::from(val!(0))), EvaluateResult::TRUE);
    }

    #[test]
    fn test_nan_checks() -> anyhow::Result<()> {
        assert_eq!(is_nan(&EvaluateResult::from(val!(f64::NAN))), EvaluateResult::TRUE);
        assert_eq!(
            is_nan(&EvaluateResult::from(FieldValue::Decimal128(Decimal128::new("NaN")?))),
            EvaluateResult::TRUE
        );
        assert_eq!(is_nan(&EvaluateResult::from(val!(1))), EvaluateResult::FALSE);
        assert_eq!(is_not_nan(&EvaluateResult::from(val!(1.5))), EvaluateResult::TRUE);
        assert_eq!(is_nan(&EvaluateResult::NULL), EvaluateResult::NULL);
        assert_eq!(is_nan(&EvaluateResult::from(val!("NaN"))), EvaluateResult::Error);
        Ok(())
    }
}

//! Integer arithmetic is checked: overflow and integer division by zero are
//! errors rather than wrapping or promoting. Mixing an integer with a double
//! promotes to IEEE-754 double arithmetic.
use value::{
    numeric::Number,
    FieldValue,
};

use crate::EvaluateResult;

fn is_null_or_number(value: &FieldValue) -> bool {
    value.is_null() || value.as_number().is_some()
}

/// Operands of a binary operator. A null next to a number or another null
/// makes the result null; any other non-numeric operand is an error.
fn numeric_operands(
    l: &EvaluateResult,
    r: &EvaluateResult,
) -> Result<(Number, Number), EvaluateResult> {
    let (EvaluateResult::Value(l), EvaluateResult::Value(r)) = (l, r) else {
        return Err(EvaluateResult::Error);
    };
    match (l.as_number(), r.as_number()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ if is_null_or_number(l) && is_null_or_number(r) => Err(EvaluateResult::NULL),
        _ => Err(EvaluateResult::Error),
    }
}

fn numeric_operand(x: &EvaluateResult) -> Result<Number, EvaluateResult> {
    match x {
        EvaluateResult::Value(FieldValue::Null) => Err(EvaluateResult::NULL),
        EvaluateResult::Value(value) => value.as_number().ok_or(EvaluateResult::Error),
        EvaluateResult::Unset | EvaluateResult::Error => Err(EvaluateResult::Error),
    }
}

fn double(f: f64) -> EvaluateResult {
    EvaluateResult::Value(FieldValue::Float64(f))
}

fn binary_arithmetic<I, F>(
    l: &EvaluateResult,
    r: &EvaluateResult,
    do_ints: I,
    do_doubles: F,
) -> EvaluateResult
where
    I: FnOnce(i64, i64) -> Option<i64>,
    F: FnOnce(f64, f64) -> f64,
{
    match numeric_operands(l, r) {
        Ok((Number::Int(l), Number::Int(r))) => match do_ints(l, r) {
            Some(n) => EvaluateResult::Value(FieldValue::Int64(n)),
            None => EvaluateResult::Error,
        },
        Ok((l, r)) => double(do_doubles(l.as_f64(), r.as_f64())),
        Err(outcome) => outcome,
    }
}

pub fn add(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    binary_arithmetic(l, r, i64::checked_add, |l, r| l + r)
}

pub fn subtract(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    binary_arithmetic(l, r, i64::checked_sub, |l, r| l - r)
}

pub fn multiply(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    binary_arithmetic(l, r, i64::checked_mul, |l, r| l * r)
}

/// Integer division truncates toward zero.
pub fn divide(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    binary_arithmetic(l, r, i64::checked_div, |l, r| l / r)
}

/// Truncated remainder: the result takes the dividend's sign.
pub fn modulo(l: &EvaluateResult, r: &EvaluateResult) -> EvaluateResult {
    binary_arithmetic(
        l,
        r,
        |l, r| (r != 0).then(|| l.wrapping_rem(r)),
        |l, r| l % r,
    )
}

pub fn pow(base: &EvaluateResult, exponent: &EvaluateResult) -> EvaluateResult {
    let (base, exponent) = match numeric_operands(base, exponent) {
        Ok((base, exponent)) => (base.as_f64(), exponent.as_f64()),
        Err(outcome) => return outcome,
    };
    if exponent == 0.0 || base == 1.0 {
        return double(1.0);
    }
    if base < 0.0 && exponent.is_finite() && exponent.fract() != 0.0 {
        return EvaluateResult::Error;
    }
    if base == 0.0 && exponent < 0.0 {
        return EvaluateResult::Error;
    }
    double(base.powf(exponent))
}

pub fn log(x: &EvaluateResult, base: &EvaluateResult) -> EvaluateResult {
    let (x, base) = match numeric_operands(x, base) {
        Ok((x, base)) => (x.as_f64(), base.as_f64()),
        Err(outcome) => return outcome,
    };
    if x < 0.0 || base <= 0.0 || base == 1.0 {
        return EvaluateResult::Error;
    }
    double(x.ln() / base.ln())
}

/// Applies `f` to a double operand, rejecting negative input.
fn non_negative(x: &EvaluateResult, f: fn(f64) -> f64) -> EvaluateResult {
    match numeric_operand(x) {
        Ok(n) if n.as_f64() < 0.0 => EvaluateResult::Error,
        Ok(n) => double(f(n.as_f64())),
        Err(outcome) => outcome,
    }
}

pub fn ln(x: &EvaluateResult) -> EvaluateResult {
    non_negative(x, f64::ln)
}

pub fn log10(x: &EvaluateResult) -> EvaluateResult {
    non_negative(x, f64::log10)
}

pub fn sqrt(x: &EvaluateResult) -> EvaluateResult {
    non_negative(x, f64::sqrt)
}

pub fn exp(x: &EvaluateResult) -> EvaluateResult {
    match numeric_operand(x) {
        Ok(n) => double(n.as_f64().exp()),
        Err(outcome) => outcome,
    }
}

/// Integers pass through unchanged (there is no symmetric `abs` for the
/// minimum integer, so that one is an error); doubles use `f`.
fn integral_or(
    x: &EvaluateResult,
    do_int: fn(i64) -> Option<i64>,
    f: fn(f64) -> f64,
) -> EvaluateResult {
    match numeric_operand(x) {
        Ok(Number::Int(i)) => match do_int(i) {
            Some(i) => EvaluateResult::Value(FieldValue::Int64(i)),
            None => EvaluateResult::Error,
        },
        Ok(Number::Double(d)) => double(f(d)),
        Err(outcome) => outcome,
    }
}

pub fn abs(x: &EvaluateResult) -> EvaluateResult {
    integral_or(x, i64::checked_abs, f64::abs)
}

/// Rounds half away from zero.
pub fn round(x: &EvaluateResult) -> EvaluateResult {
    integral_or(x, Some, f64::round)
}

pub fn ceil(x: &EvaluateResult) -> EvaluateResult {
    integral_or(x, Some, f64::ceil)
}

pub fn floor(x: &EvaluateResult) -> EvaluateResult {
    integral_or(x, Some, f64::floor)
}

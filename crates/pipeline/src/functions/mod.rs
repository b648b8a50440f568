//! The built-in function library.
//!
//! Most functions are strict: every argument is evaluated first, an unset or
//! error argument makes the call an error and a null argument makes it null.
//! The logical connectives, `cond` and `if_error` instead evaluate their
//! arguments lazily, and the existence checks inspect unset and error
//! outcomes rather than propagating them.
use value::{
    Document,
    FieldValue,
};

use crate::{
    expression::{
        FunctionExpr,
        FunctionName,
    },
    metrics::log_evaluation_error,
    EvaluateResult,
    EvaluationContext,
    Expression,
};

mod arithmetic;
mod arrays;
mod comparison;
mod logical;
mod membership;
mod strings;
mod timestamps;
mod types;
mod vectors;

pub(crate) fn evaluate_function(
    function: &FunctionExpr,
    context: EvaluationContext<'_>,
    document: &Document,
) -> EvaluateResult {
    let FunctionExpr { name, args } = function;
    let eval = |expr: &Expression| expr.evaluate(context, document);
    let result = match (name, args.as_slice()) {
        (FunctionName::And, args) => logical::and(args.iter().map(eval)),
        (FunctionName::Or, args) => logical::or(args.iter().map(eval)),
        (FunctionName::Cond, [condition, then, otherwise]) => {
            logical::cond(eval(condition), || eval(then), || eval(otherwise))
        },
        (FunctionName::IfError, [expr, fallback]) => {
            logical::if_error(eval(expr), || eval(fallback))
        },
        (name, args) if name.arity().accepts(args.len()) => {
            let operands: Vec<EvaluateResult> = args.iter().map(eval).collect();
            evaluate_eager(*name, &operands)
        },
        _ => EvaluateResult::Error,
    };
    if result.is_error() {
        log_evaluation_error(*name);
    }
    result
}

fn evaluate_eager(name: FunctionName, operands: &[EvaluateResult]) -> EvaluateResult {
    use FunctionName as F;
    match (name, operands) {
        (F::Add, [l, r]) => arithmetic::add(l, r),
        (F::Subtract, [l, r]) => arithmetic::subtract(l, r),
        (F::Multiply, [l, r]) => arithmetic::multiply(l, r),
        (F::Divide, [l, r]) => arithmetic::divide(l, r),
        (F::Mod, [l, r]) => arithmetic::modulo(l, r),
        (F::Pow, [l, r]) => arithmetic::pow(l, r),
        (F::Log, [x, base]) => arithmetic::log(x, base),
        (F::Abs, [x]) => arithmetic::abs(x),
        (F::Exp, [x]) => arithmetic::exp(x),
        (F::Ln, [x]) => arithmetic::ln(x),
        (F::Log10, [x]) => arithmetic::log10(x),
        (F::Sqrt, [x]) => arithmetic::sqrt(x),
        (F::Round, [x]) => arithmetic::round(x),
        (F::Ceil, [x]) => arithmetic::ceil(x),
        (F::Floor, [x]) => arithmetic::floor(x),

        (F::Equal, [l, r]) => comparison::equal(l, r),
        (F::NotEqual, [l, r]) => comparison::not_equal(l, r),
        (F::LessThan, [l, r]) => comparison::less_than(l, r),
        (F::LessThanOrEqual, [l, r]) => comparison::less_than_or_equal(l, r),
        (F::GreaterThan, [l, r]) => comparison::greater_than(l, r),
        (F::GreaterThanOrEqual, [l, r]) => comparison::greater_than_or_equal(l, r),

        (F::Xor, operands) => logical::xor(operands),
        (F::Not, [x]) => logical::not(x),
        (F::IsError, [x]) => EvaluateResult::boolean(x.is_error()),
        (F::LogicalMaximum, operands) => logical::logical_maximum(operands),
        (F::LogicalMinimum, operands) => logical::logical_minimum(operands),

        (F::Exists, [x]) => types::exists(x),
        (F::IsAbsent, [x]) => types::is_absent(x),
        (F::IsNull, [x]) => types::is_null(x),
        (F::IsNotNull, [x]) => types::is_not_null(x),
        (F::IsNan, [x]) => types::is_nan(x),
        (F::IsNotNan, [x]) => types::is_not_nan(x),

        (F::EqualAny, [x, candidates]) => membership::equal_any(x, candidates),
        (F::NotEqualAny, [x, candidates]) => membership::not_equal_any(x, candidates),
        (F::ArrayContains, [array, x]) => membership::array_contains(array, x),
        (F::ArrayContainsAny, [array, candidates]) => {
            membership::array_contains_any(array, candidates)
        },
        (F::ArrayContainsAll, [array, candidates]) => {
            membership::array_contains_all(array, candidates)
        },

        (F::CharLength, [s]) => strings::char_length(s),
        (F::ByteLength, [s]) => strings::byte_length(s),
        (F::ToLower, [s]) => strings::to_lower(s),
        (F::ToUpper, [s]) => strings::to_upper(s),
        (F::Trim, [s]) => strings::trim(s),
        (F::StringReverse, [s]) => strings::string_reverse(s),
        (F::StartsWith, [s, prefix]) => strings::starts_with(s, prefix),
        (F::EndsWith, [s, suffix]) => strings::ends_with(s, suffix),
        (F::StringContains, [s, needle]) => strings::string_contains(s, needle),
        (F::StringConcat, operands) => strings::string_concat(operands),
        (F::Like, [s, pattern]) => strings::like(s, pattern),
        (F::RegexContains, [s, pattern]) => strings::regex_contains(s, pattern),
        (F::RegexMatch, [s, pattern]) => strings::regex_match(s, pattern),

        (F::ArrayLength, [array]) => arrays::array_length(array),
        (F::ArrayReverse, [array]) => arrays::array_reverse(array),
        (F::ArrayConcat, operands) => arrays::array_concat(operands),
        (F::ArrayGet, [array, index]) => arrays::array_get(array, index),
        (F::MapGet, [map, key]) => arrays::map_get(map, key),

        (F::TimestampToUnixSeconds, [ts]) => {
            timestamps::timestamp_to_unix(ts, timestamps::TimeUnit::Second)
        },
        (F::TimestampToUnixMillis, [ts]) => {
            timestamps::timestamp_to_unix(ts, timestamps::TimeUnit::Millisecond)
        },
        (F::TimestampToUnixMicros, [ts]) => {
            timestamps::timestamp_to_unix(ts, timestamps::TimeUnit::Microsecond)
        },
        (F::UnixSecondsToTimestamp, [n]) => {
            timestamps::unix_to_timestamp(n, timestamps::TimeUnit::Second)
        },
        (F::UnixMillisToTimestamp, [n]) => {
            timestamps::unix_to_timestamp(n, timestamps::TimeUnit::Millisecond)
        },
        (F::UnixMicrosToTimestamp, [n]) => {
            timestamps::unix_to_timestamp(n, timestamps::TimeUnit::Microsecond)
        },
        (F::TimestampAdd, [ts, unit, amount]) => timestamps::timestamp_add(ts, unit, amount),
        (F::TimestampSubtract, [ts, unit, amount]) => {
            timestamps::timestamp_subtract(ts, unit, amount)
        },

        (F::VectorLength, [v]) => vectors::vector_length(v),
        (F::DotProduct, [l, r]) => vectors::dot_product(l, r),
        (F::EuclideanDistance, [l, r]) => vectors::euclidean_distance(l, r),
        (F::CosineDistance, [l, r]) => vectors::cosine_distance(l, r),

        // Argument counts are checked before dispatch; the lazy functions
        // never reach here.
        _ => EvaluateResult::Error,
    }
}

/// The values behind a strict function's operands. An unset or error operand
/// fails the call; otherwise a null operand makes the result null.
pub(crate) fn strict<'a, const N: usize>(
    operands: [&'a EvaluateResult; N],
) -> Result<[&'a FieldValue; N], EvaluateResult> {
    let values = strict_all(operands)?;
    values.try_into().map_err(|_| EvaluateResult::Error)
}

/// [`strict`] over any number of operands.
pub(crate) fn strict_all<'a>(
    operands: impl IntoIterator<Item = &'a EvaluateResult>,
) -> Result<Vec<&'a FieldValue>, EvaluateResult> {
    let mut values = vec![];
    for operand in operands {
        match operand {
            EvaluateResult::Value(value) => values.push(value),
            EvaluateResult::Unset | EvaluateResult::Error => return Err(EvaluateResult::Error),
        }
    }
    if values.iter().any(|v| v.is_null()) {
        return Err(EvaluateResult::NULL);
    }
    Ok(values)
}

/// Collapses the `Result` used for early returns inside function bodies.
pub(crate) fn flatten(result: Result<EvaluateResult, EvaluateResult>) -> EvaluateResult {
    match result {
        Ok(outcome) | Err(outcome) => outcome,
    }
}

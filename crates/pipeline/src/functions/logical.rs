//! Four-valued logic over true, false, null and error. Unset operands count
//! as null; non-boolean values count as errors.
use value::FieldValue;

use crate::EvaluateResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Truth {
    True,
    False,
    Null,
    Error,
}

fn truth(outcome: &EvaluateResult) -> Truth {
    match outcome {
        EvaluateResult::Value(FieldValue::Boolean(true)) => Truth::True,
        EvaluateResult::Value(FieldValue::Boolean(false)) => Truth::False,
        EvaluateResult::Value(FieldValue::Null) | EvaluateResult::Unset => Truth::Null,
        EvaluateResult::Value(_) | EvaluateResult::Error => Truth::Error,
    }
}

/// Operands are consumed left to right. The first `dominant` operand decides
/// the result; the first error seen before it makes the whole an error.
fn connective(operands: impl Iterator<Item = EvaluateResult>, dominant: bool) -> EvaluateResult {
    let mut saw_null = false;
    for operand in operands {
        match truth(&operand) {
            Truth::True if dominant => return EvaluateResult::TRUE,
            Truth::False if !dominant => return EvaluateResult::FALSE,
            Truth::True | Truth::False => (),
            Truth::Null => saw_null = true,
            Truth::Error => return EvaluateResult::Error,
        }
    }
    if saw_null {
        EvaluateResult::NULL
    } else {
        EvaluateResult::boolean(!dominant)
    }
}

/// `false` dominates: `and(false, <error>)` is false, `and(<error>, false)` is
/// an error.
pub fn and(operands: impl Iterator<Item = EvaluateResult>) -> EvaluateResult {
    connective(operands, false)
}

/// `true` dominates, mirroring [`and`].
pub fn or(operands: impl Iterator<Item = EvaluateResult>) -> EvaluateResult {
    connective(operands, true)
}

/// No operand dominates: an error anywhere is an error, then a null anywhere
/// is null.
pub fn xor(operands: &[EvaluateResult]) -> EvaluateResult {
    let mut saw_null = false;
    let mut parity = false;
    for operand in operands {
        match truth(operand) {
            Truth::Error => return EvaluateResult::Error,
            Truth::Null => saw_null = true,
            Truth::True => parity = !parity,
            Truth::False => (),
        }
    }
    if saw_null {
        EvaluateResult::NULL
    } else {
        EvaluateResult::boolean(parity)
    }
}

pub fn not(x: &EvaluateResult) -> EvaluateResult {
    match truth(x) {
        Truth::True => EvaluateResult::FALSE,
        Truth::False => EvaluateResult::TRUE,
        Truth::Null => EvaluateResult::NULL,
        Truth::Error => EvaluateResult::Error,
    }
}

/// Evaluates `then` when the condition is true and `otherwise` when it is
/// false or null. Only the chosen branch is evaluated.
pub fn cond(
    condition: EvaluateResult,
    then: impl FnOnce() -> EvaluateResult,
    otherwise: impl FnOnce() -> EvaluateResult,
) -> EvaluateResult {
    match truth(&condition) {
        Truth::True => then(),
        Truth::False | Truth::Null => otherwise(),
        Truth::Error => EvaluateResult::Error,
    }
}

pub fn if_error(
    outcome: EvaluateResult,
    fallback: impl FnOnce() -> EvaluateResult,
) -> EvaluateResult {
    if outcome.is_error() {
        fallback()
    } else {
        outcome
    }
}

/// The greatest present, non-null operand, or null when there is none.
pub fn logical_maximum(operands: &[EvaluateResult]) -> EvaluateResult {
    extremum(operands, |candidate, best| candidate.compare(best).is_gt())
}

pub fn logical_minimum(operands: &[EvaluateResult]) -> EvaluateResult {
    extremum(operands, |candidate, best| candidate.compare(best).is_lt())
}

fn extremum(
    operands: &[EvaluateResult],
    better: fn(&FieldValue, &FieldValue) -> bool,
) -> EvaluateResult {
    let mut best: Option<&FieldValue> = None;
    for value in operands.iter().filter_map(EvaluateResult::value) {
        if value.is_null() {
            continue;
        }
        if best.is_none_or(|best| better(value, best)) {
            best = Some(value);
        }
    }
    match best {
        Some(value) => EvaluateResult::Value(value.clone()),
        None => EvaluateResult::NULL,
    }
}

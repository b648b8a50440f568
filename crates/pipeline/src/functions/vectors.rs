//! Vector functions accept vector values as well as arrays of numbers.
use value::FieldValue;

use super::strict;
use crate::EvaluateResult;

fn components(value: &FieldValue) -> Result<Vec<f64>, EvaluateResult> {
    match value {
        FieldValue::Vector(v) => Ok(v.values().to_vec()),
        FieldValue::Array(elements) => elements
            .iter()
            .map(|e| e.as_number().map(|n| n.as_f64()))
            .collect::<Option<Vec<_>>>()
            .ok_or(EvaluateResult::Error),
        _ => Err(EvaluateResult::Error),
    }
}

/// Both operands as equal-length component lists.
fn pair(
    left: &EvaluateResult,
    right: &EvaluateResult,
) -> Result<(Vec<f64>, Vec<f64>), EvaluateResult> {
    let [left, right] = strict([left, right])?;
    let (left, right) = (components(left)?, components(right)?);
    if left.len() != right.len() {
        return Err(EvaluateResult::Error);
    }
    Ok((left, right))
}

fn double(d: f64) -> EvaluateResult {
    EvaluateResult::Value(FieldValue::Float64(d))
}

fn dot(left: &[f64], right: &[f64]) -> f64 {
    left.iter().zip(right).map(|(l, r)| l * r).sum()
}

pub fn vector_length(v: &EvaluateResult) -> EvaluateResult {
    let [v] = match strict([v]) {
        Ok(values) => values,
        Err(outcome) => return outcome,
    };
    match components(v) {
        Ok(components) => EvaluateResult::Value(FieldValue::Int64(components.len() as i64)),
        Err(outcome) => outcome,
    }
}

pub fn dot_product(left: &EvaluateResult, right: &EvaluateResult) -> EvaluateResult {
    match pair(left, right) {
        Ok((left, right)) => double(dot(&left, &right)),
        Err(outcome) => outcome,
    }
}

pub fn euclidean_distance(left: &EvaluateResult, right: &EvaluateResult) -> EvaluateResult {
    match pair(left, right) {
        Ok((left, right)) => double(
            left.iter()
                .zip(&right)
                .map(|(l, r)| (l - r) * (l - r))
                .sum::<f64>()
                .sqrt(),
        ),
        Err(outcome) => outcome,
    }
}

/// One minus the cosine similarity. Undefined, and so an error, when either
/// operand has zero magnitude.
pub fn cosine_distance(left: &EvaluateResult, right: &EvaluateResult) -> EvaluateResult {
    let (left, right) = match pair(left, right) {
        Ok(pair) => pair,
        Err(outcome) => return outcome,
    };
    let magnitude = dot(&left, &left).sqrt() * dot(&right, &right).sqrt();
    if magnitude == 0.0 {
        return EvaluateResult::Error;
    }
    double(1.0 - dot(&left, &right) / magnitude)
}

#[cfg(test)]
mod tests {
    use value::{
        val,
        VectorValue,
    };

    use super::*;

    fn v(value: FieldValue) -> EvaluateResult {
        EvaluateResult::Value(value)
    }

    fn vector(values: &[f64]) -> EvaluateResult {
        v(FieldValue::Vector(VectorValue::new(values.to_vec())))
    }

    #[test]
    fn test_vector_length() {
        assert_eq!(vector_length(&vector(&[1.0, 2.0])), v(val!(2)));
        assert_eq!(vector_length(&v(val!([1, 2.5, 3]))), v(val!(3)));
        assert_eq!(vector_length(&v(val!(["a"]))), EvaluateResult::Error);
        assert_eq!(vector_length(&EvaluateResult::NULL), EvaluateResult::NULL);
    }

    #[test]
    fn test_distances() {
        let a = vector(&[1.0, 2.0]);
        let b = v(val!([3, 4]));
        assert_eq!(dot_product(&a, &b), v(val!(11.0)));
        assert_eq!(euclidean_distance(&vector(&[0.0, 0.0]), &b), v(val!(5.0)));
        assert_eq!(cosine_distance(&vector(&[1.0, 0.0]), &vector(&[3.0, 0.0])), v(val!(0.0)));
        assert_eq!(cosine_distance(&vector(&[1.0, 0.0]), &vector(&[0.0, 1.0])), v(val!(1.0)));
        assert_eq!(cosine_distance(&a, &vector(&[0.0, 0.0])), EvaluateResult::Error);
        assert_eq!(dot_product(&a, &vector(&[1.0])), EvaluateResult::Error);
        assert_eq!(dot_product(&a, &EvaluateResult::NULL), EvaluateResult::NULL);
    }
}

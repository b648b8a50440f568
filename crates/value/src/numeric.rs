//! Helpers for working with the shared numeric line.
use std::cmp::Ordering;

/// Is a floating point number an integer? Note that we do not consider negative
/// zero an integer, since we want there to be an injection between the subset
/// of `is_integral` floating point numbers and the integers.
#[allow(clippy::float_cmp)]
pub fn is_integral(n: f64) -> Option<i64> {
    let truncated = n.trunc();
    if !is_negative_zero(n)
        && !n.is_infinite()
        && truncated == n
        && (-TWO_TO_THE_63..TWO_TO_THE_63).contains(&n)
    {
        Some(truncated as i64)
    } else {
        None
    }
}

/// Is a floating point number negative zero?
pub fn is_negative_zero(n: f64) -> bool {
    matches!(n.total_cmp(&-0.0), Ordering::Equal)
}

const TWO_TO_THE_63: f64 = 9_223_372_036_854_775_808.0;

/// Orders doubles on the numeric line: NaN is below everything (and equal to
/// itself) and the two zeros are equal.
pub fn compare_f64(left: f64, right: f64) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison between a double and a 64-bit integer, without rounding
/// the integer through a double first.
pub fn compare_mixed(double: f64, integer: i64) -> Ordering {
    if double.is_nan() {
        return Ordering::Less;
    }
    // i64::MIN is exactly representable, so anything strictly below it is out
    // of range (including -Infinity).
    if double < -TWO_TO_THE_63 {
        return Ordering::Less;
    }
    // i64::MAX is not: it rounds up to 2^63.
    if double >= TWO_TO_THE_63 {
        return Ordering::Greater;
    }
    let truncated = double as i64;
    match truncated.cmp(&integer) {
        Ordering::Equal => compare_f64(double, integer as f64),
        other => other,
    }
}

/// A numeric operand with the widths collapsed: 32-bit integers widen to 64
/// bits and decimals evaluate through their double value.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int(i64),
    Double(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Double(d) => d,
        }
    }

    pub fn is_nan(self) -> bool {
        match self {
            Number::Int(_) => false,
            Number::Double(d) => d.is_nan(),
        }
    }

    pub fn compare(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::Int(l), Number::Int(r)) => l.cmp(&r),
            (Number::Double(l), Number::Double(r)) => compare_f64(l, r),
            (Number::Double(l), Number::Int(r)) => compare_mixed(l, r),
            (Number::Int(l), Number::Double(r)) => compare_mixed(r, l).reverse(),
        }
    }
}

/// Maps a double onto a `u64` whose unsigned order matches [`compare_f64`].
/// Both zeros map to the same key and NaN maps below -Infinity.
pub fn sortable_f64_bits(n: f64) -> u64 {
    if n.is_nan() {
        return 0;
    }
    let n = if n == 0.0 { 0.0 } else { n };
    let bits = n.to_bits();
    if bits & (1 << 63) != 0 {
        !bits
    } else {
        bits | (1 << 63)
    }
}

/// The nearest double to `n` and the exact integer offset from it. The offset
/// is bounded by half an ulp at 2^63, well inside an `i16`.
pub fn split_i64(n: i64) -> (f64, i16) {
    let nearest = n as f64;
    let residual = i128::from(n) - nearest as i128;
    (nearest, residual as i16)
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_nan_is_lowest() {
        assert_eq!(compare_f64(f64::NAN, f64::NEG_INFINITY), Ordering::Less);
        assert_eq!(compare_f64(f64::NAN, f64::NAN), Ordering::Equal);
        assert_eq!(compare_mixed(f64::NAN, i64::MIN), Ordering::Less);
        assert_eq!(compare_f64(-0.0, 0.0), Ordering::Equal);
    }

    #[test]
    fn test_compare_mixed_extremes() {
        assert_eq!(compare_mixed(TWO_TO_THE_63, i64::MAX), Ordering::Greater);
        assert_eq!(compare_mixed(-TWO_TO_THE_63, i64::MIN), Ordering::Equal);
        assert_eq!(compare_mixed(f64::NEG_INFINITY, i64::MIN), Ordering::Less);
        assert_eq!(compare_mixed(1.5, 1), Ordering::Greater);
        assert_eq!(compare_mixed(-1.5, -1), Ordering::Less);
        assert_eq!(compare_mixed(-0.0, 0), Ordering::Equal);
        // 2^53 + 1 is not representable as a double.
        assert_eq!(
            compare_mixed(9_007_199_254_740_992.0, 9_007_199_254_740_993),
            Ordering::Less
        );
    }

    #[test]
    fn test_split_i64() {
        assert_eq!(split_i64(5), (5.0, 0));
        assert_eq!(split_i64(i64::MAX), (TWO_TO_THE_63, -1));
        assert_eq!(split_i64(9_007_199_254_740_993).1.abs(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig { failure_persistence: None, ..ProptestConfig::default() })]

        #[test]
        fn test_sortable_bits_match_compare(a in any::<f64>(), b in any::<f64>()) {
            prop_assert_eq!(sortable_f64_bits(a).cmp(&sortable_f64_bits(b)), compare_f64(a, b));
        }

        #[test]
        fn test_compare_mixed_matches_exact(d in -1e19f64..1e19, i in any::<i64>()) {
            let expected = if d.is_finite() && d.fract() == 0.0 && d.abs() < TWO_TO_THE_63 {
                (d as i128).cmp(&i128::from(i))
            } else {
                compare_mixed(d, i)
            };
            prop_assert_eq!(compare_mixed(d, i), expected);
        }

        #[test]
        fn test_is_integral_round_trips(i in -(1i64 << 53)..(1i64 << 53)) {
            prop_assert_eq!(is_integral(i as f64), Some(i));
        }
    }
}

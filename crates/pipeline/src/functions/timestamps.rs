use std::str::FromStr;

use strum::EnumString;
use value::{
    FieldValue,
    Number,
    Timestamp,
};

use super::{
    flatten,
    strict,
};
use crate::EvaluateResult;

/// Units accepted by timestamp arithmetic, spelled in lower case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TimeUnit {
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    fn nanos(self) -> i128 {
        match self {
            TimeUnit::Microsecond => 1_000,
            TimeUnit::Millisecond => 1_000_000,
            TimeUnit::Second => 1_000_000_000,
            TimeUnit::Minute => 60 * 1_000_000_000,
            TimeUnit::Hour => 3_600 * 1_000_000_000,
            TimeUnit::Day => 86_400 * 1_000_000_000,
        }
    }
}

fn timestamp_result(nanos: i128) -> EvaluateResult {
    match Timestamp::from_nanos(nanos) {
        Some(ts) => EvaluateResult::Value(FieldValue::Timestamp(ts)),
        None => EvaluateResult::Error,
    }
}

fn integer(value: &FieldValue) -> Result<i64, EvaluateResult> {
    match value.as_number() {
        Some(Number::Int(n)) => Ok(n),
        _ => Err(EvaluateResult::Error),
    }
}

/// Whole units since the epoch, rounding toward negative infinity.
pub fn timestamp_to_unix(ts: &EvaluateResult, unit: TimeUnit) -> EvaluateResult {
    flatten((|| -> Result<EvaluateResult, EvaluateResult> {
        let [ts] = strict([ts])?;
        let FieldValue::Timestamp(ts) = ts else {
            return Err(EvaluateResult::Error);
        };
        let units = ts.to_nanos().div_euclid(unit.nanos());
        let units = i64::try_from(units).map_err(|_| EvaluateResult::Error)?;
        Ok(EvaluateResult::Value(FieldValue::Int64(units)))
    })())
}

/// The instant `n` units after the epoch. Results outside the valid
/// timestamp range are errors.
pub fn unix_to_timestamp(n: &EvaluateResult, unit: TimeUnit) -> EvaluateResult {
    flatten((|| -> Result<EvaluateResult, EvaluateResult> {
        let [n] = strict([n])?;
        let n = integer(n)?;
        Ok(timestamp_result(i128::from(n) * unit.nanos()))
    })())
}

fn shift(
    ts: &EvaluateResult,
    unit: &EvaluateResult,
    amount: &EvaluateResult,
    sign: i128,
) -> EvaluateResult {
    flatten((|| -> Result<EvaluateResult, EvaluateResult> {
        let [ts, unit, amount] = strict([ts, unit, amount])?;
        let FieldValue::Timestamp(ts) = ts else {
            return Err(EvaluateResult::Error);
        };
        let unit = unit
            .as_str()
            .and_then(|unit| TimeUnit::from_str(unit).ok())
            .ok_or(EvaluateResult::Error)?;
        let delta = i128::from(integer(amount)?) * unit.nanos() * sign;
        let total = ts.to_nanos().checked_add(delta).ok_or(EvaluateResult::Error)?;
        Ok(timestamp_result(total))
    })())
}

pub fn timestamp_add(
    ts: &EvaluateResult,
    unit: &EvaluateResult,
    amount: &EvaluateResult,
) -> EvaluateResult {
    shift(ts, unit, amount, 1)
}

pub fn timestamp_subtract(
    ts: &EvaluateResult,
    unit: &EvaluateResult,
    amount: &EvaluateResult,
) -> EvaluateResult {
    shift(ts, unit, amount, -1)
}

#[cfg(test)]
mod tests {
    use value::val;

    use super::*;

    fn v(value: FieldValue) -> EvaluateResult {
        EvaluateResult::Value(value)
    }

    fn ts(seconds: i64, nanos: i32) -> anyhow::Result<EvaluateResult> {
        Ok(v(FieldValue::Timestamp(Timestamp::new(seconds, nanos)?)))
    }

    #[test]
    fn test_timestamp_to_unix() -> anyhow::Result<()> {
        let t = ts(1, 500_000_000)?;
        assert_eq!(timestamp_to_unix(&t, TimeUnit::Second), v(val!(1)));
        assert_eq!(timestamp_to_unix(&t, TimeUnit::Millisecond), v(val!(1500)));
        assert_eq!(timestamp_to_unix(&t, TimeUnit::Microsecond), v(val!(1_500_000)));
        // Instants before the epoch round down.
        let t = ts(-2, 500_000_000)?;
        assert_eq!(timestamp_to_unix(&t, TimeUnit::Second), v(val!(-2)));
        assert_eq!(timestamp_to_unix(&v(val!(1)), TimeUnit::Second), EvaluateResult::Error);
        assert_eq!(
            timestamp_to_unix(&EvaluateResult::NULL, TimeUnit::Second),
            EvaluateResult::NULL
        );
        Ok(())
    }

    #[test]
    fn test_unix_to_timestamp() -> anyhow::Result<()> {
        assert_eq!(unix_to_timestamp(&v(val!(1500)), TimeUnit::Millisecond), ts(1, 500_000_000)?);
        assert_eq!(unix_to_timestamp(&v(val!(-1)), TimeUnit::Microsecond), ts(-1, 999_999_000)?);
        assert_eq!(
            unix_to_timestamp(&v(val!(i64::MAX)), TimeUnit::Second),
            EvaluateResult::Error
        );
        assert_eq!(
            unix_to_timestamp(&v(val!(1.0)), TimeUnit::Second),
            EvaluateResult::Error
        );
        Ok(())
    }

    #[test]
    fn test_timestamp_shift() -> anyhow::Result<()> {
        let t = ts(0, 0)?;
        assert_eq!(timestamp_add(&t, &v(val!("day")), &v(val!(1))), ts(86_400, 0)?);
        assert_eq!(timestamp_subtract(&t, &v(val!("minute")), &v(val!(1))), ts(-60, 0)?);
        assert_eq!(
            timestamp_add(&t, &v(val!("millisecond")), &v(val!(-1))),
            ts(-1, 999_000_000)?
        );
        assert_eq!(
            timestamp_add(&t, &v(val!("fortnight")), &v(val!(1))),
            EvaluateResult::Error
        );
        assert_eq!(
            timestamp_add(&t, &v(val!("day")), &v(val!(i64::MAX))),
            EvaluateResult::Error
        );
        assert_eq!(
            timestamp_add(&t, &v(val!("day")), &EvaluateResult::NULL),
            EvaluateResult::NULL
        );
        Ok(())
    }
}

use std::cmp::Ordering;

use errors::ErrorMetadata;

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// 0001-01-01T00:00:00Z
pub const MIN_VALID_SECONDS: i64 = -62_135_596_800;
/// 9999-12-31T23:59:59Z
pub const MAX_VALID_SECONDS: i64 = 253_402_300_799;

/// A point in time with nanosecond precision. `nanos` is always in
/// `0..1_000_000_000`; negative instants borrow from `seconds`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    /// Sorts below every timestamp a writer can produce.
    pub const MIN: Timestamp = Timestamp {
        seconds: i64::MIN,
        nanos: 0,
    };

    pub fn new(seconds: i64, nanos: i32) -> anyhow::Result<Self> {
        let ts = Self { seconds, nanos };
        anyhow::ensure!(
            ts.is_valid(),
            ErrorMetadata::bad_request(
                "InvalidTimestamp",
                format!(
                    "Timestamp ({seconds}, {nanos}) is outside 0001-01-01..9999-12-31 or has \
                     out-of-range nanoseconds"
                ),
            )
        );
        Ok(ts)
    }

    pub fn is_valid(&self) -> bool {
        (0..NANOS_PER_SECOND as i32).contains(&self.nanos)
            && (MIN_VALID_SECONDS..=MAX_VALID_SECONDS).contains(&self.seconds)
    }

    /// Total microseconds since the epoch, rounding toward negative infinity.
    pub fn to_micros(&self) -> i128 {
        i128::from(self.seconds) * 1_000_000 + i128::from(self.nanos / 1_000)
    }

    pub fn to_nanos(&self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos)
    }

    /// Inverse of [`Timestamp::to_nanos`]. Returns `None` when the result is
    /// outside the valid range.
    pub fn from_nanos(total: i128) -> Option<Self> {
        let per_second = i128::from(NANOS_PER_SECOND);
        let seconds = i64::try_from(total.div_euclid(per_second)).ok()?;
        let nanos = total.rem_euclid(per_second) as i32;
        let ts = Self { seconds, nanos };
        ts.is_valid().then_some(ts)
    }
}

/// A BSON timestamp: two unsigned 32-bit fields that sort as one 64-bit key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BsonTimestamp {
    pub seconds: u32,
    pub increment: u32,
}

impl BsonTimestamp {
    pub fn sort_key(&self) -> u64 {
        (u64::from(self.seconds) << 32) | u64::from(self.increment)
    }
}

impl Ord for BsonTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for BsonTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

//! Order-preserving index keys. For any two values `a` and `b`,
//! `a.compare(&b)` agrees with unsigned lexicographic comparison of their
//! ascending encodings, and is reversed for descending encodings.
//!
//! Layout:
//! 1) Every value starts with a type label. Labels follow [`TypeOrder`], so
//!    cross-type comparisons are decided by the first byte or two.
//! 2) Numbers are the sortable bits of the nearest double followed by the
//!    exact offset of an integer from that double. NaN has its own label and
//!    no payload.
//! 3) Variable-length payloads are escaped and terminated by a separator that
//!    sorts below any continuation, followed by a truncation marker.
//! 4) Arrays and maps are their elements in order followed by a marker.
//! 5) Every top-level value ends with an infinity sentinel.
//!
//! Payloads longer than [`TRUNCATION_THRESHOLD_BYTES`] are cut at that length
//! and followed by [`TRUNCATED`], which sorts above every label. Encoding
//! stops at the first truncation, so values that only differ past the cut
//! encode equal rather than out of order.
use bytes::BufMut;

use crate::{
    metrics::log_index_value_truncated,
    numeric::{
        sortable_f64_bits,
        split_i64,
        Number,
    },
    ordered_code::{
        write_escaped_bytes,
        write_infinity,
        write_signed,
    },
    FieldValue,
    TypeOrder,
};

const NULL_LABEL: i64 = 5;
const MIN_KEY_LABEL: i64 = 7;
const BOOLEAN_LABEL: i64 = 10;
const NAN_LABEL: i64 = 13;
const NUMBER_LABEL: i64 = 15;
const TIMESTAMP_LABEL: i64 = 20;
const BSON_TIMESTAMP_LABEL: i64 = 22;
const SERVER_TIMESTAMP_LABEL: i64 = 23;
const STRING_LABEL: i64 = 25;
const BLOB_LABEL: i64 = 30;
const BSON_BINARY_LABEL: i64 = 31;
const REFERENCE_LABEL: i64 = 37;
const BSON_OBJECT_ID_LABEL: i64 = 43;
const GEO_POINT_LABEL: i64 = 45;
const REGEX_LABEL: i64 = 47;
const ARRAY_LABEL: i64 = 50;
const VECTOR_LABEL: i64 = 53;
const MAP_LABEL: i64 = 55;
const REFERENCE_SEGMENT_LABEL: i64 = 60;
const MAX_KEY_LABEL: i64 = 999;

/// Follows a complete variable-length payload or container.
pub const NOT_TRUNCATED: i64 = 2;
/// Follows a payload cut at the threshold. Above every label, since the cut
/// value is longer than anything sharing its prefix.
pub const TRUNCATED: i64 = 1000;

/// Longest payload written in full.
pub const TRUNCATION_THRESHOLD_BYTES: usize = 1500;

/// Label for a rank. NaN shares the number rank but has its own label.
fn type_label(rank: TypeOrder) -> i64 {
    match rank {
        TypeOrder::Null => NULL_LABEL,
        TypeOrder::MinKey => MIN_KEY_LABEL,
        TypeOrder::Boolean => BOOLEAN_LABEL,
        TypeOrder::Number => NUMBER_LABEL,
        TypeOrder::Timestamp => TIMESTAMP_LABEL,
        TypeOrder::BsonTimestamp => BSON_TIMESTAMP_LABEL,
        TypeOrder::ServerTimestamp => SERVER_TIMESTAMP_LABEL,
        TypeOrder::String => STRING_LABEL,
        TypeOrder::Blob => BLOB_LABEL,
        TypeOrder::BsonBinary => BSON_BINARY_LABEL,
        TypeOrder::Reference => REFERENCE_LABEL,
        TypeOrder::BsonObjectId => BSON_OBJECT_ID_LABEL,
        TypeOrder::GeoPoint => GEO_POINT_LABEL,
        TypeOrder::Regex => REGEX_LABEL,
        TypeOrder::Array => ARRAY_LABEL,
        TypeOrder::Vector => VECTOR_LABEL,
        TypeOrder::Map => MAP_LABEL,
        TypeOrder::MaxKey => MAX_KEY_LABEL,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexDirection {
    Ascending,
    Descending,
}

/// Sink for index key bytes. Implementations decide how direction is applied;
/// callers always describe the ascending form.
pub trait DirectionalIndexByteEncoder {
    /// Escaped bytes followed by a separator.
    fn write_bytes(&mut self, bytes: &[u8]);
    fn write_string(&mut self, s: &str) {
        self.write_bytes(s.as_bytes())
    }
    /// Variable-length signed integer.
    fn write_signed(&mut self, n: i64);
    /// Fixed-width big-endian integers.
    fn write_u64(&mut self, n: u64);
    fn write_u16(&mut self, n: u16);
    fn write_infinity(&mut self);
}

/// Accumulates an index key, complementing every byte for descending keys.
pub struct IndexByteEncoder {
    direction: IndexDirection,
    buffer: Vec<u8>,
    scratch: Vec<u8>,
}

impl IndexByteEncoder {
    pub fn new(direction: IndexDirection) -> Self {
        Self {
            direction,
            buffer: vec![],
            scratch: vec![],
        }
    }

    pub fn direction(&self) -> IndexDirection {
        self.direction
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn flush_scratch(&mut self) {
        match self.direction {
            IndexDirection::Ascending => self.buffer.extend_from_slice(&self.scratch),
            IndexDirection::Descending => self.buffer.extend(self.scratch.iter().map(|b| !b)),
        }
        self.scratch.clear();
    }
}

impl DirectionalIndexByteEncoder for IndexByteEncoder {
    fn write_bytes(&mut self, bytes: &[u8]) {
        write_escaped_bytes(bytes, &mut self.scratch);
        self.flush_scratch();
    }

    fn write_signed(&mut self, n: i64) {
        write_signed(n, &mut self.scratch);
        self.flush_scratch();
    }

    fn write_u64(&mut self, n: u64) {
        self.scratch.put_u64(n);
        self.flush_scratch();
    }

    fn write_u16(&mut self, n: u16) {
        self.scratch.put_u16(n);
        self.flush_scratch();
    }

    fn write_infinity(&mut self) {
        write_infinity(&mut self.scratch);
        self.flush_scratch();
    }
}

/// Encode a single value as a complete index key.
pub fn encode_index_value(value: &FieldValue, direction: IndexDirection) -> Vec<u8> {
    let mut encoder = IndexByteEncoder::new(direction);
    write_index_value(value, &mut encoder);
    encoder.into_bytes()
}

/// Append the encoding of `value` and the trailing infinity sentinel.
pub fn write_index_value(value: &FieldValue, encoder: &mut impl DirectionalIndexByteEncoder) {
    let _ = write_value(value, encoder);
    encoder.write_infinity();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Truncation {
    Complete,
    Truncated,
}

fn write_label(rank: TypeOrder, encoder: &mut impl DirectionalIndexByteEncoder) {
    encoder.write_signed(type_label(rank));
}

/// Writes `bytes`, cut at the threshold. A cut payload is followed by
/// `TRUNCATED`; a complete one is left for the caller to terminate.
fn write_truncatable(bytes: &[u8], encoder: &mut impl DirectionalIndexByteEncoder) -> Truncation {
    if bytes.len() <= TRUNCATION_THRESHOLD_BYTES {
        encoder.write_bytes(bytes);
        return Truncation::Complete;
    }
    tracing::debug!(
        "Truncating {} byte index payload to {TRUNCATION_THRESHOLD_BYTES} bytes",
        bytes.len()
    );
    log_index_value_truncated();
    encoder.write_bytes(&bytes[..TRUNCATION_THRESHOLD_BYTES]);
    encoder.write_signed(TRUNCATED);
    Truncation::Truncated
}

/// A payload that must be followed by `NOT_TRUNCATED` when complete.
fn write_terminated(bytes: &[u8], encoder: &mut impl DirectionalIndexByteEncoder) -> Truncation {
    let truncation = write_truncatable(bytes, encoder);
    if truncation == Truncation::Complete {
        encoder.write_signed(NOT_TRUNCATED);
    }
    truncation
}

fn write_f64(n: f64, encoder: &mut impl DirectionalIndexByteEncoder) {
    if n.is_nan() {
        encoder.write_signed(NAN_LABEL);
        return;
    }
    encoder.write_signed(NUMBER_LABEL);
    encoder.write_u64(sortable_f64_bits(n));
    encoder.write_u16(residual_key(0));
}

/// Offsets are biased so negative ones sort below zero.
fn residual_key(residual: i16) -> u16 {
    (residual as u16) ^ 0x8000
}

fn write_number(n: Number, encoder: &mut impl DirectionalIndexByteEncoder) {
    match n {
        Number::Double(d) => write_f64(d, encoder),
        Number::Int(i) => {
            let (nearest, residual) = split_i64(i);
            encoder.write_signed(NUMBER_LABEL);
            encoder.write_u64(sortable_f64_bits(nearest));
            encoder.write_u16(residual_key(residual));
        },
    }
}

fn write_value(value: &FieldValue, encoder: &mut impl DirectionalIndexByteEncoder) -> Truncation {
    let rank = value.type_order();
    match value {
        FieldValue::Null | FieldValue::MinKey | FieldValue::MaxKey => {
            write_label(rank, encoder);
            Truncation::Complete
        },
        FieldValue::Boolean(b) => {
            write_label(rank, encoder);
            encoder.write_signed(i64::from(*b));
            Truncation::Complete
        },
        FieldValue::Int64(i) => {
            write_number(Number::Int(*i), encoder);
            Truncation::Complete
        },
        FieldValue::Int32(i) => {
            write_number(Number::Int(i64::from(*i)), encoder);
            Truncation::Complete
        },
        FieldValue::Float64(f) => {
            write_f64(*f, encoder);
            Truncation::Complete
        },
        FieldValue::Decimal128(d) => {
            write_f64(d.to_f64(), encoder);
            Truncation::Complete
        },
        FieldValue::Timestamp(ts) => {
            write_label(rank, encoder);
            encoder.write_signed(ts.seconds);
            encoder.write_signed(i64::from(ts.nanos));
            Truncation::Complete
        },
        FieldValue::BsonTimestamp(ts) => {
            write_label(rank, encoder);
            encoder.write_u64(ts.sort_key());
            Truncation::Complete
        },
        FieldValue::ServerTimestamp(st) => {
            write_label(rank, encoder);
            encoder.write_signed(st.local_write_time.seconds);
            encoder.write_signed(i64::from(st.local_write_time.nanos));
            Truncation::Complete
        },
        FieldValue::String(s) => {
            write_label(rank, encoder);
            write_terminated(s.as_bytes(), encoder)
        },
        FieldValue::Bytes(b) => {
            write_label(rank, encoder);
            write_terminated(b, encoder)
        },
        FieldValue::BsonBinary(b) => {
            write_label(rank, encoder);
            write_terminated(&b.to_bytes(), encoder)
        },
        FieldValue::BsonObjectId(oid) => {
            write_label(rank, encoder);
            write_terminated(oid.0.as_bytes(), encoder)
        },
        FieldValue::Regex(r) => {
            write_label(rank, encoder);
            if write_truncatable(r.pattern.as_bytes(), encoder) == Truncation::Truncated {
                return Truncation::Truncated;
            }
            write_terminated(r.options.as_bytes(), encoder)
        },
        FieldValue::Reference(r) => {
            write_label(rank, encoder);
            for segment in r.sort_segments() {
                encoder.write_signed(REFERENCE_SEGMENT_LABEL);
                if write_truncatable(segment.as_bytes(), encoder) == Truncation::Truncated {
                    return Truncation::Truncated;
                }
            }
            encoder.write_signed(NOT_TRUNCATED);
            Truncation::Complete
        },
        FieldValue::GeoPoint(g) => {
            write_label(rank, encoder);
            encoder.write_u64(sortable_f64_bits(g.latitude));
            encoder.write_u64(sortable_f64_bits(g.longitude));
            Truncation::Complete
        },
        FieldValue::Array(elements) => {
            write_label(rank, encoder);
            for element in elements {
                if write_value(element, encoder) == Truncation::Truncated {
                    return Truncation::Truncated;
                }
            }
            encoder.write_signed(NOT_TRUNCATED);
            Truncation::Complete
        },
        FieldValue::Vector(v) => {
            write_label(rank, encoder);
            // Dimension first: vectors order by length before contents.
            encoder.write_signed(NUMBER_LABEL);
            encoder.write_signed(v.len() as i64);
            encoder.write_signed(STRING_LABEL);
            encoder.write_string(crate::representation::VECTOR_VALUE_KEY);
            encoder.write_signed(ARRAY_LABEL);
            for f in v.values() {
                write_f64(*f, encoder);
            }
            encoder.write_signed(NOT_TRUNCATED);
            Truncation::Complete
        },
        FieldValue::Map(map) => {
            write_label(rank, encoder);
            for (key, value) in map {
                encoder.write_signed(STRING_LABEL);
                if write_truncatable(key.as_bytes(), encoder) == Truncation::Truncated {
                    return Truncation::Truncated;
                }
                if write_value(value, encoder) == Truncation::Truncated {
                    return Truncation::Truncated;
                }
            }
            encoder.write_signed(NOT_TRUNCATED);
            Truncation::Complete
        },
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;
    use crate::{
        val,
        FieldValue,
    };

    fn asc(value: &FieldValue) -> Vec<u8> {
        encode_index_value(value, IndexDirection::Ascending)
    }

    fn desc(value: &FieldValue) -> Vec<u8> {
        encode_index_value(value, IndexDirection::Descending)
    }

    #[test]
    fn test_cross_type_order() {
        assert!(asc(&val!(1)) < asc(&val!("x")));
        assert!(asc(&val!("x")) < asc(&val!([1])));
        assert!(asc(&val!([1])) < asc(&val!({})));
        assert!(desc(&val!(1)) > desc(&val!("x")));
    }

    #[test]
    fn test_labels_follow_rank() {
        let labels: Vec<i64> = TypeOrder::ALL.iter().map(|r| type_label(*r)).collect();
        assert!(labels.windows(2).all(|w| w[0] < w[1]));
        assert!(labels.iter().all(|l| NOT_TRUNCATED < *l && *l < TRUNCATED));
        assert!(NAN_LABEL > BOOLEAN_LABEL && NAN_LABEL < NUMBER_LABEL);
    }

    #[test]
    fn test_number_widths_encode_equal() {
        assert_eq!(asc(&val!(1)), asc(&val!(1.0)));
        assert_eq!(asc(&val!(1)), asc(&FieldValue::Int32(1)));
        assert_eq!(asc(&val!(0.0)), asc(&val!(-0.0)));
        assert_eq!(asc(&val!(f64::NAN)), asc(&val!(-f64::NAN)));
        assert!(asc(&val!(f64::NAN)) < asc(&val!(f64::NEG_INFINITY)));
        assert!(asc(&val!(i64::MAX - 1)) < asc(&val!(i64::MAX)));
        assert!(asc(&val!(i64::MAX)) < asc(&val!(9_223_372_036_854_775_808.0)));
    }

    #[test]
    fn test_ends_with_infinity() {
        assert_eq!(asc(&val!(null)), vec![0x85, 0xff, 0xff]);
        assert_eq!(desc(&val!(null)), vec![0x7a, 0x00, 0x00]);
    }

    #[test]
    fn test_truncation_preserves_order() {
        cmd_util::env::config_test();
        let prefix = "a".repeat(TRUNCATION_THRESHOLD_BYTES);
        let exact = val!(prefix.clone());
        let longer = val!(format!("{prefix}b"));
        let longest = val!(format!("{prefix}c"));
        assert!(asc(&exact) < asc(&longer));
        // Past the cut the two are indistinguishable.
        assert_eq!(asc(&longer), asc(&longest));
        // Later elements never reorder values that tie at the cut.
        assert_eq!(
            asc(&FieldValue::Array(vec![longest.clone(), val!(1)])),
            asc(&FieldValue::Array(vec![longer.clone(), val!(2)]))
        );
        assert!(
            asc(&FieldValue::Array(vec![exact.clone(), val!(9)]))
                < asc(&FieldValue::Array(vec![longer.clone()]))
        );
        let long_key = FieldValue::from_fields([(format!("{prefix}k"), val!(1))]);
        let exact_key = FieldValue::from_fields([(prefix.clone(), FieldValue::MaxKey)]);
        assert_eq!(exact_key.compare(&long_key), Ordering::Less);
        assert!(asc(&exact_key) < asc(&long_key));
    }
}

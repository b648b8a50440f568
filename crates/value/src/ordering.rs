//! The total order and the (stricter) equality over field values.
//!
//! `compare` puts every numeric width on one line, so `1 == 1.0` and
//! `0.0 == -0.0` there. `PartialEq` is the equality used for membership and
//! structural identity: it additionally distinguishes numeric widths and
//! signed zeros, while treating NaN as equal to itself.
use std::{
    cmp::Ordering,
    hash::{
        Hash,
        Hasher,
    },
};

use crate::{
    FieldValue,
    MapValue,
};

/// Type ranks, lowest to highest. The index encoder derives its type labels
/// from this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeOrder {
    Null,
    MinKey,
    Boolean,
    Number,
    Timestamp,
    BsonTimestamp,
    ServerTimestamp,
    String,
    Blob,
    BsonBinary,
    Reference,
    BsonObjectId,
    GeoPoint,
    Regex,
    Array,
    Vector,
    Map,
    MaxKey,
}

impl TypeOrder {
    pub const ALL: [TypeOrder; 18] = [
        TypeOrder::Null,
        TypeOrder::MinKey,
        TypeOrder::Boolean,
        TypeOrder::Number,
        TypeOrder::Timestamp,
        TypeOrder::BsonTimestamp,
        TypeOrder::ServerTimestamp,
        TypeOrder::String,
        TypeOrder::Blob,
        TypeOrder::BsonBinary,
        TypeOrder::Reference,
        TypeOrder::BsonObjectId,
        TypeOrder::GeoPoint,
        TypeOrder::Regex,
        TypeOrder::Array,
        TypeOrder::Vector,
        TypeOrder::Map,
        TypeOrder::MaxKey,
    ];

    /// The next rank up, or `None` for the highest.
    pub fn next(self) -> Option<TypeOrder> {
        let i = Self::ALL.iter().position(|t| *t == self)?;
        Self::ALL.get(i + 1).copied()
    }
}

impl FieldValue {
    pub fn type_order(&self) -> TypeOrder {
        match self {
            FieldValue::Null => TypeOrder::Null,
            FieldValue::MinKey => TypeOrder::MinKey,
            FieldValue::Boolean(_) => TypeOrder::Boolean,
            FieldValue::Int64(_)
            | FieldValue::Float64(_)
            | FieldValue::Int32(_)
            | FieldValue::Decimal128(_) => TypeOrder::Number,
            FieldValue::Timestamp(_) => TypeOrder::Timestamp,
            FieldValue::BsonTimestamp(_) => TypeOrder::BsonTimestamp,
            FieldValue::ServerTimestamp(_) => TypeOrder::ServerTimestamp,
            FieldValue::String(_) => TypeOrder::String,
            FieldValue::Bytes(_) => TypeOrder::Blob,
            FieldValue::BsonBinary(_) => TypeOrder::BsonBinary,
            FieldValue::Reference(_) => TypeOrder::Reference,
            FieldValue::BsonObjectId(_) => TypeOrder::BsonObjectId,
            FieldValue::GeoPoint(_) => TypeOrder::GeoPoint,
            FieldValue::Regex(_) => TypeOrder::Regex,
            FieldValue::Array(_) => TypeOrder::Array,
            FieldValue::Vector(_) => TypeOrder::Vector,
            FieldValue::Map(_) => TypeOrder::Map,
            FieldValue::MaxKey => TypeOrder::MaxKey,
        }
    }

    /// Total order used for sorting, range comparisons and index keys.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        if let (Some(l), Some(r)) = (self.as_number(), other.as_number()) {
            return l.compare(r);
        }
        match (self, other) {
            (FieldValue::Null, FieldValue::Null)
            | (FieldValue::MinKey, FieldValue::MinKey)
            | (FieldValue::MaxKey, FieldValue::MaxKey) => Ordering::Equal,
            (FieldValue::Boolean(l), FieldValue::Boolean(r)) => l.cmp(r),
            (FieldValue::Timestamp(l), FieldValue::Timestamp(r)) => l.cmp(r),
            (FieldValue::BsonTimestamp(l), FieldValue::BsonTimestamp(r)) => l.cmp(r),
            (FieldValue::ServerTimestamp(l), FieldValue::ServerTimestamp(r)) => {
                l.local_write_time.cmp(&r.local_write_time)
            },
            // `str` ordering is byte-wise over UTF-8, which is code point order.
            (FieldValue::String(l), FieldValue::String(r)) => l.cmp(r),
            (FieldValue::Bytes(l), FieldValue::Bytes(r)) => l.cmp(r),
            (FieldValue::BsonBinary(l), FieldValue::BsonBinary(r)) => l.cmp(r),
            (FieldValue::Reference(l), FieldValue::Reference(r)) => l.cmp(r),
            (FieldValue::BsonObjectId(l), FieldValue::BsonObjectId(r)) => l.cmp(r),
            (FieldValue::GeoPoint(l), FieldValue::GeoPoint(r)) => l.compare(r),
            (FieldValue::Regex(l), FieldValue::Regex(r)) => l.cmp(r),
            (FieldValue::Array(l), FieldValue::Array(r)) => compare_arrays(l, r),
            (FieldValue::Vector(l), FieldValue::Vector(r)) => l.compare(r),
            (FieldValue::Map(l), FieldValue::Map(r)) => compare_maps(l, r),
            // Every pair of numbers returned above, so the ranks differ here.
            (l, r) => l.type_order().cmp(&r.type_order()),
        }
    }

    /// Stricter than `compare(..) == Equal`: see the module docs.
    pub fn equals(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Int64(l), FieldValue::Int64(r)) => l == r,
            (FieldValue::Int32(l), FieldValue::Int32(r)) => l == r,
            (FieldValue::Float64(l), FieldValue::Float64(r)) => {
                canonical_bits(*l) == canonical_bits(*r)
            },
            // By value, but the sign of zero still counts.
            (FieldValue::Decimal128(l), FieldValue::Decimal128(r)) => {
                canonical_bits(l.to_f64()) == canonical_bits(r.to_f64())
            },
            (FieldValue::GeoPoint(l), FieldValue::GeoPoint(r)) => {
                canonical_bits(l.latitude) == canonical_bits(r.latitude)
                    && canonical_bits(l.longitude) == canonical_bits(r.longitude)
            },
            (FieldValue::Array(l), FieldValue::Array(r)) => {
                l.len() == r.len() && l.iter().zip(r).all(|(l, r)| l.equals(r))
            },
            (FieldValue::Map(l), FieldValue::Map(r)) => {
                l.len() == r.len()
                    && l.iter().all(|(k, v)| r.get(k).is_some_and(|other| v.equals(other)))
            },
            (FieldValue::Vector(l), FieldValue::Vector(r)) => {
                l.len() == r.len()
                    && l
                        .values()
                        .iter()
                        .zip(r.values())
                        .all(|(l, r)| canonical_bits(*l) == canonical_bits(*r))
            },
            (
                FieldValue::Int64(_)
                | FieldValue::Int32(_)
                | FieldValue::Float64(_)
                | FieldValue::Decimal128(_),
                _,
            ) => false,
            (l, r) => l.type_order() == r.type_order() && l.compare(r).is_eq(),
        }
    }

    pub fn max_value<'a>(&'a self, other: &'a FieldValue) -> &'a FieldValue {
        if self.compare(other).is_ge() {
            self
        } else {
            other
        }
    }

    pub fn min_value<'a>(&'a self, other: &'a FieldValue) -> &'a FieldValue {
        if self.compare(other).is_le() {
            self
        } else {
            other
        }
    }
}

fn compare_arrays(left: &[FieldValue], right: &[FieldValue]) -> Ordering {
    for (l, r) in left.iter().zip(right) {
        let cmp = l.compare(r);
        if cmp.is_ne() {
            return cmp;
        }
    }
    left.len().cmp(&right.len())
}

fn compare_maps(left: &MapValue, right: &MapValue) -> Ordering {
    for ((lk, lv), (rk, rv)) in left.iter().zip(right.iter()) {
        let cmp = lk.cmp(rk).then_with(|| lv.compare(rv));
        if cmp.is_ne() {
            return cmp;
        }
    }
    left.len().cmp(&right.len())
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for FieldValue {}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Null | FieldValue::MinKey | FieldValue::MaxKey => (),
            FieldValue::Boolean(b) => b.hash(state),
            FieldValue::Int64(i) => i.hash(state),
            FieldValue::Int32(i) => i.hash(state),
            FieldValue::Float64(f) => canonical_bits(*f).hash(state),
            FieldValue::Decimal128(d) => canonical_bits(d.to_f64()).hash(state),
            FieldValue::Timestamp(t) => t.hash(state),
            FieldValue::BsonTimestamp(t) => t.hash(state),
            FieldValue::ServerTimestamp(s) => s.local_write_time.hash(state),
            FieldValue::String(s) => s.hash(state),
            FieldValue::Bytes(b) => b.hash(state),
            FieldValue::BsonBinary(b) => b.hash(state),
            FieldValue::Reference(r) => r.hash(state),
            FieldValue::BsonObjectId(o) => o.hash(state),
            FieldValue::GeoPoint(g) => {
                canonical_bits(g.latitude).hash(state);
                canonical_bits(g.longitude).hash(state);
            },
            FieldValue::Regex(r) => r.hash(state),
            FieldValue::Array(a) => a.hash(state),
            FieldValue::Vector(v) => {
                v.len().hash(state);
                for f in v.values() {
                    canonical_bits(*f).hash(state);
                }
            },
            FieldValue::Map(m) => {
                m.len().hash(state);
                for (k, v) in m {
                    k.hash(state);
                    v.hash(state);
                }
            },
        }
    }
}

/// Bit pattern of a double with every NaN collapsed to one.
fn canonical_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

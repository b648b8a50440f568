//! The typed value model shared by query evaluation and index encoding: a
//! closed sum type over every supported field type, its total order and
//! equality, range bounds, canonical ids and the order-preserving index
//! encoding.

mod bounds;
mod bson;
mod canonical;
mod decimal;
pub mod document;
mod field_path;
mod geo_point;
pub mod index_encoding;
mod macros;
mod map;
mod metrics;
pub mod numeric;
mod ordered_code;
mod ordering;
mod path;
mod representation;
mod timestamp;
mod vector;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
#[cfg(test)]
mod tests;

use std::{
    collections::BTreeMap,
    fmt,
};

pub use crate::{
    bounds::{
        lower_bound,
        upper_bound,
    },
    bson::{
        BsonBinaryData,
        BsonObjectId,
        RegexValue,
    },
    decimal::Decimal128,
    document::Document,
    field_path::{
        FieldPath,
        KEY_FIELD_NAME,
    },
    geo_point::GeoPoint,
    index_encoding::{
        encode_index_value,
        write_index_value,
        DirectionalIndexByteEncoder,
        IndexByteEncoder,
        IndexDirection,
    },
    map::MapValue,
    numeric::Number,
    ordering::TypeOrder,
    path::{
        DatabaseId,
        DocumentKey,
        Reference,
        ResourcePath,
        DEFAULT_DATABASE_ID,
    },
    timestamp::{
        BsonTimestamp,
        Timestamp,
    },
    vector::VectorValue,
};

/// A field value. Values are immutable once built; every operation matches
/// exhaustively on the variant.
#[derive(Clone, Debug)]
pub enum FieldValue {
    Null,
    MinKey,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    Int32(i32),
    Decimal128(Decimal128),
    Timestamp(Timestamp),
    BsonTimestamp(BsonTimestamp),
    ServerTimestamp(ServerTimestamp),
    String(String),
    Bytes(Vec<u8>),
    BsonBinary(BsonBinaryData),
    Reference(Reference),
    BsonObjectId(BsonObjectId),
    GeoPoint(GeoPoint),
    Regex(RegexValue),
    Array(Vec<FieldValue>),
    Vector(VectorValue),
    Map(MapValue),
    MaxKey,
}

pub const NULL_VALUE: FieldValue = FieldValue::Null;
pub const NAN_VALUE: FieldValue = FieldValue::Float64(f64::NAN);
pub const TRUE_VALUE: FieldValue = FieldValue::Boolean(true);
pub const FALSE_VALUE: FieldValue = FieldValue::Boolean(false);
pub const MIN_KEY_VALUE: FieldValue = FieldValue::MinKey;
pub const MAX_KEY_VALUE: FieldValue = FieldValue::MaxKey;

/// A value written with a server-assigned timestamp that has not yet been
/// acknowledged. It sorts by the local write time; the value it replaced is
/// kept for display purposes only.
#[derive(Clone, Debug)]
pub struct ServerTimestamp {
    pub local_write_time: Timestamp,
    pub previous_value: Option<Box<FieldValue>>,
}

impl ServerTimestamp {
    pub fn new(local_write_time: Timestamp, previous_value: Option<FieldValue>) -> Self {
        Self {
            local_write_time,
            previous_value: previous_value.map(Box::new),
        }
    }
}

impl FieldValue {
    /// Build a map value, detecting reserved marker keys that disguise
    /// vectors, server timestamps and BSON types.
    pub fn from_map(fields: BTreeMap<String, FieldValue>) -> FieldValue {
        representation::detect(fields)
    }

    pub fn from_fields<K: Into<String>>(fields: impl IntoIterator<Item = (K, FieldValue)>) -> Self {
        Self::from_map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::MinKey => "minKey",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Int64(_) => "int64",
            FieldValue::Float64(_) => "float64",
            FieldValue::Int32(_) => "int32",
            FieldValue::Decimal128(_) => "decimal128",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::BsonTimestamp(_) => "bsonTimestamp",
            FieldValue::ServerTimestamp(_) => "serverTimestamp",
            FieldValue::String(_) => "string",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::BsonBinary(_) => "bsonBinaryData",
            FieldValue::Reference(_) => "reference",
            FieldValue::BsonObjectId(_) => "bsonObjectId",
            FieldValue::GeoPoint(_) => "geoPoint",
            FieldValue::Regex(_) => "regex",
            FieldValue::Array(_) => "array",
            FieldValue::Vector(_) => "vector",
            FieldValue::Map(_) => "map",
            FieldValue::MaxKey => "maxKey",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// True for NaN of any floating width.
    pub fn is_nan(&self) -> bool {
        match self {
            FieldValue::Float64(f) => f.is_nan(),
            FieldValue::Decimal128(d) => d.to_f64().is_nan(),
            _ => false,
        }
    }

    /// The numeric view of any numeric width, or `None` for other types.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            FieldValue::Int64(i) => Some(Number::Int(*i)),
            FieldValue::Int32(i) => Some(Number::Int(i64::from(*i))),
            FieldValue::Float64(f) => Some(Number::Double(*f)),
            FieldValue::Decimal128(d) => Some(Number::Double(d.to_f64())),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Number> for FieldValue {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => FieldValue::Int64(i),
            Number::Double(d) => FieldValue::Float64(d),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int64(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float64(f)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_owned())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(b: Vec<u8>) -> Self {
        FieldValue::Bytes(b)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(a: Vec<FieldValue>) -> Self {
        FieldValue::Array(a)
    }
}

impl From<MapValue> for FieldValue {
    fn from(m: MapValue) -> Self {
        FieldValue::from_map(m.into_inner())
    }
}

impl From<Timestamp> for FieldValue {
    fn from(t: Timestamp) -> Self {
        FieldValue::Timestamp(t)
    }
}

impl From<GeoPoint> for FieldValue {
    fn from(g: GeoPoint) -> Self {
        FieldValue::GeoPoint(g)
    }
}

impl From<Reference> for FieldValue {
    fn from(r: Reference) -> Self {
        FieldValue::Reference(r)
    }
}

impl From<VectorValue> for FieldValue {
    fn from(v: VectorValue) -> Self {
        FieldValue::Vector(v)
    }
}

impl From<RegexValue> for FieldValue {
    fn from(r: RegexValue) -> Self {
        FieldValue::Regex(r)
    }
}

impl From<BsonObjectId> for FieldValue {
    fn from(o: BsonObjectId) -> Self {
        FieldValue::BsonObjectId(o)
    }
}

impl From<BsonBinaryData> for FieldValue {
    fn from(b: BsonBinaryData) -> Self {
        FieldValue::BsonBinary(b)
    }
}

impl From<BsonTimestamp> for FieldValue {
    fn from(t: BsonTimestamp) -> Self {
        FieldValue::BsonTimestamp(t)
    }
}

impl From<Decimal128> for FieldValue {
    fn from(d: Decimal128) -> Self {
        FieldValue::Decimal128(d)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_id())
    }
}

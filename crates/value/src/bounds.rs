//! The least value of each rank. Range scans over a single rank use
//! `[lower_bound(rank), upper_bound(rank))`.
use crate::{
    BsonBinaryData,
    BsonObjectId,
    BsonTimestamp,
    FieldValue,
    GeoPoint,
    MapValue,
    Reference,
    RegexValue,
    ServerTimestamp,
    Timestamp,
    TypeOrder,
    VectorValue,
};

pub fn lower_bound(rank: TypeOrder) -> FieldValue {
    match rank {
        TypeOrder::Null => FieldValue::Null,
        TypeOrder::MinKey => FieldValue::MinKey,
        TypeOrder::Boolean => FieldValue::Boolean(false),
        TypeOrder::Number => FieldValue::Float64(f64::NAN),
        TypeOrder::Timestamp => FieldValue::Timestamp(Timestamp::MIN),
        TypeOrder::BsonTimestamp => FieldValue::BsonTimestamp(BsonTimestamp {
            seconds: 0,
            increment: 0,
        }),
        TypeOrder::ServerTimestamp => {
            FieldValue::ServerTimestamp(ServerTimestamp::new(Timestamp::MIN, None))
        },
        TypeOrder::String => FieldValue::String(String::new()),
        TypeOrder::Blob => FieldValue::Bytes(vec![]),
        TypeOrder::BsonBinary => FieldValue::BsonBinary(BsonBinaryData {
            subtype: 0,
            data: vec![],
        }),
        TypeOrder::Reference => FieldValue::Reference(Reference::empty()),
        TypeOrder::BsonObjectId => FieldValue::BsonObjectId(BsonObjectId(String::new())),
        TypeOrder::GeoPoint => FieldValue::GeoPoint(GeoPoint::MIN),
        TypeOrder::Regex => FieldValue::Regex(RegexValue::new("", "")),
        TypeOrder::Array => FieldValue::Array(vec![]),
        TypeOrder::Vector => FieldValue::Vector(VectorValue::default()),
        TypeOrder::Map => FieldValue::Map(MapValue::default()),
        TypeOrder::MaxKey => FieldValue::MaxKey,
    }
}

/// The exclusive upper bound of `rank`: the least value of the next rank.
/// Max-key is its own bound since nothing sorts above it.
pub fn upper_bound(rank: TypeOrder) -> FieldValue {
    match rank.next() {
        Some(next) => lower_bound(next),
        None => FieldValue::MaxKey,
    }
}

impl FieldValue {
    pub fn lower_bound(&self) -> FieldValue {
        lower_bound(self.type_order())
    }

    pub fn upper_bound(&self) -> FieldValue {
        upper_bound(self.type_order())
    }
}

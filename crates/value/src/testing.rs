//! Proptest strategies for field values, biased toward the edges of the
//! ordering: mixed numeric widths, signed zeros, NaN, escaped bytes and
//! characters outside the basic multilingual plane.
use proptest::prelude::*;

use crate::{
    BsonBinaryData,
    BsonObjectId,
    BsonTimestamp,
    DatabaseId,
    Decimal128,
    DocumentKey,
    FieldValue,
    GeoPoint,
    Reference,
    RegexValue,
    ResourcePath,
    ServerTimestamp,
    Timestamp,
    VectorValue,
};

impl Arbitrary for FieldValue {
    type Parameters = ();
    type Strategy = BoxedStrategy<FieldValue>;

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        field_value_strategy().boxed()
    }
}

pub fn string_strategy() -> impl Strategy<Value = String> {
    "[ab\\x00\\x{7f}\\x{ff}\\x{fffd}\\x{1f600}]{0,3}"
}

pub fn bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![0u8, 1, 0x7f, 0xfe, 0xff]), 0..4)
}

pub fn double_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>(),
        (-3i64..3).prop_map(|i| i as f64),
        Just(-0.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(9_223_372_036_854_775_808.0),
        Just(0.5),
    ]
}

pub fn number_strategy() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<i64>().prop_map(FieldValue::Int64),
        (-3i64..3).prop_map(FieldValue::Int64),
        prop::sample::select(vec![
            i64::MIN,
            i64::MAX,
            i64::MAX - 1,
            1 << 53,
            (1 << 53) + 1
        ])
        .prop_map(FieldValue::Int64),
        double_strategy().prop_map(FieldValue::Float64),
        (-3i32..3).prop_map(FieldValue::Int32),
        prop::sample::select(vec!["0", "-0", "1", "0.5", "NaN", "-Infinity", "1e3"]).prop_map(
            |repr| {
                FieldValue::Decimal128(Decimal128::new(repr).expect("valid decimal literal"))
            }
        ),
    ]
}

fn timestamp_strategy() -> impl Strategy<Value = Timestamp> {
    (-2i64..2, 0i32..2).prop_map(|(seconds, nanos)| Timestamp { seconds, nanos })
}

fn reference_strategy() -> impl Strategy<Value = Reference> {
    (
        prop::sample::select(vec!["p1", "p2"]),
        prop::sample::select(vec!["(default)", "d"]),
        prop::collection::vec(("[ab]{1,2}", "[ab]{1,2}"), 0..3),
    )
        .prop_map(|(project, database, pairs)| {
            let segments = pairs.into_iter().flat_map(|(c, d)| [c, d]).collect();
            let path = ResourcePath::new(segments).expect("segments are non-empty");
            let key = DocumentKey::new(path).expect("path has an even length");
            Reference::new(DatabaseId::new(project, database), key)
        })
}

pub fn scalar_strategy() -> impl Strategy<Value = FieldValue> {
    let coordinate = || prop::sample::select(vec![-90.0, -1.5, -0.0, 0.0, 1.5, 90.0]);
    prop_oneof![
        Just(FieldValue::Null),
        Just(FieldValue::MinKey),
        Just(FieldValue::MaxKey),
        any::<bool>().prop_map(FieldValue::Boolean),
        number_strategy(),
        timestamp_strategy().prop_map(FieldValue::Timestamp),
        (0u32..3, 0u32..3).prop_map(|(seconds, increment)| {
            FieldValue::BsonTimestamp(BsonTimestamp { seconds, increment })
        }),
        (timestamp_strategy(), prop::option::of(-2i64..2)).prop_map(|(ts, previous)| {
            FieldValue::ServerTimestamp(ServerTimestamp::new(
                ts,
                previous.map(FieldValue::Int64),
            ))
        }),
        string_strategy().prop_map(FieldValue::String),
        bytes_strategy().prop_map(FieldValue::Bytes),
        (0u8..3, bytes_strategy())
            .prop_map(|(subtype, data)| FieldValue::BsonBinary(BsonBinaryData { subtype, data })),
        reference_strategy().prop_map(FieldValue::Reference),
        string_strategy().prop_map(|s| FieldValue::BsonObjectId(BsonObjectId(s))),
        (coordinate(), coordinate()).prop_map(|(latitude, longitude)| {
            FieldValue::GeoPoint(GeoPoint {
                latitude,
                longitude,
            })
        }),
        (string_strategy(), "[im]{0,2}")
            .prop_map(|(pattern, options)| FieldValue::Regex(RegexValue::new(pattern, options))),
        prop::collection::vec(double_strategy(), 0..3)
            .prop_map(|values| FieldValue::Vector(VectorValue::new(values))),
    ]
}

pub fn field_value_strategy() -> impl Strategy<Value = FieldValue> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(FieldValue::Array),
            prop::collection::btree_map("[ab_]{0,2}", inner, 0..4).prop_map(FieldValue::from_map),
        ]
    })
}

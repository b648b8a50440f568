use std::{
    cmp::Ordering,
    collections::hash_map::DefaultHasher,
    hash::{
        Hash,
        Hasher,
    },
};

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{
    encode_index_value,
    val,
    BsonBinaryData,
    BsonObjectId,
    BsonTimestamp,
    DatabaseId,
    Decimal128,
    DocumentKey,
    FieldValue,
    GeoPoint,
    IndexDirection,
    Reference,
    RegexValue,
    ServerTimestamp,
    Timestamp,
    TypeOrder,
    VectorValue,
};

fn hash_of(value: &FieldValue) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn asc(value: &FieldValue) -> Vec<u8> {
    encode_index_value(value, IndexDirection::Ascending)
}

fn desc(value: &FieldValue) -> Vec<u8> {
    encode_index_value(value, IndexDirection::Descending)
}

fn decimal(repr: &str) -> FieldValue {
    FieldValue::Decimal128(Decimal128::new(repr).unwrap())
}

fn ts(seconds: i64, nanos: i32) -> Timestamp {
    Timestamp { seconds, nanos }
}

fn reference(project: &str, database: &str, path: &str) -> FieldValue {
    FieldValue::Reference(Reference::new(
        DatabaseId::new(project, database),
        path.parse::<DocumentKey>().unwrap(),
    ))
}

/// Groups of values in ascending order. Values within a group compare equal.
fn ordered_groups() -> Vec<Vec<FieldValue>> {
    vec![
        vec![val!(null)],
        vec![FieldValue::MinKey],
        vec![val!(false)],
        vec![val!(true)],
        vec![val!(f64::NAN), decimal("NaN")],
        vec![val!(f64::NEG_INFINITY), decimal("-Infinity")],
        vec![val!(i64::MIN)],
        vec![val!(-1.1)],
        vec![val!(-1), val!(-1.0), FieldValue::Int32(-1)],
        vec![val!(-f64::MIN_POSITIVE)],
        vec![
            val!(0),
            val!(0.0),
            val!(-0.0),
            FieldValue::Int32(0),
            decimal("0"),
            decimal("-0"),
        ],
        vec![val!(5e-324)],
        vec![val!(0.1)],
        vec![val!(1), val!(1.0), FieldValue::Int32(1), decimal("1")],
        vec![val!(1.1)],
        vec![val!(1000), decimal("1e3")],
        vec![val!(i64::MAX)],
        vec![val!(9_223_372_036_854_775_808.0)],
        vec![val!(f64::INFINITY)],
        vec![val!(ts(1, 0))],
        vec![val!(ts(1, 1))],
        vec![val!(ts(2, 0))],
        vec![val!(BsonTimestamp {
            seconds: 1,
            increment: 2
        })],
        vec![val!(BsonTimestamp {
            seconds: 2,
            increment: 1
        })],
        vec![
            FieldValue::ServerTimestamp(ServerTimestamp::new(ts(1, 0), None)),
            FieldValue::ServerTimestamp(ServerTimestamp::new(ts(1, 0), Some(val!(3)))),
        ],
        vec![FieldValue::ServerTimestamp(ServerTimestamp::new(
            ts(2, 0),
            None,
        ))],
        vec![val!("")],
        vec![val!("\u{0}")],
        vec![val!("a")],
        vec![val!("ab")],
        vec![val!("b")],
        vec![val!("\u{ff}")],
        vec![val!("\u{fffd}")],
        vec![val!("\u{1f600}")],
        vec![val!(Vec::<u8>::new())],
        vec![val!(vec![0u8])],
        vec![val!(vec![0u8, 1])],
        vec![val!(vec![1u8])],
        vec![val!(vec![0xffu8])],
        vec![val!(BsonBinaryData {
            subtype: 1,
            data: vec![1]
        })],
        vec![val!(BsonBinaryData {
            subtype: 1,
            data: vec![2]
        })],
        vec![val!(BsonBinaryData {
            subtype: 2,
            data: vec![]
        })],
        vec![reference("p1", "d1", "c1/doc1")],
        vec![reference("p1", "d1", "c1/doc1/sub/x")],
        vec![reference("p1", "d1", "c1/doc2")],
        vec![reference("p1", "d1", "c10/doc1")],
        vec![reference("p1", "d1", "c2/doc1")],
        vec![reference("p1", "d2", "c1/doc1")],
        vec![reference("p2", "d1", "c1/doc1")],
        vec![val!(BsonObjectId("a".to_string()))],
        vec![val!(BsonObjectId("b".to_string()))],
        vec![val!(GeoPoint {
            latitude: -90.0,
            longitude: -180.0
        })],
        vec![val!(GeoPoint {
            latitude: -90.0,
            longitude: 0.0
        })],
        vec![
            val!(GeoPoint {
                latitude: 0.0,
                longitude: 0.0
            }),
            val!(GeoPoint {
                latitude: -0.0,
                longitude: 0.0
            }),
        ],
        vec![val!(GeoPoint {
            latitude: 1.0,
            longitude: -1.0
        })],
        vec![val!(RegexValue::new("a", "i"))],
        vec![val!(RegexValue::new("a", "m"))],
        vec![val!(RegexValue::new("b", ""))],
        vec![val!([])],
        vec![val!([null])],
        vec![val!([1]), val!([1.0])],
        vec![val!([1, 2])],
        vec![val!([1, "a"])],
        vec![val!(["a"])],
        vec![val!(VectorValue::new(vec![]))],
        vec![val!(VectorValue::new(vec![100.0]))],
        vec![val!(VectorValue::new(vec![1.0, 2.0, 3.0]))],
        vec![val!(VectorValue::new(vec![1.0, 3.0, 2.0]))],
        vec![val!({})],
        vec![val!({"a" => 1})],
        vec![val!({"a" => 1, "b" => 1})],
        vec![val!({"a" => 2})],
        vec![val!({"b" => 0})],
        vec![FieldValue::MaxKey],
    ]
}

#[test]
fn test_ordering_groups() {
    let groups = ordered_groups();
    for (i, left_group) in groups.iter().enumerate() {
        for (j, right_group) in groups.iter().enumerate() {
            for left in left_group {
                for right in right_group {
                    let expected = i.cmp(&j);
                    assert_eq!(
                        left.compare(right),
                        expected,
                        "compare({left:?}, {right:?})"
                    );
                    assert_eq!(
                        asc(left).cmp(&asc(right)),
                        expected,
                        "ascending encoding of {left:?} vs {right:?}"
                    );
                    assert_eq!(
                        desc(left).cmp(&desc(right)),
                        expected.reverse(),
                        "descending encoding of {left:?} vs {right:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_groups_cover_every_rank() {
    let mut ranks: Vec<TypeOrder> = ordered_groups()
        .iter()
        .map(|group| group[0].type_order())
        .collect();
    ranks.dedup();
    assert_eq!(ranks, TypeOrder::ALL.to_vec());
}

#[test]
fn test_equality_is_stricter_than_order() {
    let pairs = [
        (val!(1), val!(1.0)),
        (val!(1), FieldValue::Int32(1)),
        (val!(0.0), val!(-0.0)),
        (val!(1.0), decimal("1")),
        (val!([1]), val!([1.0])),
        (val!({"a" => 1}), val!({"a" => 1.0})),
    ];
    for (left, right) in pairs {
        assert_eq!(left.compare(&right), Ordering::Equal);
        assert_ne!(left, right, "{left:?} should not equal {right:?}");
    }
    assert_eq!(val!(f64::NAN), val!(f64::NAN));
    assert_eq!(val!(f64::NAN), val!(-f64::NAN));
    assert_eq!(decimal("1.0"), decimal("1"));
    assert_eq!(
        FieldValue::ServerTimestamp(ServerTimestamp::new(ts(1, 0), None)),
        FieldValue::ServerTimestamp(ServerTimestamp::new(ts(1, 0), Some(val!(3)))),
    );
    assert_eq!(hash_of(&val!(f64::NAN)), hash_of(&val!(-f64::NAN)));
}

#[test]
fn test_signed_zero_is_distinct_inside_decimals_and_geo_points() -> anyhow::Result<()> {
    let zero = decimal("0");
    let negative_zero = decimal("-0");
    assert_eq!(zero.compare(&negative_zero), Ordering::Equal);
    assert_ne!(zero, negative_zero);
    assert_ne!(hash_of(&zero), hash_of(&negative_zero));

    let origin = FieldValue::GeoPoint(GeoPoint::new(0.0, 0.0)?);
    let signed = FieldValue::GeoPoint(GeoPoint::new(-0.0, 0.0)?);
    assert_eq!(origin.compare(&signed), Ordering::Equal);
    assert_ne!(origin, signed);
    assert_eq!(origin, FieldValue::GeoPoint(GeoPoint::new(0.0, 0.0)?));
    assert_eq!(
        hash_of(&origin),
        hash_of(&FieldValue::GeoPoint(GeoPoint::new(0.0, 0.0)?))
    );
    Ok(())
}

#[test]
fn test_mixed_ranks_compare_by_rank() {
    assert_eq!(val!(1).compare(&val!("a")), Ordering::Less);
    assert_eq!(val!("a").compare(&FieldValue::Int32(1)), Ordering::Greater);
    assert_eq!(decimal("2").compare(&val!(1)), Ordering::Greater);
    assert_eq!(FieldValue::Null.compare(&FieldValue::MaxKey), Ordering::Less);
}

#[test]
fn test_sort_permutation_restores_rank_order() {
    let mut samples: Vec<FieldValue> = ordered_groups()
        .into_iter()
        .map(|mut group| group.swap_remove(0))
        .collect();
    let expected = samples.clone();
    samples.reverse();
    samples.rotate_left(17);
    samples.sort_by(|l, r| l.compare(r));
    assert_eq!(samples, expected);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn proptest_compare_is_reflexive(value in any::<FieldValue>()) {
        prop_assert_eq!(value.compare(&value), Ordering::Equal);
        prop_assert!(value.equals(&value));
    }

    #[test]
    fn proptest_compare_is_antisymmetric(left in any::<FieldValue>(), right in any::<FieldValue>()) {
        prop_assert_eq!(left.compare(&right), right.compare(&left).reverse());
    }

    #[test]
    fn proptest_compare_is_transitive(
        a in any::<FieldValue>(),
        b in any::<FieldValue>(),
        c in any::<FieldValue>(),
    ) {
        if a.compare(&b).is_le() && b.compare(&c).is_le() {
            prop_assert!(a.compare(&c).is_le());
        }
        if a.compare(&b).is_eq() && b.compare(&c).is_eq() {
            prop_assert!(a.compare(&c).is_eq());
        }
    }

    #[test]
    fn proptest_equal_values_hash_equal(left in any::<FieldValue>(), right in any::<FieldValue>()) {
        if left.equals(&right) {
            prop_assert_eq!(left.compare(&right), Ordering::Equal);
            prop_assert_eq!(hash_of(&left), hash_of(&right));
        }
        prop_assert_eq!(hash_of(&left), hash_of(&left.clone()));
    }

    #[test]
    fn proptest_encoding_preserves_order(left in any::<FieldValue>(), right in any::<FieldValue>()) {
        let expected = left.compare(&right);
        prop_assert_eq!(asc(&left).cmp(&asc(&right)), expected);
        prop_assert_eq!(desc(&left).cmp(&desc(&right)), expected.reverse());
    }

    #[test]
    fn proptest_value_within_rank_bounds(value in any::<FieldValue>()) {
        prop_assert!(value.lower_bound().compare(&value).is_le());
        if value.type_order() != TypeOrder::MaxKey {
            prop_assert_eq!(value.upper_bound().compare(&value), Ordering::Greater);
        }
    }

    #[test]
    fn proptest_canonical_id_is_deterministic(value in any::<FieldValue>()) {
        prop_assert_eq!(value.canonical_id(), value.clone().canonical_id());
    }
}

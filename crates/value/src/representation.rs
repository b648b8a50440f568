//! Maps that carry a reserved marker key stand in for types the base map
//! model has no slot for. Detection happens once, at construction, so the
//! rest of the crate only ever sees the typed variant.
use std::collections::BTreeMap;

use crate::{
    BsonBinaryData,
    BsonObjectId,
    BsonTimestamp,
    Decimal128,
    FieldValue,
    MapValue,
    RegexValue,
    ServerTimestamp,
    VectorValue,
};

pub const TYPE_KEY: &str = "__type__";
pub const VECTOR_TYPE: &str = "__vector__";
pub const VECTOR_VALUE_KEY: &str = "value";
pub const SERVER_TIMESTAMP_TYPE: &str = "server_timestamp";
pub const LOCAL_WRITE_TIME_KEY: &str = "__local_write_time__";
pub const PREVIOUS_VALUE_KEY: &str = "__previous_value__";
pub const MIN_KEY: &str = "__min__";
pub const MAX_KEY: &str = "__max__";
pub const OBJECT_ID_KEY: &str = "__oid__";
pub const INT32_KEY: &str = "__int__";
pub const DECIMAL128_KEY: &str = "__decimal128__";
pub const REGEX_KEY: &str = "__regex__";
pub const REGEX_PATTERN_KEY: &str = "pattern";
pub const REGEX_OPTIONS_KEY: &str = "options";
pub const BSON_TIMESTAMP_KEY: &str = "__request_timestamp__";
pub const BSON_TIMESTAMP_SECONDS_KEY: &str = "seconds";
pub const BSON_TIMESTAMP_INCREMENT_KEY: &str = "increment";
pub const BINARY_KEY: &str = "__binary__";

pub fn detect(fields: BTreeMap<String, FieldValue>) -> FieldValue {
    match try_detect(&fields) {
        Some(value) => value,
        None => FieldValue::Map(MapValue::new(fields)),
    }
}

fn try_detect(fields: &BTreeMap<String, FieldValue>) -> Option<FieldValue> {
    if let Some(FieldValue::String(ty)) = fields.get(TYPE_KEY) {
        return match ty.as_str() {
            VECTOR_TYPE => detect_vector(fields),
            SERVER_TIMESTAMP_TYPE => detect_server_timestamp(fields),
            _ => None,
        };
    }
    if fields.len() != 1 {
        return None;
    }
    let (key, value) = fields.iter().next()?;
    match (key.as_str(), value) {
        (MIN_KEY, FieldValue::Null) => Some(FieldValue::MinKey),
        (MAX_KEY, FieldValue::Null) => Some(FieldValue::MaxKey),
        (OBJECT_ID_KEY, FieldValue::String(oid)) => {
            Some(FieldValue::BsonObjectId(BsonObjectId(oid.clone())))
        },
        (INT32_KEY, value) => match value.as_number()? {
            crate::Number::Int(i) => i32::try_from(i).ok().map(FieldValue::Int32),
            crate::Number::Double(_) => None,
        },
        (DECIMAL128_KEY, FieldValue::String(repr)) => {
            Decimal128::new(repr.as_str()).ok().map(FieldValue::Decimal128)
        },
        (REGEX_KEY, FieldValue::Map(inner)) => {
            let pattern = inner.get(REGEX_PATTERN_KEY)?.as_str()?;
            let options = inner.get(REGEX_OPTIONS_KEY)?.as_str()?;
            (inner.len() == 2).then(|| FieldValue::Regex(RegexValue::new(pattern, options)))
        },
        (BSON_TIMESTAMP_KEY, FieldValue::Map(inner)) => {
            let seconds = u32_field(inner, BSON_TIMESTAMP_SECONDS_KEY)?;
            let increment = u32_field(inner, BSON_TIMESTAMP_INCREMENT_KEY)?;
            (inner.len() == 2).then_some(FieldValue::BsonTimestamp(BsonTimestamp {
                seconds,
                increment,
            }))
        },
        (BINARY_KEY, FieldValue::Bytes(bytes)) => {
            BsonBinaryData::from_bytes(bytes).map(FieldValue::BsonBinary)
        },
        _ => None,
    }
}

fn u32_field(map: &MapValue, key: &str) -> Option<u32> {
    match map.get(key)?.as_number()? {
        crate::Number::Int(i) => u32::try_from(i).ok(),
        crate::Number::Double(_) => None,
    }
}

fn detect_vector(fields: &BTreeMap<String, FieldValue>) -> Option<FieldValue> {
    if fields.len() != 2 {
        return None;
    }
    let elements = fields.get(VECTOR_VALUE_KEY)?.as_array()?;
    let values = elements
        .iter()
        .map(|e| e.as_number().map(|n| n.as_f64()))
        .collect::<Option<Vec<_>>>()?;
    Some(FieldValue::Vector(VectorValue::new(values)))
}

fn detect_server_timestamp(fields: &BTreeMap<String, FieldValue>) -> Option<FieldValue> {
    let FieldValue::Timestamp(local_write_time) = fields.get(LOCAL_WRITE_TIME_KEY)? else {
        return None;
    };
    let previous_value = fields.get(PREVIOUS_VALUE_KEY).cloned();
    let expected_len = 2 + usize::from(previous_value.is_some());
    if fields.len() != expected_len {
        return None;
    }
    Some(FieldValue::ServerTimestamp(ServerTimestamp::new(
        *local_write_time,
        previous_value,
    )))
}

#[cfg(test)]
mod tests {
    use crate::{
        val,
        BsonBinaryData,
        FieldValue,
        Timestamp,
    };

    #[test]
    fn test_detects_markers() {
        assert!(matches!(val!({"__min__" => null}), FieldValue::MinKey));
        assert!(matches!(val!({"__max__" => null}), FieldValue::MaxKey));
        assert!(matches!(val!({"__int__" => 7}), FieldValue::Int32(7)));
        assert!(matches!(val!({"__oid__" => "abc"}), FieldValue::BsonObjectId(_)));
        assert!(matches!(
            val!({"__type__" => "__vector__", "value" => [1, 2.5]}),
            FieldValue::Vector(v) if v.values() == [1.0, 2.5]
        ));
        assert!(matches!(
            val!({"__regex__" => {"pattern" => "^a", "options" => "i"}}),
            FieldValue::Regex(r) if r.pattern == "^a"
        ));
        assert!(matches!(
            val!({"__request_timestamp__" => {"seconds" => 1, "increment" => 2}}),
            FieldValue::BsonTimestamp(t) if t.seconds == 1 && t.increment == 2
        ));
        assert!(matches!(
            val!({"__decimal128__" => "1.2e3"}),
            FieldValue::Decimal128(d) if d.to_f64() == 1200.0
        ));
        assert!(matches!(
            FieldValue::from_fields([("__binary__", val!(vec![1u8, 2, 3]))]),
            FieldValue::BsonBinary(BsonBinaryData { subtype: 1, .. })
        ));
        let ts = Timestamp {
            seconds: 5,
            nanos: 0,
        };
        assert!(matches!(
            FieldValue::from_fields([
                ("__type__", val!("server_timestamp")),
                ("__local_write_time__", val!(ts)),
                ("__previous_value__", val!(1)),
            ]),
            FieldValue::ServerTimestamp(s) if s.local_write_time == ts
        ));
    }

    #[test]
    fn test_malformed_markers_stay_maps() {
        for value in [
            val!({"__min__" => 1}),
            val!({"__int__" => 3_000_000_000i64}),
            val!({"__int__" => 1.5}),
            val!({"__oid__" => "a", "other" => 1}),
            val!({"__type__" => "__vector__", "value" => ["x"]}),
            val!({"__type__" => "__vector__"}),
            val!({"__type__" => "other", "value" => [1]}),
            val!({"__decimal128__" => "abc"}),
            val!({"__regex__" => {"pattern" => "a"}}),
        ] {
            assert!(matches!(value, FieldValue::Map(_)), "{value:?}");
        }
    }
}

//! Canonical ids: deterministic strings for structural equality and cache
//! keys. They keep type information `compare` discards (`1` vs `1.0`) but are
//! not injective across types (`"1"` and `1` both print as `1`).
use std::fmt::Write;

use crate::{
    representation::{
        BINARY_KEY,
        BSON_TIMESTAMP_KEY,
        DECIMAL128_KEY,
        INT32_KEY,
        LOCAL_WRITE_TIME_KEY,
        MAX_KEY,
        MIN_KEY,
        OBJECT_ID_KEY,
        PREVIOUS_VALUE_KEY,
        REGEX_KEY,
        SERVER_TIMESTAMP_TYPE,
        TYPE_KEY,
        VECTOR_TYPE,
        VECTOR_VALUE_KEY,
    },
    FieldValue,
    Timestamp,
};

impl FieldValue {
    pub fn canonical_id(&self) -> String {
        let mut out = String::new();
        canonify(&mut out, self);
        out
    }
}

/// Doubles always carry a decimal point or exponent so they never collide
/// with integers.
pub fn canonical_f64(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_owned()
    } else if f == f64::INFINITY {
        "Infinity".to_owned()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_owned()
    } else {
        format!("{f:?}")
    }
}

fn canonify_timestamp(out: &mut String, ts: &Timestamp) {
    let _ = write!(out, "time({},{})", ts.seconds, ts.nanos);
}

fn canonify(out: &mut String, value: &FieldValue) {
    match value {
        FieldValue::Null => out.push_str("null"),
        FieldValue::MinKey => {
            let _ = write!(out, "{{{MIN_KEY}:null}}");
        },
        FieldValue::MaxKey => {
            let _ = write!(out, "{{{MAX_KEY}:null}}");
        },
        FieldValue::Boolean(b) => {
            let _ = write!(out, "{b}");
        },
        FieldValue::Int64(i) => {
            let _ = write!(out, "{i}");
        },
        FieldValue::Float64(f) => out.push_str(&canonical_f64(*f)),
        FieldValue::Int32(i) => {
            let _ = write!(out, "{{{INT32_KEY}:{i}}}");
        },
        FieldValue::Decimal128(d) => {
            let _ = write!(out, "{{{DECIMAL128_KEY}:{d}}}");
        },
        FieldValue::Timestamp(ts) => canonify_timestamp(out, ts),
        FieldValue::BsonTimestamp(ts) => {
            let _ = write!(
                out,
                "{{{BSON_TIMESTAMP_KEY}:{{increment:{},seconds:{}}}}}",
                ts.increment, ts.seconds
            );
        },
        FieldValue::ServerTimestamp(st) => {
            let _ = write!(out, "{{{LOCAL_WRITE_TIME_KEY}:");
            canonify_timestamp(out, &st.local_write_time);
            if let Some(previous) = &st.previous_value {
                let _ = write!(out, ",{PREVIOUS_VALUE_KEY}:");
                canonify(out, previous);
            }
            let _ = write!(out, ",{TYPE_KEY}:{SERVER_TIMESTAMP_TYPE}}}");
        },
        FieldValue::String(s) => out.push_str(s),
        FieldValue::Bytes(b) => out.push_str(&hex::encode(b)),
        FieldValue::BsonBinary(b) => {
            let _ = write!(out, "{{{BINARY_KEY}:{}}}", hex::encode(b.to_bytes()));
        },
        FieldValue::Reference(r) => out.push_str(&r.key.path().canonical_string()),
        FieldValue::BsonObjectId(oid) => {
            let _ = write!(out, "{{{OBJECT_ID_KEY}:{}}}", oid.0);
        },
        FieldValue::GeoPoint(g) => {
            let _ = write!(
                out,
                "geo({},{})",
                canonical_f64(g.latitude),
                canonical_f64(g.longitude)
            );
        },
        FieldValue::Regex(r) => {
            let _ = write!(
                out,
                "{{{REGEX_KEY}:{{options:{},pattern:{}}}}}",
                r.options, r.pattern
            );
        },
        FieldValue::Array(elements) => {
            out.push('[');
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                canonify(out, element);
            }
            out.push(']');
        },
        FieldValue::Vector(v) => {
            let _ = write!(out, "{{{TYPE_KEY}:{VECTOR_TYPE},{VECTOR_VALUE_KEY}:[");
            for (i, f) in v.values().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&canonical_f64(*f));
            }
            out.push_str("]}");
        },
        FieldValue::Map(map) => {
            out.push('{');
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push(':');
                canonify(out, value);
            }
            out.push('}');
        },
    }
}

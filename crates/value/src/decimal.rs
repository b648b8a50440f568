use std::{
    fmt,
    str::FromStr,
};

use errors::ErrorMetadata;

/// A 128-bit decimal carried in its textual form. Ordering and arithmetic go
/// through the nearest double; the text is kept so canonical ids round-trip
/// what the writer supplied.
#[derive(Clone, Debug)]
pub struct Decimal128 {
    repr: String,
    value: f64,
}

impl Decimal128 {
    pub fn new(repr: impl Into<String>) -> anyhow::Result<Self> {
        let repr = repr.into();
        let value = parse_decimal(&repr).ok_or_else(|| {
            anyhow::anyhow!(ErrorMetadata::bad_request(
                "InvalidDecimal128",
                format!("{repr:?} is not a valid decimal128 literal"),
            ))
        })?;
        Ok(Self { repr, value })
    }

    pub fn repr(&self) -> &str {
        &self.repr
    }

    pub fn to_f64(&self) -> f64 {
        self.value
    }
}

fn parse_decimal(repr: &str) -> Option<f64> {
    let trimmed = repr.trim();
    if trimmed.is_empty() || trimmed != repr {
        return None;
    }
    match trimmed {
        "NaN" | "-NaN" => return Some(f64::NAN),
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => (),
    }
    // Rust accepts "inf"/"nan" spellings that decimal literals do not.
    if trimmed.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return None;
    }
    f64::from_str(trimmed).ok()
}

impl FromStr for Decimal128 {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr)
    }
}

#[cfg(test)]
mod tests {
    use errors::ErrorMetadataAnyhowExt;

    use super::Decimal128;

    #[test]
    fn test_parse() -> anyhow::Result<()> {
        assert_eq!(Decimal128::new("1.2e3")?.to_f64(), 1200.0);
        assert_eq!(Decimal128::new("-0")?.to_f64(), 0.0);
        assert!(Decimal128::new("NaN")?.to_f64().is_nan());
        assert_eq!(Decimal128::new("-Infinity")?.to_f64(), f64::NEG_INFINITY);
        assert_eq!(Decimal128::new("1.2e3")?.repr(), "1.2e3");
        Ok(())
    }

    #[test]
    fn test_rejects_garbage() {
        for bad in ["", " 1", "inf", "1.2.3", "abc"] {
            let err = Decimal128::new(bad).unwrap_err();
            assert_eq!(err.short_msg(), "InvalidDecimal128");
        }
    }
}

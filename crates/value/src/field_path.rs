//! Types for representing paths to fields.
use std::{
    fmt,
    str::FromStr,
};

use errors::ErrorMetadata;

/// The reserved field naming a document's own key.
pub const KEY_FIELD_NAME: &str = "__name__";

/// A path to a field within nested maps. A top-level field is a single
/// segment. Segments may hold any non-empty string; ones that are not plain
/// identifiers are quoted with backticks in the string form.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(segments: Vec<String>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !segments.is_empty(),
            ErrorMetadata::bad_request("InvalidFieldPath", "Field paths must not be empty")
        );
        if segments.iter().any(|s| s.is_empty()) {
            anyhow::bail!(ErrorMetadata::bad_request(
                "InvalidFieldPath",
                format!("Field path {segments:?} contains an empty segment"),
            ));
        }
        Ok(Self { segments })
    }

    pub fn key_path() -> Self {
        Self {
            segments: vec![KEY_FIELD_NAME.to_owned()],
        }
    }

    pub fn is_key_field(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == KEY_FIELD_NAME
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn canonical_string(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            if is_simple_identifier(segment) {
                out.push_str(segment);
            } else {
                out.push('`');
                for c in segment.chars() {
                    if c == '`' || c == '\\' {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push('`');
            }
        }
        out
    }
}

fn is_simple_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for FieldPath {
    type Err = anyhow::Error;

    /// Parses the dotted form produced by [`FieldPath::canonical_string`].
    fn from_str(path: &str) -> anyhow::Result<Self> {
        let invalid = |msg: String| {
            anyhow::anyhow!(ErrorMetadata::bad_request("InvalidFieldPath", msg))
        };
        let mut segments = vec![];
        let mut current = String::new();
        let mut quoted = false;
        let mut chars = path.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' if quoted => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return Err(invalid(format!("Dangling escape in {path:?}"))),
                },
                '`' => quoted = !quoted,
                '.' if !quoted => segments.push(std::mem::take(&mut current)),
                c => current.push(c),
            }
        }
        if quoted {
            return Err(invalid(format!("Unterminated backtick in {path:?}")));
        }
        segments.push(current);
        Self::new(segments)
    }
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_string())
    }
}

#[cfg(test)]
mod tests {
    use errors::ErrorMetadataAnyhowExt;
    use proptest::prelude::*;

    use super::FieldPath;

    #[test]
    fn test_parse_quoted() -> anyhow::Result<()> {
        let path: FieldPath = "a.`b.c`.`d\\`e`".parse()?;
        assert_eq!(path.segments(), ["a", "b.c", "d`e"]);
        assert_eq!(path.canonical_string(), "a.`b.c`.`d\\`e`");
        assert!("__name__".parse::<FieldPath>()?.is_key_field());
        Ok(())
    }

    #[test]
    fn test_invalid_paths() {
        for bad in ["", "a..b", "a.", "`a"] {
            let err = bad.parse::<FieldPath>().unwrap_err();
            assert_eq!(err.short_msg(), "InvalidFieldPath", "{bad}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig { failure_persistence: None, ..ProptestConfig::default() })]

        #[test]
        fn test_canonical_string_parses_back(
            segments in prop::collection::vec("[a-z_.`\\\\ 0-9]{1,4}", 1..4),
        ) {
            let path = FieldPath::new(segments).unwrap();
            prop_assert_eq!(path.canonical_string().parse::<FieldPath>().unwrap(), path);
        }
    }
}

use crate::{
    DocumentKey,
    FieldPath,
    FieldValue,
    MapValue,
    Timestamp,
};

/// An immutable snapshot of a document as read from the cache or a listen
/// stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    key: DocumentKey,
    version: Timestamp,
    data: MapValue,
}

impl Document {
    pub fn new(key: DocumentKey, version: Timestamp, data: MapValue) -> Self {
        Self { key, version, data }
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn version(&self) -> Timestamp {
        self.version
    }

    pub fn data(&self) -> &MapValue {
        &self.data
    }

    /// The stored value at `path`. The key field is not stored in the data;
    /// see [`Document::key`].
    pub fn field(&self, path: &FieldPath) -> Option<&FieldValue> {
        self.data.get_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::{
        val,
        FieldPath,
        FieldValue,
        MapValue,
        Timestamp,
    };

    #[test]
    fn test_field_lookup() -> anyhow::Result<()> {
        let FieldValue::Map(data) = val!({"a" => {"b" => 1}}) else {
            panic!("not a map");
        };
        let doc = Document::new("c/d".parse()?, Timestamp::new(1, 0)?, data);
        assert_eq!(doc.field(&"a.b".parse()?), Some(&val!(1)));
        assert_eq!(doc.field(&FieldPath::key_path()), None);
        assert_eq!(
            Document::new("c/d".parse()?, Timestamp::new(1, 0)?, MapValue::default()).data(),
            &MapValue::default()
        );
        Ok(())
    }
}

//! Value kinds layered on the base model for BSON interop.

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BsonObjectId(pub String);

/// Binary payload with a leading subtype byte that orders before the data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BsonBinaryData {
    pub subtype: u8,
    pub data: Vec<u8>,
}

impl BsonBinaryData {
    /// The subtype byte followed by the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 1);
        out.push(self.subtype);
        out.extend_from_slice(&self.data);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&subtype, data) = bytes.split_first()?;
        Some(Self {
            subtype,
            data: data.to_vec(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegexValue {
    pub pattern: String,
    pub options: String,
}

impl RegexValue {
    pub fn new(pattern: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            options: options.into(),
        }
    }
}

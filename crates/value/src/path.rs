//! Database ids, slash-separated resource paths and document keys.
use std::{
    cmp::Ordering,
    fmt,
    str::FromStr,
};

use errors::ErrorMetadata;

pub const DEFAULT_DATABASE_ID: &str = "(default)";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatabaseId {
    pub project_id: String,
    pub database_id: String,
}

impl DatabaseId {
    pub fn new(project_id: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: database_id.into(),
        }
    }

    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self::new(project_id, DEFAULT_DATABASE_ID)
    }

    /// Sorts below every real database id.
    pub fn empty() -> Self {
        Self::new("", "")
    }
}

/// A path of non-empty segments, e.g. `rooms/eros/messages`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    pub fn new(segments: Vec<String>) -> anyhow::Result<Self> {
        if let Some(i) = segments.iter().position(|s| s.is_empty()) {
            anyhow::bail!(ErrorMetadata::bad_request(
                "InvalidResourcePath",
                format!("Segment {i} of path {:?} is empty", segments.join("/")),
            ));
        }
        Ok(Self { segments })
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    pub fn parent(&self) -> Option<ResourcePath> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    pub fn child(&self, segment: impl Into<String>) -> anyhow::Result<ResourcePath> {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self::new(segments)
    }

    pub fn canonical_string(&self) -> String {
        self.segments.join("/")
    }
}

impl Ord for ResourcePath {
    fn cmp(&self, other: &Self) -> Ordering {
        // Segment-wise, so `c1/x` < `c10/x` < `c2/x` and a prefix sorts first.
        self.segments.cmp(&other.segments)
    }
}

impl PartialOrd for ResourcePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for ResourcePath {
    type Err = anyhow::Error;

    fn from_str(path: &str) -> anyhow::Result<Self> {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        Self::new(segments)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_string())
    }
}

/// The path of a document: an even number of segments alternating between
/// collection ids and document ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    path: ResourcePath,
}

impl DocumentKey {
    pub fn new(path: ResourcePath) -> anyhow::Result<Self> {
        anyhow::ensure!(
            path.len() % 2 == 0,
            ErrorMetadata::bad_request(
                "InvalidDocumentKey",
                format!("{path} has an odd number of segments and names a collection"),
            )
        );
        Ok(Self { path })
    }

    /// The zero-segment key, used as the least reference.
    pub fn empty() -> Self {
        Self {
            path: ResourcePath::root(),
        }
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn collection_path(&self) -> Option<ResourcePath> {
        self.path.parent()
    }

    /// The id of the collection directly containing the document.
    pub fn collection_group(&self) -> Option<&str> {
        let segments = self.path.segments();
        segments.len().checked_sub(2).map(|i| segments[i].as_str())
    }

    pub fn document_id(&self) -> Option<&str> {
        self.path.last_segment()
    }
}

impl FromStr for DocumentKey {
    type Err = anyhow::Error;

    fn from_str(path: &str) -> anyhow::Result<Self> {
        Self::new(path.parse()?)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// A pointer to a document, qualified by the database it lives in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    pub database_id: DatabaseId,
    pub key: DocumentKey,
}

impl Reference {
    pub fn new(database_id: DatabaseId, key: DocumentKey) -> Self {
        Self { database_id, key }
    }

    pub fn empty() -> Self {
        Self::new(DatabaseId::empty(), DocumentKey::empty())
    }

    /// Project id, database id and then each path segment, in sort order.
    pub fn sort_segments(&self) -> impl Iterator<Item = &str> {
        [
            self.database_id.project_id.as_str(),
            self.database_id.database_id.as_str(),
        ]
        .into_iter()
        .chain(self.key.path().segments().iter().map(|s| s.as_str()))
    }
}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_segments().cmp(other.sort_segments())
    }
}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

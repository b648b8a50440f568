use std::fmt;

use itertools::Itertools;
use value::{
    Document,
    DocumentKey,
    ResourcePath,
};

use crate::{
    EvaluationContext,
    Expression,
    OrderBy,
};

/// One step of a pipeline. Exactly one source stage comes first; the
/// remaining stages transform the stream it produces.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Documents directly inside the collection at this path.
    Collection(ResourcePath),
    /// Documents in any collection with this id, at any depth.
    CollectionGroup(String),
    /// Every document in the database.
    Database,
    /// Exactly these documents, when they exist.
    Documents(Vec<DocumentKey>),
    /// Keeps documents for which the predicate is `true`.
    Where(Expression),
    Sort(Vec<OrderBy>),
    Limit(u64),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Collection(_) => "collection",
            Stage::CollectionGroup(_) => "collection_group",
            Stage::Database => "database",
            Stage::Documents(_) => "documents",
            Stage::Where(_) => "where",
            Stage::Sort(_) => "sort",
            Stage::Limit(_) => "limit",
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(
            self,
            Stage::Collection(_) | Stage::CollectionGroup(_) | Stage::Database | Stage::Documents(_)
        )
    }

    /// Whether a source stage produces `document`. Non-source stages accept
    /// everything.
    pub fn matches_source(&self, document: &Document) -> bool {
        let key = document.key();
        match self {
            Stage::Collection(path) => key.collection_path().as_ref() == Some(path),
            Stage::CollectionGroup(id) => key.collection_group() == Some(id.as_str()),
            Stage::Database => true,
            Stage::Documents(keys) => keys.contains(key),
            Stage::Where(_) | Stage::Sort(_) | Stage::Limit(_) => true,
        }
    }

    /// Whether a where stage keeps `document`. Other stages keep everything.
    pub fn keeps(&self, context: EvaluationContext<'_>, document: &Document) -> bool {
        match self {
            Stage::Where(predicate) => predicate.evaluate(context, document).is_true(),
            _ => true,
        }
    }

    pub fn expressions(&self) -> Box<dyn Iterator<Item = &Expression> + '_> {
        match self {
            Stage::Where(predicate) => Box::new(std::iter::once(predicate)),
            Stage::Sort(orderings) => Box::new(orderings.iter().map(|o| &o.expression)),
            _ => Box::new(std::iter::empty()),
        }
    }

    pub fn canonical_id(&self) -> String {
        let args = match self {
            Stage::Collection(path) => path.canonical_string(),
            Stage::CollectionGroup(id) => id.clone(),
            Stage::Database => String::new(),
            Stage::Documents(keys) => keys.iter().join(","),
            Stage::Where(predicate) => predicate.canonical_id(),
            Stage::Sort(orderings) => orderings.iter().map(OrderBy::canonical_id).join(","),
            Stage::Limit(n) => n.to_string(),
        };
        format!("{}({args})", self.name())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_id())
    }
}

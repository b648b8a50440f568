use std::{
    cmp::Ordering,
    fmt,
    iter,
};

use errors::ErrorMetadata;
use itertools::Itertools;
use value::{
    DatabaseId,
    Document,
    DocumentKey,
    FieldPath,
    ResourcePath,
};

use crate::{
    knobs::{
        PIPELINE_MAX_EXPRESSION_DEPTH,
        PIPELINE_SORT_BUFFER_WARN_THRESHOLD,
    },
    metrics::log_document_filtered,
    EvaluateResult,
    EvaluationContext,
    Expression,
    OrderBy,
    Stage,
};

/// A validated sequence of stages: one source followed by any number of
/// where, sort and limit stages, evaluated against a single database.
///
/// Equality is structural. Two pipelines may share a canonical id and still
/// be unequal, e.g. when they filter on `42` and `"42"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pipeline {
    database_id: DatabaseId,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(database_id: DatabaseId, stages: Vec<Stage>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            stages.first().is_some_and(Stage::is_source),
            ErrorMetadata::bad_request(
                "InvalidPipeline",
                "A pipeline must start with a collection, collection_group, database or \
                 documents stage",
            )
        );
        validate_source(&stages[0])?;
        for stage in &stages[1..] {
            validate_stage(stage)?;
        }
        Ok(Self {
            database_id,
            stages,
        })
    }

    pub fn collection(database_id: DatabaseId, path: ResourcePath) -> anyhow::Result<Self> {
        Self::new(database_id, vec![Stage::Collection(path)])
    }

    pub fn collection_group(
        database_id: DatabaseId,
        collection_id: impl Into<String>,
    ) -> anyhow::Result<Self> {
        Self::new(database_id, vec![Stage::CollectionGroup(collection_id.into())])
    }

    pub fn database(database_id: DatabaseId) -> anyhow::Result<Self> {
        Self::new(database_id, vec![Stage::Database])
    }

    pub fn documents(database_id: DatabaseId, keys: Vec<DocumentKey>) -> anyhow::Result<Self> {
        Self::new(database_id, vec![Stage::Documents(keys)])
    }

    /// Appends a where stage.
    pub fn filter(self, predicate: Expression) -> anyhow::Result<Self> {
        self.push(Stage::Where(predicate))
    }

    /// Appends a sort stage.
    pub fn sort(self, orderings: Vec<OrderBy>) -> anyhow::Result<Self> {
        self.push(Stage::Sort(orderings))
    }

    pub fn limit(self, n: u64) -> Self {
        let mut stages = self.stages;
        stages.push(Stage::Limit(n));
        Self { stages, ..self }
    }

    fn push(mut self, stage: Stage) -> anyhow::Result<Self> {
        validate_stage(&stage)?;
        self.stages.push(stage);
        Ok(self)
    }

    pub fn database_id(&self) -> &DatabaseId {
        &self.database_id
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    fn context(&self) -> EvaluationContext<'_> {
        EvaluationContext::new(&self.database_id)
    }

    /// The stages as executed. Every sort is made total by a trailing
    /// ascending order on the document key. A limit with no sort ahead of it
    /// gets a key-ordered sort first, and a pipeline without any sort gets
    /// one at the end.
    pub fn rewritten_stages(&self) -> Vec<Stage> {
        let key_sort = || Stage::Sort(vec![OrderBy::asc(FieldPath::key_path())]);
        let mut stages = Vec::with_capacity(self.stages.len() + 1);
        let mut ordered = false;
        for stage in &self.stages {
            match stage {
                Stage::Sort(orderings) => {
                    ordered = true;
                    let mut orderings = orderings.clone();
                    if !orderings.iter().any(OrderBy::is_key_ordering) {
                        orderings.push(OrderBy::asc(FieldPath::key_path()));
                    }
                    stages.push(Stage::Sort(orderings));
                },
                Stage::Limit(_) if !ordered => {
                    ordered = true;
                    stages.push(key_sort());
                    stages.push(stage.clone());
                },
                stage => stages.push(stage.clone()),
            }
        }
        if !ordered {
            stages.push(key_sort());
        }
        stages
    }

    /// e.g. `collection(rooms)|where(fn(equal[fld(a),cst(1)]))|sort(fld(__name__)asc)`
    pub fn canonical_id(&self) -> String {
        self.rewritten_stages().iter().map(Stage::canonical_id).join("|")
    }

    /// Whether the source and every where stage accept `document`. Sorts and
    /// limits are ignored.
    pub fn matches(&self, document: &Document) -> bool {
        let context = self.context();
        self.stages
            .iter()
            .all(|stage| stage.matches_source(document) && stage.keeps(context, document))
    }

    /// Orders two documents the way the last sort of the executed pipeline
    /// would. Never returns `Equal` for documents with different keys.
    pub fn compare_documents(&self, left: &Document, right: &Document) -> Ordering {
        let context = self.context();
        let stages = self.rewritten_stages();
        let orderings = stages
            .iter()
            .rev()
            .find_map(|stage| match stage {
                Stage::Sort(orderings) => Some(orderings.as_slice()),
                _ => None,
            })
            .unwrap_or_default();
        for ordering in orderings {
            let l = ordering.sort_key(context, left);
            let r = ordering.sort_key(context, right);
            let result = ordering.compare_keys(&l, &r);
            if result.is_ne() {
                return result;
            }
        }
        Ordering::Equal
    }

    /// Runs the pipeline over `documents`, a stream from the source's
    /// collection or wider. Filtering and limits are streamed; a sort
    /// buffers everything upstream of it on the first pull.
    pub fn execute<'a, I>(&'a self, documents: I) -> Box<dyn Iterator<Item = Document> + 'a>
    where
        I: IntoIterator<Item = Document>,
        I::IntoIter: 'a,
    {
        let context = self.context();
        let mut stream: Box<dyn Iterator<Item = Document> + 'a> = Box::new(documents.into_iter());
        for stage in self.rewritten_stages() {
            stream = match stage {
                Stage::Collection(_)
                | Stage::CollectionGroup(_)
                | Stage::Database
                | Stage::Documents(_) => {
                    Box::new(stream.filter(move |document| stage.matches_source(document)))
                },
                Stage::Where(predicate) => Box::new(stream.filter(move |document| {
                    let outcome = predicate.evaluate(context, document);
                    if outcome.is_true() {
                        return true;
                    }
                    if outcome.is_error() {
                        tracing::debug!(
                            "Predicate {predicate} failed to evaluate for {}",
                            document.key()
                        );
                    }
                    log_document_filtered(outcome.outcome_label());
                    false
                })),
                Stage::Sort(orderings) => sorted(stream, orderings, context),
                Stage::Limit(n) => Box::new(stream.take(usize::try_from(n).unwrap_or(usize::MAX))),
            };
        }
        stream
    }
}

fn validate_source(stage: &Stage) -> anyhow::Result<()> {
    match stage {
        Stage::Collection(path) => anyhow::ensure!(
            path.len() % 2 == 1,
            ErrorMetadata::bad_request(
                "InvalidPipeline",
                format!("{path} names a document, not a collection"),
            )
        ),
        Stage::CollectionGroup(id) => anyhow::ensure!(
            !id.is_empty() && !id.contains('/'),
            ErrorMetadata::bad_request(
                "InvalidPipeline",
                format!("{id:?} is not a valid collection id"),
            )
        ),
        Stage::Documents(keys) => anyhow::ensure!(
            !keys.is_empty(),
            ErrorMetadata::bad_request(
                "InvalidPipeline",
                "A documents stage needs at least one document",
            )
        ),
        _ => (),
    }
    Ok(())
}

fn validate_stage(stage: &Stage) -> anyhow::Result<()> {
    anyhow::ensure!(
        !stage.is_source(),
        ErrorMetadata::bad_request(
            "InvalidPipeline",
            format!("{} is a source stage and may only appear first", stage.name()),
        )
    );
    if let Stage::Sort(orderings) = stage {
        anyhow::ensure!(
            !orderings.is_empty(),
            ErrorMetadata::bad_request("InvalidPipeline", "A sort stage needs at least one ordering")
        );
    }
    for expression in stage.expressions() {
        expression.validate(*PIPELINE_MAX_EXPRESSION_DEPTH)?;
    }
    Ok(())
}

/// Sorts lazily: nothing is read from `upstream` until the first pull.
fn sorted<'a>(
    upstream: Box<dyn Iterator<Item = Document> + 'a>,
    orderings: Vec<OrderBy>,
    context: EvaluationContext<'a>,
) -> Box<dyn Iterator<Item = Document> + 'a> {
    let mut pending = Some(upstream);
    let mut buffered: Option<std::vec::IntoIter<Document>> = None;
    Box::new(iter::from_fn(move || {
        if let Some(upstream) = pending.take() {
            buffered = Some(sort_documents(upstream, &orderings, context).into_iter());
        }
        buffered.as_mut()?.next()
    }))
}

fn sort_documents(
    upstream: impl Iterator<Item = Document>,
    orderings: &[OrderBy],
    context: EvaluationContext<'_>,
) -> Vec<Document> {
    let mut keyed: Vec<(Vec<EvaluateResult>, Document)> = upstream
        .map(|document| {
            let keys = orderings
                .iter()
                .map(|ordering| ordering.sort_key(context, &document))
                .collect();
            (keys, document)
        })
        .collect();
    if keyed.len() > *PIPELINE_SORT_BUFFER_WARN_THRESHOLD {
        tracing::warn!(
            "Sort buffered {} documents, more than {}",
            keyed.len(),
            *PIPELINE_SORT_BUFFER_WARN_THRESHOLD
        );
    }
    keyed.sort_by(|(l, _), (r, _)| {
        orderings
            .iter()
            .zip(l.iter().zip(r))
            .map(|(ordering, (l, r))| ordering.compare_keys(l, r))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    keyed.into_iter().map(|(_, document)| document).collect()
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_id())
    }
}

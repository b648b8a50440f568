use value::{
    DatabaseId,
    Document,
    FieldPath,
    FieldValue,
    Reference,
};

use crate::EvaluateResult;

/// What an expression may read besides the document itself.
#[derive(Clone, Copy, Debug)]
pub struct EvaluationContext<'a> {
    database_id: &'a DatabaseId,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(database_id: &'a DatabaseId) -> Self {
        Self { database_id }
    }

    pub fn database_id(&self) -> &'a DatabaseId {
        self.database_id
    }

    /// Reads a field of `document`. The key field resolves to a reference to
    /// the document itself; any other missing field is `Unset`.
    pub fn resolve_field(&self, document: &Document, path: &FieldPath) -> EvaluateResult {
        if path.is_key_field() {
            return EvaluateResult::Value(FieldValue::Reference(Reference::new(
                self.database_id.clone(),
                document.key().clone(),
            )));
        }
        match document.field(path) {
            Some(value) => EvaluateResult::Value(value.clone()),
            None => EvaluateResult::Unset,
        }
    }
}

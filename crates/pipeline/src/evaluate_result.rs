use std::cmp::Ordering;

use value::FieldValue;

/// The outcome of evaluating an expression against one document.
///
/// `Value` may hold an explicit null, which is a successful result. `Unset`
/// means the expression read a field the document does not have. `Error`
/// means the expression is undefined for its operands (a type mismatch,
/// overflow or domain violation). Errors are ordinary return values so that
/// enclosing expressions can absorb them, e.g. `and(false, <error>)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EvaluateResult {
    Value(FieldValue),
    Unset,
    Error,
}

impl EvaluateResult {
    pub const NULL: EvaluateResult = EvaluateResult::Value(FieldValue::Null);
    pub const TRUE: EvaluateResult = EvaluateResult::Value(FieldValue::Boolean(true));
    pub const FALSE: EvaluateResult = EvaluateResult::Value(FieldValue::Boolean(false));

    pub fn boolean(b: bool) -> Self {
        EvaluateResult::Value(FieldValue::Boolean(b))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EvaluateResult::Error)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, EvaluateResult::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, EvaluateResult::Value(FieldValue::Null))
    }

    pub fn value(&self) -> Option<&FieldValue> {
        match self {
            EvaluateResult::Value(v) => Some(v),
            EvaluateResult::Unset | EvaluateResult::Error => None,
        }
    }

    pub fn into_value(self) -> Option<FieldValue> {
        match self {
            EvaluateResult::Value(v) => Some(v),
            EvaluateResult::Unset | EvaluateResult::Error => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value().and_then(FieldValue::as_bool)
    }

    /// Whether a `where` stage keeps the document: only boolean `true` does.
    pub fn is_true(&self) -> bool {
        self.as_bool() == Some(true)
    }

    /// Short label for logs and metrics.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            EvaluateResult::Value(FieldValue::Boolean(true)) => "true",
            EvaluateResult::Value(FieldValue::Boolean(false)) => "false",
            EvaluateResult::Value(FieldValue::Null) => "null",
            EvaluateResult::Value(_) => "non_boolean",
            EvaluateResult::Unset => "unset",
            EvaluateResult::Error => "error",
        }
    }

    /// Order of sort keys in ascending direction. Unset and error keys are
    /// indistinguishable and sort below every value, null included.
    pub fn compare_sort_keys(&self, other: &EvaluateResult) -> Ordering {
        match (self.value(), other.value()) {
            (Some(l), Some(r)) => l.compare(r),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }
}

impl From<FieldValue> for EvaluateResult {
    fn from(value: FieldValue) -> Self {
        EvaluateResult::Value(value)
    }
}

impl From<bool> for EvaluateResult {
    fn from(b: bool) -> Self {
        Self::boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use value::val;

    use super::EvaluateResult;

    #[test]
    fn test_sort_keys_put_missing_below_null() {
        let mut keys = vec![
            EvaluateResult::from(val!(1)),
            EvaluateResult::NULL,
            EvaluateResult::Error,
            EvaluateResult::Unset,
            EvaluateResult::from(val!("a")),
        ];
        keys.sort_by(|l, r| l.compare_sort_keys(r));
        assert!(keys[0].value().is_none());
        assert!(keys[1].value().is_none());
        assert_eq!(keys[2], EvaluateResult::NULL);
        assert_eq!(keys[3], EvaluateResult::from(val!(1)));
        assert_eq!(
            EvaluateResult::Unset.compare_sort_keys(&EvaluateResult::Error),
            Ordering::Equal
        );
    }

    #[test]
    fn test_only_true_passes() {
        assert!(EvaluateResult::TRUE.is_true());
        for outcome in [
            EvaluateResult::FALSE,
            EvaluateResult::NULL,
            EvaluateResult::Unset,
            EvaluateResult::Error,
            EvaluateResult::from(val!(1)),
        ] {
            assert!(!outcome.is_true(), "{outcome:?}");
        }
    }
}

use std::{
    cmp::Ordering,
    fmt,
};

use strum::Display;
use value::{
    Document,
    FieldPath,
};

use crate::{
    EvaluateResult,
    EvaluationContext,
    Expression,
};

#[derive(Clone, Copy, Eq, Hash, PartialEq, Debug, Display)]
#[strum(serialize_all = "lowercase")]
/// The direction of a sort.
pub enum Order {
    /// Ascending order, e.g. 1, 2, 3.
    Asc,
    /// Descending order, e.g. 3, 2, 1.
    Desc,
}

impl Order {
    /// Apply the direction to an ascending comparison.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Order::Asc => ordering,
            Order::Desc => ordering.reverse(),
        }
    }
}

/// One key of a sort stage.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderBy {
    pub expression: Expression,
    pub order: Order,
}

impl OrderBy {
    pub fn new(expression: Expression, order: Order) -> Self {
        Self { expression, order }
    }

    pub fn asc(field: FieldPath) -> Self {
        Self::new(Expression::field(field), Order::Asc)
    }

    pub fn desc(field: FieldPath) -> Self {
        Self::new(Expression::field(field), Order::Desc)
    }

    /// True for an ordering on the document key itself.
    pub fn is_key_ordering(&self) -> bool {
        matches!(&self.expression, Expression::Field(path) if path.is_key_field())
    }

    pub fn sort_key(&self, context: EvaluationContext<'_>, document: &Document) -> EvaluateResult {
        self.expression.evaluate(context, document)
    }

    pub fn compare_keys(&self, left: &EvaluateResult, right: &EvaluateResult) -> Ordering {
        self.order.apply(left.compare_sort_keys(right))
    }

    pub fn canonical_id(&self) -> String {
        format!("{}{}", self.expression.canonical_id(), self.order)
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_id())
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use value::{
        val,
        FieldPath,
    };

    use super::{
        Order,
        OrderBy,
    };
    use crate::EvaluateResult;

    #[test]
    fn test_canonical_id() -> anyhow::Result<()> {
        assert_eq!(OrderBy::asc(FieldPath::key_path()).canonical_id(), "fld(__name__)asc");
        assert_eq!(OrderBy::desc("a.b".parse()?).canonical_id(), "fld(a.b)desc");
        Ok(())
    }

    #[test]
    fn test_direction() -> anyhow::Result<()> {
        let one = EvaluateResult::from(val!(1));
        let null = EvaluateResult::NULL;
        let asc = OrderBy::asc("a".parse()?);
        let desc = OrderBy::desc("a".parse()?);
        assert_eq!(asc.compare_keys(&null, &one), Ordering::Less);
        assert_eq!(desc.compare_keys(&null, &one), Ordering::Greater);
        // Missing keys sort first ascending, and last descending.
        assert_eq!(asc.compare_keys(&EvaluateResult::Unset, &null), Ordering::Less);
        assert_eq!(desc.compare_keys(&EvaluateResult::Unset, &null), Ordering::Greater);
        assert_eq!(Order::Desc.apply(Ordering::Equal), Ordering::Equal);
        assert!(OrderBy::asc(FieldPath::key_path()).is_key_ordering());
        assert!(!asc.is_key_ordering());
        Ok(())
    }
}

use std::borrow::Cow;

pub type Labels = Vec<MetricLabel>;

/// Label names for counters keyed by the function that produced an event.
pub const FUNCTION_LABEL: [&str; 1] = ["function"];
/// Label names for counters keyed by how a predicate turned out.
pub const OUTCOME_LABEL: [&str; 1] = ["outcome"];

#[derive(PartialOrd, Ord, PartialEq, Eq, Clone, Debug)]
pub struct MetricLabel {
    pub key: &'static str,
    pub value: Cow<'static, str>,
}

impl MetricLabel {
    pub fn new(key: &'static str, value: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    pub fn function(name: &'static str) -> Self {
        Self::new(FUNCTION_LABEL[0], name)
    }

    pub fn outcome(outcome: &'static str) -> Self {
        Self::new(OUTCOME_LABEL[0], outcome)
    }

    pub fn split_key_value(&self) -> (&str, &str) {
        (self.key, &self.value)
    }
}

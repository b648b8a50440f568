use metrics::{
    log_counter_with_labels,
    register_counter,
    MetricLabel,
    FUNCTION_LABEL,
    OUTCOME_LABEL,
};

use crate::expression::FunctionName;

register_counter!(
    pub PIPELINE_EVALUATION_ERRORS_TOTAL,
    "Number of function calls that evaluated to an error",
    &FUNCTION_LABEL
);
pub fn log_evaluation_error(function: FunctionName) {
    let function: &'static str = function.into();
    log_counter_with_labels(
        &PIPELINE_EVALUATION_ERRORS_TOTAL,
        1,
        vec![MetricLabel::function(function)],
    );
}

register_counter!(
    pub PIPELINE_DOCUMENTS_FILTERED_TOTAL,
    "Number of documents dropped by a where stage",
    &OUTCOME_LABEL
);
pub fn log_document_filtered(outcome: &'static str) {
    log_counter_with_labels(
        &PIPELINE_DOCUMENTS_FILTERED_TOTAL,
        1,
        vec![MetricLabel::outcome(outcome)],
    );
}

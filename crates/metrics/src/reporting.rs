use std::collections::HashMap;

use prometheus::{
    core::Collector,
    IntCounter,
    IntCounterVec,
};

use crate::{
    labels::Labels,
    log_invalid_metric,
    MetricLabel,
};

pub fn log_counter(prometheus_counter: &IntCounter, increment: u64) {
    prometheus_counter.inc_by(increment);
}

pub fn log_counter_with_labels(
    prometheus_counter: &IntCounterVec,
    increment: u64,
    labels: Labels,
) {
    match prometheus_counter.get_metric_with(
        &labels
            .iter()
            .map(MetricLabel::split_key_value)
            .collect::<HashMap<_, _, ahash::RandomState>>(),
    ) {
        Ok(metric) => metric.inc_by(increment),
        Err(e) => {
            log_invalid_metric(get_desc(prometheus_counter), e);
        },
    }
}

pub fn get_desc<M: Collector>(metric: &M) -> String {
    let unknown = "unknown".to_string();
    metric
        .desc()
        .first()
        .map(|d| d.fq_name.clone())
        .unwrap_or(unknown)
}

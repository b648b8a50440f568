//! Code for interacting with our metrics logging

mod labels;
mod macros;
mod metrics;
mod reporting;

pub use paste::paste;
pub use prometheus;

pub use crate::{
    labels::*,
    metrics::*,
    reporting::{
        get_desc,
        log_counter,
        log_counter_with_labels,
    },
};

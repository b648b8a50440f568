//! Tunable limits for pipeline evaluation. Each can be overridden with an
//! environment variable of the same name.
#![deny(missing_docs)]

use std::{
    num::NonZeroUsize,
    sync::LazyLock,
};

use cmd_util::env::env_config;

/// Expression trees nested deeper than this are rejected when a pipeline is
/// built. Evaluation recurses once per level, so this also bounds stack use.
pub static PIPELINE_MAX_EXPRESSION_DEPTH: LazyLock<usize> =
    LazyLock::new(|| env_config("PIPELINE_MAX_EXPRESSION_DEPTH", 100));

/// Sort stages that buffer more documents than this log a warning. Sorting
/// still proceeds.
pub static PIPELINE_SORT_BUFFER_WARN_THRESHOLD: LazyLock<usize> =
    LazyLock::new(|| env_config("PIPELINE_SORT_BUFFER_WARN_THRESHOLD", 10_000));

/// Number of compiled regular expressions kept for `like`, `regex_contains`
/// and `regex_match`.
pub static PIPELINE_REGEX_CACHE_SIZE: LazyLock<NonZeroUsize> = LazyLock::new(|| {
    env_config(
        "PIPELINE_REGEX_CACHE_SIZE",
        NonZeroUsize::new(256).unwrap(),
    )
});

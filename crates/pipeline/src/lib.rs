//! Expression evaluation and pipeline stages over [`value::Document`]s.
//!
//! Expressions evaluate to one of four outcomes (a value, null, unset or
//! error) and never fail at the host level. Pipelines compose a source with
//! where, sort and limit stages into a pull-based iterator, and expose a
//! canonical id for caching.

mod context;
mod evaluate_result;
mod expression;
mod functions;
pub mod knobs;
mod metrics;
mod order;
mod pipeline;
mod stage;


pub use crate::{
    context::EvaluationContext,
    evaluate_result::EvaluateResult,
    expression::{
        Arity,
        Expression,
        FunctionExpr,
        FunctionName,
    },
    order::{
        Order,
        OrderBy,
    },
    pipeline::Pipeline,
    stage::Stage,
};

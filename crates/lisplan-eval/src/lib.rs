//! lisplan tree-walking evaluator.
//!
//! Evaluates parsed forms against one flat, mutable [`Environment`]. The
//! `plan` built-in turns attribute-tagged sub-lists into [`Plan`] values,
//! checked by the declarative validator in [`schema`].
//!
//! [`Plan`]: lisplan_types::Plan

pub mod builtins;
pub mod env;
pub mod evaluator;
pub mod plan;
pub mod schema;

pub use env::Environment;
pub use evaluator::{EvalConfig, Evaluator};
pub use lisplan_types::Interpreter;
pub use plan::{build_plan, build_step};
pub use schema::{
    validate, validate_lenient, validate_strict, AttrFlags, AttrValue, Attributes, Mode, Schema,
    Validated,
};

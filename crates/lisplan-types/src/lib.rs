//! Shared types for lisplan.
//!
//! This crate defines the runtime [`Value`] (which doubles as the parsed
//! form representation), the [`Plan`]/[`Step`] domain objects, source spans,
//! and the error type used by every pipeline stage.

mod error;
mod plan;
mod span;
mod stack;
mod value;

pub use error::{ErrorCategory, ErrorCode, LisplanError};
pub use plan::{Plan, Step};
pub use span::{SourceFile, Span};
pub use stack::ensure_sufficient_stack;
pub use value::{Builtin, BuiltinFn, Interpreter, Number, Value};

/// Result type used throughout lisplan.
pub type Result<T> = std::result::Result<T, LisplanError>;

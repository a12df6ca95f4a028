use crate::Span;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Schema,
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Schema => write!(f, "schema"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// Numeric error code (E100–E399).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const MISMATCHED_DELIMITER: Self = Self(100);
    pub const UNEXPECTED_EOF: Self = Self(101);
    pub const INTEGER_OUT_OF_RANGE: Self = Self(102);

    // ── Schema errors (E200–E299) ──
    pub const MISSING_ATTRIBUTE: Self = Self(200);
    pub const DUPLICATE_ATTRIBUTE: Self = Self(201);
    pub const UNEXPECTED_ATTRIBUTE: Self = Self(202);
    pub const UNEXPECTED_ITEM: Self = Self(203);
    pub const INVALID_ATTRIBUTE: Self = Self(204);
    pub const MALFORMED_PLAN: Self = Self(210);

    // ── Runtime errors (E300–E399) ──
    pub const UNBOUND_SYMBOL: Self = Self(300);
    pub const NOT_CALLABLE: Self = Self(301);
    pub const ARITY: Self = Self(302);
    pub const TYPE_MISMATCH: Self = Self(303);
    pub const ARITHMETIC: Self = Self(304);

    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            200..=299 => ErrorCategory::Schema,
            _ => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Every way a lisplan run can fail.
///
/// All errors are fatal to the current run. Each variant carries the
/// context needed to diagnose it without re-running: delimiters and
/// position for syntax errors, the attribute key for schema errors, the
/// symbol or built-in name for runtime errors.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LisplanError {
    /// A closing bracket that is not the one currently expected.
    #[error("mismatched delimiters (expected {}, got '{found}') at {span}", expected_closer(.expected))]
    MismatchedDelimiter {
        /// `None` when no list was open.
        expected: Option<char>,
        found: char,
        span: Span,
    },

    /// Input ended while a list was still open.
    #[error("unexpected end of input (expected '{expected}') at {span}")]
    UnexpectedEof { expected: char, span: Span },

    /// An integer literal that does not fit in 64 bits.
    #[error("integer literal '{literal}' out of range at {span}")]
    IntegerOutOfRange { literal: String, span: Span },

    #[error("required attribute '{key}' not found")]
    MissingAttribute { key: String },

    #[error("too many definitions of attribute '{key}'")]
    DuplicateAttribute { key: String },

    /// Strict mode: a tagged list whose tag is not in the schema.
    #[error("unexpected attribute '{key}' found")]
    UnexpectedAttribute { key: String },

    /// Strict mode: an item that is not a tagged list at all.
    #[error("unexpected item '{item}' found")]
    UnexpectedItem { item: String },

    /// A recognized attribute whose value has the wrong shape.
    #[error("invalid attribute '{key}': {reason}")]
    InvalidAttribute { key: String, reason: String },

    /// Raised by the `plan` built-in, wrapping the validation failure.
    #[error("malformed {form} (offending key '{key}'): {source}")]
    MalformedPlan {
        form: String,
        key: String,
        source: Box<LisplanError>,
    },

    #[error("undefined '{name}'")]
    UnboundSymbol { name: String },

    #[error("'{value}' is not callable")]
    NotCallable { value: String },

    #[error("'{builtin}' expects {expected} argument(s), got {found}")]
    Arity {
        builtin: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("'{builtin}' expects {expected}, got '{found}'")]
    TypeMismatch {
        builtin: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("'{builtin}': {message}")]
    Arithmetic {
        builtin: &'static str,
        message: String,
    },
}

fn expected_closer(expected: &Option<char>) -> String {
    match expected {
        Some(ch) => format!("'{ch}'"),
        None => "end of input".to_string(),
    }
}

impl LisplanError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MismatchedDelimiter { .. } => ErrorCode::MISMATCHED_DELIMITER,
            Self::UnexpectedEof { .. } => ErrorCode::UNEXPECTED_EOF,
            Self::IntegerOutOfRange { .. } => ErrorCode::INTEGER_OUT_OF_RANGE,
            Self::MissingAttribute { .. } => ErrorCode::MISSING_ATTRIBUTE,
            Self::DuplicateAttribute { .. } => ErrorCode::DUPLICATE_ATTRIBUTE,
            Self::UnexpectedAttribute { .. } => ErrorCode::UNEXPECTED_ATTRIBUTE,
            Self::UnexpectedItem { .. } => ErrorCode::UNEXPECTED_ITEM,
            Self::InvalidAttribute { .. } => ErrorCode::INVALID_ATTRIBUTE,
            Self::MalformedPlan { .. } => ErrorCode::MALFORMED_PLAN,
            Self::UnboundSymbol { .. } => ErrorCode::UNBOUND_SYMBOL,
            Self::NotCallable { .. } => ErrorCode::NOT_CALLABLE,
            Self::Arity { .. } => ErrorCode::ARITY,
            Self::TypeMismatch { .. } => ErrorCode::TYPE_MISMATCH,
            Self::Arithmetic { .. } => ErrorCode::ARITHMETIC,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.code().category()
    }

    /// Source position, for syntax errors.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::MismatchedDelimiter { span, .. }
            | Self::UnexpectedEof { span, .. }
            | Self::IntegerOutOfRange { span, .. } => Some(*span),
            _ => None,
        }
    }

    /// The attribute key (or rendered item) a schema error is about.
    pub fn offending_key(&self) -> Option<&str> {
        match self {
            Self::MissingAttribute { key }
            | Self::DuplicateAttribute { key }
            | Self::UnexpectedAttribute { key }
            | Self::InvalidAttribute { key, .. }
            | Self::MalformedPlan { key, .. } => Some(key),
            Self::UnexpectedItem { item } => Some(item),
            _ => None,
        }
    }
}

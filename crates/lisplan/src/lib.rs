//! lisplan: runs the full pipeline over one program.
//!
//! ```text
//! source → Lexer → Parser → Evaluator → RunOutput
//! ```
//!
//! [`run`] returns the results directly. [`run_to_report`] never fails and
//! wraps everything in a serializable [`RunReport`], for tooling that
//! wants JSON.

use lisplan_eval::Evaluator;
use lisplan_lexer::Lexer;
use lisplan_parser::Parser;
use lisplan_types::{ErrorCategory, LisplanError, Result, SourceFile, Span, Value};
use serde::Serialize;
use std::collections::BTreeMap;

pub use lisplan_eval::EvalConfig;

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    /// Top-level forms as parsed.
    pub forms: Vec<Value>,
    /// One evaluated result per top-level form.
    pub results: Vec<Value>,
    /// Bindings made by the program, excluding the seeded built-ins.
    pub bindings: BTreeMap<String, Value>,
    /// Lines written by `print`.
    pub output: Vec<String>,
}

impl RunOutput {
    /// Result of the first top-level form.
    pub fn first(&self) -> Option<&Value> {
        self.results.first()
    }
}

/// Lex, parse and evaluate `source`.
///
/// `name` only labels log output. Any error aborts the run.
#[tracing::instrument(level = "debug", skip(source, config))]
pub fn run(source: &str, name: &str, config: &EvalConfig) -> Result<RunOutput> {
    let mut evaluator = Evaluator::with_config(config.clone());
    execute(source, &mut evaluator)
}

fn execute(source: &str, evaluator: &mut Evaluator) -> Result<RunOutput> {
    let tokens = Lexer::new(source).lex()?;
    let forms = Parser::new(tokens).parse()?;
    let results = evaluator.eval_all(&forms)?;
    Ok(RunOutput {
        forms,
        results,
        bindings: evaluator.user_bindings(),
        output: evaluator.output.clone(),
    })
}

// ══════════════════════════════════════════════════════════════════════════════
// Report
// ══════════════════════════════════════════════════════════════════════════════

/// Serializable outcome of [`run_to_report`].
///
/// ```json
/// {
///   "success": false,
///   "results": null,
///   "output": ["1"],
///   "error": { "code": "E300", "category": "runtime", "message": "undefined 'x'", ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub success: bool,
    /// Evaluated results, `None` when the run failed.
    pub results: Option<Vec<Value>>,
    pub bindings: BTreeMap<String, Value>,
    /// Lines printed before the run finished or failed.
    pub output: Vec<String>,
    pub error: Option<ErrorReport>,
}

/// One error, flattened for display.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// e.g. `"E100"`.
    pub code: String,
    pub category: ErrorCategory,
    pub message: String,
    pub span: Option<Span>,
    /// The source line the span starts on.
    pub source_line: Option<String>,
    /// Full error payload.
    pub detail: LisplanError,
}

impl ErrorReport {
    pub fn new(error: LisplanError, source: &SourceFile) -> Self {
        let span = error.span();
        Self {
            code: error.code().to_string(),
            category: error.category(),
            message: error.to_string(),
            span,
            source_line: span.and_then(|s| source.line_of(s)).map(str::to_string),
            detail: error,
        }
    }
}

/// Run `source` and describe the outcome. Output printed before an
/// error is kept.
#[tracing::instrument(level = "debug", skip(source, config))]
pub fn run_to_report(source: &str, name: &str, config: &EvalConfig) -> RunReport {
    let mut evaluator = Evaluator::with_config(config.clone());
    match execute(source, &mut evaluator) {
        Ok(out) => RunReport {
            success: true,
            results: Some(out.results),
            bindings: out.bindings,
            output: out.output,
            error: None,
        },
        Err(error) => {
            tracing::debug!(code = %error.code(), "run failed");
            let file = SourceFile::new(name, source);
            RunReport {
                success: false,
                results: None,
                bindings: evaluator.user_bindings(),
                output: evaluator.output,
                error: Some(ErrorReport::new(error, &file)),
            }
        }
    }
}

//! Core expression evaluator.

use crate::env::Environment;
use lisplan_types::{ensure_sufficient_stack, Interpreter, LisplanError, Result, Value};
use std::collections::BTreeMap;

/// Evaluator settings.
#[derive(Debug, Clone, Default)]
pub struct EvalConfig {
    /// Also write `print` output to stdout as it happens.
    pub echo_print: bool,
}

/// The tree-walking evaluator.
///
/// Owns the one [`Environment`] of a run. Built-ins reach it only through
/// the [`Interpreter`] trait, so `let` mutates this same table and the
/// binding is visible to everything evaluated afterwards.
pub struct Evaluator {
    pub env: Environment,
    config: EvalConfig,
    /// Captured `print` output, one entry per call.
    pub output: Vec<String>,
}

impl Evaluator {
    /// Evaluator with the default config and a freshly seeded environment.
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            env: Environment::with_builtins(),
            config,
            output: Vec::new(),
        }
    }

    /// Evaluate top-level forms in order, stopping at the first error.
    #[tracing::instrument(level = "debug", skip_all, fields(forms = forms.len()))]
    pub fn eval_all(&mut self, forms: &[Value]) -> Result<Vec<Value>> {
        forms.iter().map(|form| self.eval(form)).collect()
    }

    /// Bindings introduced beyond the seeded built-ins.
    pub fn user_bindings(&self) -> BTreeMap<String, Value> {
        self.env.user_bindings()
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    fn eval_expr(&mut self, expr: &Value) -> Result<Value> {
        match expr {
            Value::List(items) => match items.split_first() {
                None => Ok(Value::nil()),
                Some((head, args)) => self.apply(head, args),
            },
            Value::Symbol(name) => self.lookup(name),
            Value::Number(_)
            | Value::Bool(_)
            | Value::Builtin(_)
            | Value::Plan(_)
            | Value::Step(_) => Ok(expr.clone()),
        }
    }

    fn lookup(&self, name: &str) -> Result<Value> {
        self.env
            .get(name)
            .cloned()
            .ok_or_else(|| LisplanError::UnboundSymbol {
                name: name.to_string(),
            })
    }

    /// Evaluate the head to a built-in and hand it the unevaluated tail.
    fn apply(&mut self, head: &Value, args: &[Value]) -> Result<Value> {
        match self.eval(head)? {
            Value::Builtin(builtin) => {
                tracing::trace!(builtin = builtin.name, argc = args.len(), "apply");
                builtin.call(self, args)
            }
            other => Err(LisplanError::NotCallable {
                value: other.to_string(),
            }),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter for Evaluator {
    fn eval(&mut self, expr: &Value) -> Result<Value> {
        ensure_sufficient_stack(|| self.eval_expr(expr))
    }

    fn bind(&mut self, name: &str, value: Value) {
        self.env.define(name, value);
    }

    fn emit(&mut self, line: String) {
        if self.config.echo_print {
            println!("{line}");
        }
        self.output.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_is_nil() {
        let mut ev = Evaluator::new();
        assert!(ev.eval(&Value::nil()).unwrap().is_nil());
    }

    #[test]
    fn test_resolved_values_are_idempotent() {
        let mut ev = Evaluator::new();
        for v in [Value::int(3), Value::float(0.5), Value::Bool(false)] {
            assert_eq!(ev.eval(&v).unwrap(), v);
        }
    }

    #[test]
    fn test_unbound_symbol() {
        let mut ev = Evaluator::new();
        let err = ev.eval(&Value::symbol("the-cup")).unwrap_err();
        assert_eq!(
            err,
            LisplanError::UnboundSymbol {
                name: "the-cup".into()
            }
        );
    }

    #[test]
    fn test_non_callable_head() {
        let mut ev = Evaluator::new();
        let err = ev
            .eval(&Value::List(vec![Value::int(1), Value::int(2)]))
            .unwrap_err();
        assert_eq!(err, LisplanError::NotCallable { value: "1".into() });
    }

    #[test]
    fn test_bind_is_visible_to_lookup() {
        let mut ev = Evaluator::new();
        ev.bind("x", Value::int(9));
        assert_eq!(ev.eval(&Value::symbol("x")).unwrap(), Value::int(9));
        assert_eq!(ev.user_bindings().len(), 1);
    }

    #[test]
    fn test_emit_captures_output() {
        let mut ev = Evaluator::new();
        ev.emit("hello".into());
        assert_eq!(ev.output, vec!["hello".to_string()]);
    }
}

//! The universal runtime datum.
//!
//! Parsed programs and evaluation results share one representation: a
//! parsed form is just a [`Value`] that has not been evaluated yet.

use crate::stack::ensure_sufficient_stack;
use crate::{Plan, Result, Step};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// The evaluation interface handed to every built-in.
///
/// Built-ins receive their arguments unevaluated and call back through
/// this trait to decide whether, when, and how often to evaluate them.
pub trait Interpreter {
    /// Evaluate one expression against the shared environment.
    fn eval(&mut self, expr: &Value) -> Result<Value>;

    /// Bind `name` in the shared environment, replacing any previous value.
    fn bind(&mut self, name: &str, value: Value);

    /// Emit one line of program output (`print`).
    fn emit(&mut self, line: String);
}

/// Signature shared by all built-ins.
pub type BuiltinFn = fn(&mut dyn Interpreter, &[Value]) -> Result<Value>;

/// A host-provided callable bound to a symbol in the environment.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl Builtin {
    pub const fn new(name: &'static str, func: BuiltinFn) -> Self {
        Self { name, func }
    }

    /// Apply the built-in to unevaluated argument expressions.
    pub fn call(&self, interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
        (self.func)(interp, args)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Number
// ─────────────────────────────────────────────────────────────────────

/// Integer or floating-point number.
///
/// Mixed arithmetic promotes to `Float`. Equality and ordering compare
/// numerically, so `Int(1) == Float(1.0)`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(x) => x,
        }
    }

    /// `None` on integer overflow.
    pub fn checked_add(self, rhs: Number) -> Option<Number> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_add(b).map(Self::Int),
            (a, b) => Some(Self::Float(a.as_f64() + b.as_f64())),
        }
    }

    /// `None` on integer overflow.
    pub fn checked_sub(self, rhs: Number) -> Option<Number> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_sub(b).map(Self::Int),
            (a, b) => Some(Self::Float(a.as_f64() - b.as_f64())),
        }
    }

    /// `None` on integer overflow.
    pub fn checked_mul(self, rhs: Number) -> Option<Number> {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a.checked_mul(b).map(Self::Int),
            (a, b) => Some(Self::Float(a.as_f64() * b.as_f64())),
        }
    }

    /// True division: always a `Float`. `None` when dividing by zero.
    pub fn checked_div(self, rhs: Number) -> Option<Number> {
        let divisor = rhs.as_f64();
        if divisor == 0.0 {
            None
        } else {
            Some(Self::Float(self.as_f64() / divisor))
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Value
// ─────────────────────────────────────────────────────────────────────

/// Every datum the parser produces or the evaluator returns.
///
/// There is no separate nil variant: nil *is* the empty list, and
/// [`Value::nil`] / [`Value::is_nil`] are the only way to speak about it.
///
/// Lists nest to any depth. `Clone`, `PartialEq`, `Debug`, `Display` and
/// `Serialize` recurse under [`ensure_sufficient_stack`]; `Drop` flattens
/// nested lists into a worklist instead of recursing.
pub enum Value {
    Number(Number),
    Bool(bool),
    /// An unresolved name. Only meaningful before evaluation.
    Symbol(String),
    /// Literal data, or an expression still to be evaluated.
    List(Vec<Value>),
    Builtin(Builtin),
    Plan(Rc<Plan>),
    Step(Rc<Step>),
}

impl Value {
    pub fn nil() -> Self {
        Self::List(Vec::new())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::List(items) if items.is_empty())
    }

    pub fn int(n: i64) -> Self {
        Self::Number(Number::Int(n))
    }

    pub fn float(x: f64) -> Self {
        Self::Number(Number::Float(x))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Nil and `false` are falsy; everything else (including `0`) is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Bool(false)) && !self.is_nil()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(Number::Int(_)) => "int",
            Self::Number(Number::Float(_)) => "float",
            Self::Bool(_) => "bool",
            Self::Symbol(_) => "symbol",
            Self::List(items) if items.is_empty() => "nil",
            Self::List(_) => "list",
            Self::Builtin(_) => "builtin",
            Self::Plan(_) => "plan",
            Self::Step(_) => "step",
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Split a tagged list `[tag value...]` into its symbol tag and tail.
    pub fn as_tagged(&self) -> Option<(&str, &[Value])> {
        let (head, tail) = self.as_list()?.split_first()?;
        Some((head.as_symbol()?, tail))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Plan> for Value {
    fn from(plan: Plan) -> Self {
        Self::Plan(Rc::new(plan))
    }
}

impl From<Step> for Value {
    fn from(step: Step) -> Self {
        Self::Step(Rc::new(step))
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Self::Number(n) => Self::Number(*n),
            Self::Bool(b) => Self::Bool(*b),
            Self::Symbol(name) => Self::Symbol(name.clone()),
            Self::List(items) => Self::List(ensure_sufficient_stack(|| items.clone())),
            Self::Builtin(b) => Self::Builtin(*b),
            Self::Plan(plan) => Self::Plan(Rc::clone(plan)),
            Self::Step(step) => Self::Step(Rc::clone(step)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::List(a), Self::List(b)) => ensure_sufficient_stack(|| a == b),
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Plan(a), Self::Plan(b)) => a == b,
            (Self::Step(a), Self::Step(b)) => a == b,
            _ => false,
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        let Self::List(items) = self else {
            return;
        };
        if !items.iter().any(|item| matches!(item, Self::List(inner) if !inner.is_empty())) {
            return;
        }
        let mut pending = std::mem::take(items);
        while let Some(mut item) = pending.pop() {
            if let Self::List(children) = &mut item {
                pending.append(children);
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Symbol(name) => f.debug_tuple("Symbol").field(name).finish(),
            Self::List(items) => {
                ensure_sufficient_stack(|| f.debug_tuple("List").field(items).finish())
            }
            Self::Builtin(b) => f.debug_tuple("Builtin").field(b).finish(),
            Self::Plan(plan) => f.debug_tuple("Plan").field(plan).finish(),
            Self::Step(step) => f.debug_tuple("Step").field(step).finish(),
        }
    }
}

/// Writes `(a b c)`. Parsed forms print back into text that re-parses to
/// an equal structure.
fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Symbol(name) => write!(f, "{name}"),
            Self::List(items) => ensure_sufficient_stack(|| write_list(f, items)),
            Self::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Self::Plan(plan) => write!(f, "{plan}"),
            Self::Step(step) => write!(f, "{step}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Number(Number::Int(n)) => serializer.serialize_i64(*n),
            Self::Number(Number::Float(x)) => serializer.serialize_f64(*x),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Symbol(name) => serializer.serialize_str(name),
            Self::List(items) => ensure_sufficient_stack(move || {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }),
            Self::Builtin(b) => serializer.collect_str(&format_args!("<builtin {}>", b.name)),
            Self::Plan(plan) => plan.serialize(serializer),
            Self::Step(step) => step.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_is_empty_list() {
        assert_eq!(Value::nil(), Value::List(vec![]));
        assert!(Value::List(vec![]).is_nil());
        assert!(!Value::List(vec![Value::int(1)]).is_nil());
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::nil().is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::int(0).is_truthy());
        assert!(Value::symbol("x").is_truthy());
        assert!(Value::List(vec![Value::nil()]).is_truthy());
    }

    #[test]
    fn test_number_promotion() {
        let sum = Number::Int(2).checked_add(Number::Float(0.5)).unwrap();
        assert!(matches!(sum, Number::Float(x) if x == 2.5));
        let product = Number::Int(6).checked_mul(Number::Int(7)).unwrap();
        assert!(matches!(product, Number::Int(42)));
        assert!(Number::Int(i64::MAX).checked_add(Number::Int(1)).is_none());
    }

    #[test]
    fn test_true_division() {
        let q = Number::Int(1).checked_div(Number::Int(2)).unwrap();
        assert!(matches!(q, Number::Float(x) if x == 0.5));
        assert!(Number::Int(1).checked_div(Number::Float(0.0)).is_none());
    }

    #[test]
    fn test_numeric_equality_and_order() {
        assert_eq!(Number::Int(1), Number::Float(1.0));
        assert!(Number::Int(1) < Number::Float(1.5));
        assert_eq!(Value::int(3), Value::float(3.0));
        assert_ne!(Value::int(1), Value::Bool(true));
    }

    #[test]
    fn test_display() {
        let form = Value::List(vec![
            Value::symbol("+"),
            Value::int(-1),
            Value::List(vec![Value::symbol("f"), Value::nil()]),
        ]);
        assert_eq!(form.to_string(), "(+ -1 (f ()))");
        assert_eq!(Value::float(3.0).to_string(), "3.0");
        assert_eq!(Value::float(0.25).to_string(), "0.25");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }

    fn nested(depth: usize) -> Value {
        let mut value = Value::int(1);
        for _ in 0..depth {
            value = Value::List(vec![value]);
        }
        value
    }

    #[test]
    fn test_deep_list_clone_compare_and_drop() {
        let deep = nested(100_000);
        let copy = deep.clone();
        assert_eq!(deep, copy);
        assert_ne!(deep, nested(99_999));
        drop(copy);
        drop(deep);
    }

    #[test]
    fn test_deep_list_display_and_serialize() {
        let deep = nested(100_000);
        let text = deep.to_string();
        assert_eq!(text.len(), 200_001);
        assert!(text.starts_with("((") && text.ends_with("1))"));
        let json = serde_json::to_string(&deep).unwrap();
        assert_eq!(json.len(), 200_001);
        assert!(format!("{deep:?}").starts_with("List([List(["));
    }

    #[test]
    fn test_drop_keeps_siblings_intact() {
        let shared = Rc::new(Plan::default());
        let value = Value::List(vec![
            Value::List(vec![Value::Plan(Rc::clone(&shared)), Value::nil()]),
            Value::symbol("x"),
        ]);
        assert_eq!(Rc::strong_count(&shared), 2);
        drop(value);
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    fn test_as_tagged() {
        let item = Value::List(vec![Value::symbol("active"), Value::symbol("false")]);
        let (tag, tail) = item.as_tagged().unwrap();
        assert_eq!(tag, "active");
        assert_eq!(tail, &[Value::symbol("false")]);
        assert!(Value::List(vec![Value::int(1)]).as_tagged().is_none());
        assert!(Value::nil().as_tagged().is_none());
    }
}

//! The built-in operations seeded into every environment.
//!
//! Each built-in receives its arguments unevaluated, plus the interpreter
//! to evaluate them with. Everything except `cond`, `let` and `plan`
//! evaluates all of its arguments up front, left to right.

use crate::plan::build_plan;
use lisplan_types::{Builtin, Interpreter, LisplanError, Number, Result, Value};
use std::cmp::Ordering;

/// Every built-in callable, in the order they are seeded.
pub const BUILTINS: &[Builtin] = &[
    Builtin::new("+", add),
    Builtin::new("-", sub),
    Builtin::new("×", mul),
    Builtin::new("/", div),
    Builtin::new("¬", not),
    Builtin::new("∧", and),
    Builtin::new("∨", or),
    Builtin::new("=", eq),
    Builtin::new("≠", ne),
    Builtin::new("<", lt),
    Builtin::new(">", gt),
    Builtin::new("≤", le),
    Builtin::new("≥", ge),
    Builtin::new("√", sqrt),
    Builtin::new("print", print),
    Builtin::new("cond", cond),
    Builtin::new("let", let_),
    Builtin::new("list", list),
    Builtin::new("plan", plan),
];

/// Non-callable names seeded alongside [`BUILTINS`].
pub const CONSTANT_NAMES: &[&str] = &["true", "false", "nil"];

// ── Argument helpers ──────────────────────────────────────────────────────

fn eval_args(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Vec<Value>> {
    args.iter().map(|arg| interp.eval(arg)).collect()
}

fn expect_arity(
    builtin: &'static str,
    args: &[Value],
    n: usize,
    expected: &'static str,
) -> Result<()> {
    if args.len() == n {
        Ok(())
    } else {
        Err(LisplanError::Arity {
            builtin,
            expected,
            found: args.len(),
        })
    }
}

fn expect_some(builtin: &'static str, args: &[Value]) -> Result<()> {
    if args.is_empty() {
        Err(LisplanError::Arity {
            builtin,
            expected: "at least 1",
            found: 0,
        })
    } else {
        Ok(())
    }
}

fn expect_number(builtin: &'static str, value: &Value) -> Result<Number> {
    value.as_number().ok_or_else(|| LisplanError::TypeMismatch {
        builtin,
        expected: "a number",
        found: value.to_string(),
    })
}

// ── Arithmetic ────────────────────────────────────────────────────────────

/// Left fold over at least one evaluated number.
fn fold_numbers(
    builtin: &'static str,
    interp: &mut dyn Interpreter,
    args: &[Value],
    op: fn(Number, Number) -> Option<Number>,
    failure: &'static str,
) -> Result<Value> {
    expect_some(builtin, args)?;
    let values = eval_args(interp, args)?;
    let mut acc = expect_number(builtin, &values[0])?;
    for value in &values[1..] {
        let rhs = expect_number(builtin, value)?;
        acc = op(acc, rhs).ok_or_else(|| LisplanError::Arithmetic {
            builtin,
            message: failure.to_string(),
        })?;
    }
    Ok(Value::Number(acc))
}

fn add(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    fold_numbers("+", interp, args, Number::checked_add, "integer overflow")
}

fn sub(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    fold_numbers("-", interp, args, Number::checked_sub, "integer overflow")
}

fn mul(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    fold_numbers("×", interp, args, Number::checked_mul, "integer overflow")
}

fn div(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    fold_numbers("/", interp, args, Number::checked_div, "division by zero")
}

fn sqrt(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    expect_arity("√", args, 1, "1")?;
    let n = expect_number("√", &interp.eval(&args[0])?)?.as_f64();
    if n < 0.0 {
        return Err(LisplanError::Arithmetic {
            builtin: "√",
            message: "math domain error".to_string(),
        });
    }
    Ok(Value::float(n.sqrt()))
}

// ── Logic ─────────────────────────────────────────────────────────────────

fn not(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    expect_arity("¬", args, 1, "1")?;
    Ok(Value::Bool(!interp.eval(&args[0])?.is_truthy()))
}

/// No short circuit: every argument is evaluated before folding.
fn and(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    expect_some("∧", args)?;
    let values = eval_args(interp, args)?;
    Ok(Value::Bool(values.iter().all(Value::is_truthy)))
}

fn or(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    expect_some("∨", args)?;
    let values = eval_args(interp, args)?;
    Ok(Value::Bool(values.iter().any(Value::is_truthy)))
}

// ── Comparison ────────────────────────────────────────────────────────────

/// Holds when `holds` is true for every consecutive pair of evaluated
/// arguments: `(< a b c)` means `a < b` and `b < c`.
fn chain(
    interp: &mut dyn Interpreter,
    args: &[Value],
    holds: impl Fn(&Value, &Value) -> Result<bool>,
) -> Result<Value> {
    let values = eval_args(interp, args)?;
    for pair in values.windows(2) {
        if !holds(&pair[0], &pair[1])? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn ordering(builtin: &'static str, l: &Value, r: &Value) -> Result<Option<Ordering>> {
    let (l, r) = (expect_number(builtin, l)?, expect_number(builtin, r)?);
    Ok(l.partial_cmp(&r))
}

fn eq(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    chain(interp, args, |l, r| Ok(l == r))
}

fn ne(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    chain(interp, args, |l, r| Ok(l != r))
}

fn lt(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    chain(interp, args, |l, r| Ok(ordering("<", l, r)? == Some(Ordering::Less)))
}

fn gt(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    chain(interp, args, |l, r| Ok(ordering(">", l, r)? == Some(Ordering::Greater)))
}

fn le(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    chain(interp, args, |l, r| {
        Ok(matches!(ordering("≤", l, r)?, Some(Ordering::Less | Ordering::Equal)))
    })
}

fn ge(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    chain(interp, args, |l, r| {
        Ok(matches!(ordering("≥", l, r)?, Some(Ordering::Greater | Ordering::Equal)))
    })
}

// ── Effects, control & data ───────────────────────────────────────────────

fn print(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    let line = eval_args(interp, args)?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    interp.emit(line);
    Ok(Value::nil())
}

/// `(cond [pred body...] ...)`: the first clause whose predicate is truthy
/// yields the list of its evaluated body forms. Later clauses are not
/// touched. No match yields nil.
fn cond(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    for clause in args {
        let Some((predicate, body)) = clause.as_list().and_then(<[Value]>::split_first) else {
            return Err(LisplanError::TypeMismatch {
                builtin: "cond",
                expected: "a [predicate body...] clause",
                found: clause.to_string(),
            });
        };
        if interp.eval(predicate)?.is_truthy() {
            return eval_args(interp, body).map(Value::List);
        }
    }
    Ok(Value::nil())
}

/// `(let name expr)`: binds in the shared environment and yields nil.
fn let_(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    expect_arity("let", args, 2, "2")?;
    let name = args[0].as_symbol().ok_or_else(|| LisplanError::TypeMismatch {
        builtin: "let",
        expected: "a symbol to bind",
        found: args[0].to_string(),
    })?;
    let value = interp.eval(&args[1])?;
    tracing::debug!(name, value = %value, "let");
    interp.bind(name, value);
    Ok(Value::nil())
}

fn list(interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    eval_args(interp, args).map(Value::List)
}

/// Arguments are passed through unevaluated.
fn plan(_interp: &mut dyn Interpreter, args: &[Value]) -> Result<Value> {
    build_plan(args).map(Value::from)
}

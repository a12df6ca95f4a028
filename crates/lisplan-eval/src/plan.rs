//! Builds [`Plan`]/[`Step`] values from the unevaluated arguments of a
//! `plan` form.
//!
//! ```text
//! {plan
//!     {objects   [the-cup (new Cup)]}
//!     [relations (contains the-kitchen the-cup)]
//!     [steps     {GRAB [active false] [what the-cup]}]}
//! ```
//!
//! Only the scaffolding is built here. Object definitions, relations and
//! step attributes stay unevaluated, since they may mention symbols that
//! are not bound yet (`[where nil]` pending refinement).

use crate::schema::{validate_lenient, validate_strict, AttrFlags, AttrValue, Attributes, Schema};
use lisplan_types::{LisplanError, Plan, Result, Step, Value};
use std::collections::BTreeMap;

fn plan_schema() -> Schema {
    Schema::new()
        .field("objects", AttrFlags::OPTIONAL)
        .field("relations", AttrFlags::OPTIONAL)
        .field("steps", AttrFlags::OPTIONAL)
}

fn step_schema() -> Schema {
    Schema::new().field("active", AttrFlags::OPTIONAL)
}

/// Build a plan from the argument list of a `plan` form.
///
/// Any validation failure is reported as [`LisplanError::MalformedPlan`],
/// naming the form being built and the offending key.
pub fn build_plan(args: &[Value]) -> Result<Plan> {
    let attrs = validate_strict(&plan_schema(), args).map_err(|e| malformed("plan", e))?;

    let objects = pairs_to_map(attrs.single("objects")).map_err(|e| malformed("objects", e))?;
    let relations =
        build_relations(attrs.single("relations")).map_err(|e| malformed("relations", e))?;
    let steps = attrs
        .single("steps")
        .iter()
        .map(build_step)
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        objects = objects.len(),
        relations = relations.len(),
        steps = steps.len(),
        "built plan"
    );
    Ok(Plan::new(objects, relations, steps))
}

/// Build one step from `{NAME [active ...] [key value]...}`.
pub fn build_step(item: &Value) -> Result<Step> {
    let (name, body) = item.as_tagged().ok_or_else(|| {
        malformed(
            "steps",
            LisplanError::UnexpectedItem {
                item: item.to_string(),
            },
        )
    })?;
    let form = format!("step {name}");

    let (attrs, rest) = validate_lenient(&step_schema(), body).map_err(|e| malformed(&form, e))?;
    let active = parse_active(&attrs).map_err(|e| malformed(&form, e))?;
    let free = pairs_to_map(&rest).map_err(|e| malformed(&form, e))?;

    Ok(Step::new(name, active, free))
}

/// Wrap a validation error, keeping the offending key visible.
fn malformed(form: &str, source: LisplanError) -> LisplanError {
    let key = source.offending_key().unwrap_or(form).to_string();
    LisplanError::MalformedPlan {
        form: form.to_string(),
        key,
        source: Box::new(source),
    }
}

/// `active` accepts one boolean-ish value; absent or empty means `false`.
fn parse_active(attrs: &Attributes) -> Result<bool> {
    let tail = match attrs.get("active") {
        Some(AttrValue::Single(tail)) => tail,
        _ => return Ok(false),
    };
    let invalid = |reason: String| LisplanError::InvalidAttribute {
        key: "active".to_string(),
        reason,
    };
    let value = match tail.as_slice() {
        [] => return Ok(false),
        [value] => value,
        _ => return Err(invalid(format!("expected one value, found {}", tail.len()))),
    };
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Symbol(s) if s == "true" || s == "True" => Ok(true),
        Value::Symbol(s) if s == "false" || s == "False" || s == "nil" => Ok(false),
        v if v.is_nil() => Ok(false),
        other => Err(invalid(format!("expected a boolean, found '{other}'"))),
    }
}

/// Collect `[name value]` entries into a map of unevaluated values.
///
/// A name given more than once keeps its last value.
fn pairs_to_map(entries: &[Value]) -> Result<BTreeMap<String, Value>> {
    let mut map = BTreeMap::new();
    for entry in entries {
        let (key, tail) = entry.as_tagged().ok_or_else(|| LisplanError::UnexpectedItem {
            item: entry.to_string(),
        })?;
        let [value] = tail else {
            return Err(LisplanError::InvalidAttribute {
                key: key.to_string(),
                reason: format!("expected one value, found {}", tail.len()),
            });
        };
        map.insert(key.to_string(), value.clone());
    }
    Ok(map)
}

/// Every relation must be a list headed by the relation's name.
fn build_relations(entries: &[Value]) -> Result<Vec<Value>> {
    entries
        .iter()
        .map(|entry| match entry.as_tagged() {
            Some(_) => Ok(entry.clone()),
            None => Err(LisplanError::UnexpectedItem {
                item: entry.to_string(),
            }),
        })
        .collect()
}

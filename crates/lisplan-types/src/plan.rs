//! Plan and Step domain objects.
//!
//! Both are immutable once built. Refining a plan (filling in an unknown
//! `where`, activating a step) means building a new `Plan`.

use crate::Value;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One planning action, e.g. `{GRAB [active false] [what the-cup]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    /// The tag the step was declared under (usually a verb).
    pub name: String,
    pub active: bool,
    /// Free-form attributes, kept as unevaluated expressions.
    pub attrs: BTreeMap<String, Value>,
}

impl Step {
    pub fn new(name: impl Into<String>, active: bool, attrs: BTreeMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            active,
            attrs,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} (active {})", self.name, self.active)?;
        for (key, value) in &self.attrs {
            write!(f, " ({key} {value})")?;
        }
        write!(f, ")")
    }
}

/// Declared objects, the relations between them, and the ordered steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plan {
    /// Object name → defining expression (unevaluated).
    pub objects: BTreeMap<String, Value>,
    /// Relation expressions, each a list headed by the relation name.
    pub relations: Vec<Value>,
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(objects: BTreeMap<String, Value>, relations: Vec<Value>, steps: Vec<Step>) -> Self {
        Self {
            objects,
            relations,
            steps,
        }
    }

    /// Steps currently flagged active, in plan order.
    pub fn active_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|step| step.active)
    }
}

/// Prints as a `plan` form that evaluates back to an equal plan.
impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(plan (objects")?;
        for (name, value) in &self.objects {
            write!(f, " ({name} {value})")?;
        }
        write!(f, ") (relations")?;
        for relation in &self.relations {
            write!(f, " {relation}")?;
        }
        write!(f, ") (steps")?;
        for step in &self.steps {
            write!(f, " {step}")?;
        }
        write!(f, "))")
    }
}

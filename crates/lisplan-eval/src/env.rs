//! The flat, mutable evaluation environment.

use crate::builtins::{BUILTINS, CONSTANT_NAMES};
use lisplan_types::Value;
use std::collections::BTreeMap;

/// One symbol table for the whole run.
///
/// There is no nesting and no shadowing: a binding made anywhere (by
/// `let`) replaces the previous value and is visible to every later
/// lookup until the environment is dropped at the end of the run.
#[derive(Debug, Clone)]
pub struct Environment {
    bindings: BTreeMap<String, Value>,
}

impl Environment {
    /// An environment with nothing bound, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// An environment seeded with every built-in plus `true`, `false`, `nil`.
    pub fn with_builtins() -> Self {
        let mut env = Self::empty();
        for builtin in BUILTINS {
            env.define(builtin.name, Value::Builtin(*builtin));
        }
        env.define("true", Value::Bool(true));
        env.define("false", Value::Bool(false));
        env.define("nil", Value::nil());
        env
    }

    /// Bind `name`, replacing any previous value.
    pub fn define(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Snapshot of every binding whose name is not a built-in name.
    ///
    /// Rebinding a built-in name (`(let + 5)`) does not show up here.
    pub fn user_bindings(&self) -> BTreeMap<String, Value> {
        self.bindings
            .iter()
            .filter(|(name, _)| !is_builtin_name(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Names the environment is seeded with.
pub fn is_builtin_name(name: &str) -> bool {
    BUILTINS.iter().any(|b| b.name == name) || CONSTANT_NAMES.contains(&name)
}

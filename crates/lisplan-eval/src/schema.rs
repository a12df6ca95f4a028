//! Declarative attribute schemas for tagged sub-lists.
//!
//! A schema names the tags a form accepts and, per tag, whether it may be
//! absent ([`AttrFlags::OPTIONAL`]) and whether it may repeat
//! ([`AttrFlags::MULTI`]). [`validate`] files each `[tag value...]` item
//! under its tag and checks those cardinality rules.

use bitflags::bitflags;
use lisplan_types::{LisplanError, Result, Value};
use std::collections::BTreeMap;

bitflags! {
    /// Cardinality rules for one schema key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttrFlags: u8 {
        /// The key may be absent entirely.
        const OPTIONAL = 1 << 0;
        /// The key may occur more than once.
        const MULTI = 1 << 1;
    }
}

/// Ordered set of accepted keys. Checks run in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(&'static str, AttrFlags)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: accept `key` with the given flags.
    pub fn field(mut self, key: &'static str, flags: AttrFlags) -> Self {
        self.fields.push((key, flags));
        self
    }

    /// Look up `key`, returning the schema's own `'static` spelling.
    fn lookup(&self, key: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(name, _)| *name)
    }
}

/// Whether unrecognized items are an error or routed to overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Strict,
    Lenient,
}

/// The collected value of one schema key.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// An optional singleton key that did not occur.
    Absent,
    /// The value tail of a singleton key's one occurrence.
    Single(Vec<Value>),
    /// Every occurrence's value tail, in input order.
    Multi(Vec<Vec<Value>>),
}

/// Validated attributes, keyed by schema key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: BTreeMap<&'static str, AttrValue>,
}

impl Attributes {
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.values.get(key)
    }

    /// Value tail of a singleton key; empty when absent.
    pub fn single(&self, key: &str) -> &[Value] {
        match self.values.get(key) {
            Some(AttrValue::Single(tail)) => tail,
            _ => &[],
        }
    }

    /// All value tails of a multi key; empty when absent.
    pub fn multi(&self, key: &str) -> &[Vec<Value>] {
        match self.values.get(key) {
            Some(AttrValue::Multi(tails)) => tails,
            _ => &[],
        }
    }

    pub fn is_present(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(AttrValue::Single(_)) => true,
            Some(AttrValue::Multi(tails)) => !tails.is_empty(),
            Some(AttrValue::Absent) | None => false,
        }
    }
}

/// Output of [`validate`]. `overflow` is always empty in strict mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated {
    pub attributes: Attributes,
    pub overflow: Vec<Value>,
}

/// Partition `items` into schema attributes and overflow, enforcing the
/// schema's cardinality rules.
///
/// Routing errors (strict mode) are reported first, in input order; then
/// missing/duplicate checks run in schema order.
pub fn validate(schema: &Schema, items: &[Value], mode: Mode) -> Result<Validated> {
    let mut collected: BTreeMap<&'static str, Vec<Vec<Value>>> = BTreeMap::new();
    let mut overflow = Vec::new();

    for item in items {
        match item.as_tagged() {
            Some((tag, tail)) => match schema.lookup(tag) {
                Some(key) => collected.entry(key).or_default().push(tail.to_vec()),
                None if mode == Mode::Strict => {
                    return Err(LisplanError::UnexpectedAttribute {
                        key: tag.to_string(),
                    })
                }
                None => overflow.push(item.clone()),
            },
            None if mode == Mode::Strict => {
                return Err(LisplanError::UnexpectedItem {
                    item: item.to_string(),
                })
            }
            None => overflow.push(item.clone()),
        }
    }

    let mut attributes = Attributes::default();
    for &(key, flags) in &schema.fields {
        let mut occurrences = collected.remove(key).unwrap_or_default();
        if occurrences.is_empty() && !flags.contains(AttrFlags::OPTIONAL) {
            return Err(LisplanError::MissingAttribute {
                key: key.to_string(),
            });
        }
        if occurrences.len() > 1 && !flags.contains(AttrFlags::MULTI) {
            return Err(LisplanError::DuplicateAttribute {
                key: key.to_string(),
            });
        }
        let value = if flags.contains(AttrFlags::MULTI) {
            AttrValue::Multi(occurrences)
        } else {
            occurrences.pop().map_or(AttrValue::Absent, AttrValue::Single)
        };
        attributes.values.insert(key, value);
    }

    Ok(Validated {
        attributes,
        overflow,
    })
}

/// Strict validation: every item must be a recognized tagged list.
pub fn validate_strict(schema: &Schema, items: &[Value]) -> Result<Attributes> {
    validate(schema, items, Mode::Strict).map(|v| v.attributes)
}

/// Lenient validation: unrecognized items are returned as overflow.
pub fn validate_lenient(schema: &Schema, items: &[Value]) -> Result<(Attributes, Vec<Value>)> {
    validate(schema, items, Mode::Lenient).map(|v| (v.attributes, v.overflow))
}

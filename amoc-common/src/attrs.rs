//! Attribute data model
//!
//! Global and variable attributes are carried as ordered bags of key/value
//! pairs. Insertion order is significant: it decides which write is seen
//! first during consolidation, so every bag is an `IndexMap`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Ordered attribute mapping (keys unique, insertion order preserved)
pub type AttributeBag = IndexMap<String, AttributeValue>;

/// A single attribute value
///
/// Matches what NetCDF-style global attributes and the YAML metadata files
/// can hold: a string, a number, a flag, or a list of any of those
/// (`valid_range: [-50, 50]`). `Null` only exists while loading; see
/// `drop_null_attrs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    List(Vec<AttributeValue>),
    Null,
}

impl AttributeValue {
    /// String form used for every string operation (length comparison, splitting)
    ///
    /// Lists are joined with `", "`. Whole floats keep their `.0`.
    pub fn render(&self) -> String {
        match self {
            AttributeValue::Text(s) => s.clone(),
            AttributeValue::Bool(b) => b.to_string(),
            AttributeValue::Integer(i) => i.to_string(),
            AttributeValue::Float(f) => format!("{:?}", f),
            AttributeValue::List(items) => items
                .iter()
                .map(AttributeValue::render)
                .collect::<Vec<_>>()
                .join(", "),
            AttributeValue::Null => String::new(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Length of the rendered form, in characters
    pub fn rendered_len(&self) -> usize {
        self.render().chars().count()
    }

    /// Borrow the text if this is a `Text` value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(items: Vec<String>) -> Self {
        AttributeValue::List(items.into_iter().map(AttributeValue::Text).collect())
    }
}

/// Remove null-valued entries, logging each one
///
/// An empty YAML key (`comment:`) or a JSON `null` carries no value to
/// write. Returns how many entries were dropped.
pub fn drop_null_attrs(bag: &mut AttributeBag, context: &str) -> usize {
    let before = bag.len();
    bag.retain(|key, value| {
        if value.is_null() {
            warn!(context, key = %key, "Dropped attribute with null value");
            false
        } else {
            true
        }
    });
    before - bag.len()
}

/// Split a multi-valued attribute on `,` and `;`
///
/// Segments are trimmed and empty segments dropped. List values are split
/// element by element and flattened, so `["a, b", "c"]` yields `a`, `b`, `c`.
pub fn split_multi(value: &AttributeValue) -> Vec<String> {
    match value {
        AttributeValue::List(items) => items.iter().flat_map(split_multi).collect(),
        other => split_str(&other.render()),
    }
}

fn split_str(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

//! Style values and the per-pass accumulator.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::property::CssProperty;

/// Format a number the way it is written into CSS text.
pub fn format_number(value: f64) -> String {
    // -0 prints as "-0"
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// A computed style value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, StyleValue::Text(text) if text.is_empty())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(text) => Some(text),
            StyleValue::Number(_) => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => f.write_str(&format_number(*n)),
            StyleValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<&str> for StyleValue {
    fn from(text: &str) -> Self {
        StyleValue::Text(text.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(text: String) -> Self {
        StyleValue::Text(text)
    }
}

/// Composed style for one pass, keyed by camelCase style name.
///
/// Compared by value between passes to decide whether anything changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSnapshot(BTreeMap<String, StyleValue>);

impl StyleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as `kebab-case: value;` declarations, skipping empty values.
    pub fn to_css(&self) -> String {
        self.iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{}: {};", kebab_case(key), value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromIterator<(String, StyleValue)> for StyleSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, StyleValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StyleSnapshot {
    type Item = (&'a String, &'a StyleValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, StyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Convert a camelCase style name to its CSS spelling.
///
/// A leading `webkit` becomes the `-webkit-` vendor prefix.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    if name.starts_with("webkit") {
        out.push('-');
    }
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Property values gathered during one evaluation pass.
///
/// Each property is written at most once; the first write wins. Properties
/// whose interpolation failed are claimed too, so a lower-precedence segment
/// cannot fill them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleAccumulator {
    values: BTreeMap<CssProperty, StyleValue>,
    failed: BTreeSet<CssProperty>,
}

impl StyleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `property` already has a value or failed this pass.
    pub fn is_claimed(&self, property: &CssProperty) -> bool {
        self.values.contains_key(property) || self.failed.contains(property)
    }

    /// Record a value unless the property is already claimed.
    ///
    /// Returns whether the value was stored.
    pub fn insert(&mut self, property: CssProperty, value: StyleValue) -> bool {
        if self.is_claimed(&property) {
            return false;
        }
        self.values.insert(property, value);
        true
    }

    /// Claim `property` without a value.
    pub fn mark_failed(&mut self, property: CssProperty) {
        if !self.values.contains_key(&property) {
            self.failed.insert(property);
        }
    }

    /// Fill failed properties with the values they had in `previous`.
    pub fn inherit_failed(&mut self, previous: &StyleAccumulator) {
        for property in &self.failed {
            if let Some(value) = previous.values.get(property) {
                self.values.insert(property.clone(), value.clone());
            }
        }
    }

    pub fn get(&self, property: &CssProperty) -> Option<&StyleValue> {
        self.values.get(property)
    }

    /// Values in canonical property order.
    pub fn iter(&self) -> impl Iterator<Item = (&CssProperty, &StyleValue)> {
        self.values.iter()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CssProperty> {
        self.failed.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

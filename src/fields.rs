//! Ordered field-path → value mapping exchanged with the service's forms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of one form field: a plain string, or a small ordered list for
/// selector-style controls (selects, checkbox groups).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    List(Vec<String>),
}

impl FieldValue {
    /// All values in the order they are submitted.
    pub fn values(&self) -> Vec<String> {
        match self {
            FieldValue::Single(value) => vec![value.clone()],
            FieldValue::List(values) => values.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Single(value) => write!(f, "{value}"),
            FieldValue::List(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

/// Ordered mapping from dotted field path to value.
///
/// Insertion order is preserved and is the order fields go on the wire.
/// Inserting an existing path replaces its value in place. Repeated keys
/// (e.g. `add-to-merge` for every merge candidate) are expressed with
/// [`FieldValue::List`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    entries: Vec<(String, FieldValue)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<FieldValue>) {
        let path = path.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == path) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((path, value)),
        }
    }

    pub fn get(&self, path: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(path, value)| (path.as_str(), value))
    }

    /// Flatten into `(name, value)` pairs, expanding list values.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(path, value)| {
                value
                    .values()
                    .into_iter()
                    .map(move |v| (path.clone(), v))
            })
            .collect()
    }

    /// Encode as an `application/x-www-form-urlencoded` body.
    pub fn to_urlencoded(&self) -> String {
        encode_pairs(&self.pairs())
    }
}

/// Url-encode name/value pairs, keeping their order.
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

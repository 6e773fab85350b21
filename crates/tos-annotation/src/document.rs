//! Shared tree documents
//!
//! A tree document is an arbitrary JSON object owned by the remote store.
//! This layer only interprets its `stars` field: a sparse map from encoded
//! article label to boolean. Everything else passes through untouched.

use crate::error::PathError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use tos_content::StarKey;

/// Name of the annotation field inside a tree document
pub const STARS_FIELD: &str = "stars";

/// Slash-separated address of a document in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Validate and wrap a path such as `trees/8fJ2k`
    ///
    /// # Errors
    /// Returns error for an empty path or an empty segment
    pub fn new(path: impl Into<String>) -> Result<Self, PathError> {
        let path = path.into();
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if path.split('/').any(str::is_empty) {
            return Err(PathError::EmptySegment(path));
        }
        Ok(Self(path))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocumentPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentPath> for String {
    fn from(path: DocumentPath) -> Self {
        path.0
    }
}

/// Sparse star annotations keyed by encoded label
///
/// A missing key means "not starred".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarMap(BTreeMap<String, bool>);

impl StarMap {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Star state for `key`; absent keys read as `false`
    #[inline]
    #[must_use]
    pub fn is_starred(&self, key: &StarKey) -> bool {
        self.0.get(key.as_str()).copied().unwrap_or(false)
    }

    /// Record an explicit state for `key`
    pub fn set(&mut self, key: &StarKey, starred: bool) {
        self.0.insert(key.as_str().to_string(), starred);
    }

    /// Whether `key` has an explicit entry (true or false)
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &StarKey) -> bool {
        self.0.contains_key(key.as_str())
    }

    /// Number of explicit entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Explicit entries in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, bool> {
        self.0.iter()
    }

    /// Keys currently starred
    pub fn starred(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, starred)| **starred)
            .map(|(key, _)| key.as_str())
    }
}

impl<'a> IntoIterator for &'a StarMap {
    type Item = (&'a String, &'a bool);
    type IntoIter = btree_map::Iter<'a, String, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(StarKey, bool)> for StarMap {
    fn from_iter<I: IntoIterator<Item = (StarKey, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, starred)| (key.into(), starred)).collect())
    }
}

/// A tree document as stored remotely
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeDocument(Map<String, Value>);

impl TreeDocument {
    /// Empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; only objects are documents
    ///
    /// # Errors
    /// Returns the value back when it is not a JSON object
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }

    /// Set a top-level field (builder form)
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[inline]
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Star annotations in this document
    ///
    /// A missing or non-object `stars` field reads as the empty map.
    /// Non-boolean entries read as `false`.
    #[must_use]
    pub fn stars(&self) -> StarMap {
        match self.0.get(STARS_FIELD) {
            Some(Value::Object(entries)) => StarMap(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.as_bool().unwrap_or(false)))
                    .collect(),
            ),
            _ => StarMap::new(),
        }
    }

    /// Copy of this document with only `stars.<key>` replaced
    ///
    /// Every other field and every other star entry is carried over as is.
    #[must_use]
    pub fn with_star(&self, key: &StarKey, starred: bool) -> Self {
        let mut fields = self.0.clone();
        let stars = fields
            .entry(STARS_FIELD)
            .or_insert_with(|| Value::Object(Map::new()));
        if !stars.is_object() {
            *stars = Value::Object(Map::new());
        }
        if let Value::Object(entries) = stars {
            entries.insert(key.as_str().to_string(), Value::Bool(starred));
        }
        Self(fields)
    }
}

impl From<Map<String, Value>> for TreeDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

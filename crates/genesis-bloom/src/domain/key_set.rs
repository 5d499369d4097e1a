//! Deduplicated key set with a canonical iteration order

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of key strings, iterated in lexicographic byte order
///
/// The order does not change which bits a build sets, but it fixes the
/// order of probes and of anything logged about them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeySet {
    keys: BTreeSet<String>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key; returns false if it was already present
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in canonical order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    pub fn is_superset(&self, other: &KeySet) -> bool {
        self.keys.is_superset(&other.keys)
    }
}

impl<S: Into<String>> FromIterator<S> for KeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for KeySet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.keys.extend(iter.into_iter().map(Into::into));
    }
}

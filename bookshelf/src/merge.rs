//! Author identity merging.
//!
//! Keys naming the same people are collapsed: two keys are the same author
//! group when the sets of surnames they contain are equal, regardless of name
//! order or how the given names are spelled ("Иван Петров" and "И. Петров").

use std::collections::BTreeSet;

use crate::naming::{key_names, surname};
use crate::registry::{BookSet, Registry};

/// Registry whose keys have pairwise distinct surname sets.
///
/// Only [`merge`] creates one, and it is read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedRegistry {
    entries: Vec<(String, BookSet)>,
}

impl MergedRegistry {
    /// Entries in merge order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BookSet)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in merge order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Books filed under `key`.
    pub fn get(&self, key: &str) -> Option<&BookSet> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of author groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no author groups.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of books.
    pub fn book_count(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).sum()
    }
}

/// Surnames of every name in `key`.
pub fn surnames(key: &str) -> BTreeSet<&str> {
    key_names(key).map(surname).collect()
}

/// Collapse keys with equal surname sets.
///
/// Repeatedly takes the earliest remaining key, folds every later key with the
/// same surname set into it and emits the union under the earliest key's
/// spelling. Every book of the input appears exactly once in the output.
pub fn merge(registry: Registry) -> MergedRegistry {
    let mut working = registry.into_entries();
    let mut entries = Vec::with_capacity(working.len());

    while let Some((key, mut books)) = working.shift_remove_index(0) {
        let names = surnames(&key);

        let matching: Vec<String> = working
            .keys()
            .filter(|other| surnames(other) == names)
            .cloned()
            .collect();

        for other in matching {
            if let Some(other_books) = working.shift_remove(&other) {
                log::debug!("Merging author '{other}' into '{key}'");
                books.extend(other_books);
            }
        }

        entries.push((key, books));
    }

    MergedRegistry { entries }
}

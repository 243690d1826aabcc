//! Author registry.
//!
//! The registry groups book file names by author key. It is an ordered map:
//! keys seeded from an existing library come first (in folder-name order),
//! followed by keys discovered during extraction (in processing order). That
//! order is what makes the identity merge deterministic.

use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{BookshelfError, Result};
use crate::extract::{BookFormat, BookMetadata};
use crate::naming::{self, UNKNOWN_AUTHOR};

/// Book file names belonging to one author key.
pub type BookSet = BTreeSet<String>;

/// Ordered mapping from author key to book file names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: IndexMap<String, BookSet>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the author folders already present under `root`.
    ///
    /// Every top-level subdirectory becomes a key; its value is the set of
    /// regular files directly inside it. A missing `root` gives an empty
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` exists but cannot be listed.
    pub fn seed(root: &Path) -> Result<Self> {
        let mut registry = Self::new();
        if !root.exists() {
            return Ok(registry);
        }

        for dir in sorted_entries(root)? {
            if !dir.is_dir() {
                continue;
            }
            let Some(key) = dir.file_name().and_then(|n| n.to_str()) else {
                log::warn!("Skipping folder with non UTF-8 name: {}", dir.display());
                continue;
            };

            let books = registry.entries.entry(key.to_string()).or_default();
            for file in sorted_entries(&dir)? {
                if file.is_file()
                    && let Some(name) = file.file_name().and_then(|n| n.to_str())
                {
                    books.insert(name.to_string());
                }
            }
        }

        log::debug!(
            "Seeded {} author folder(s) with {} book(s) from {}",
            registry.len(),
            registry.book_count(),
            root.display()
        );
        Ok(registry)
    }

    /// Record a freshly extracted book.
    ///
    /// Computes the book's normalized file name, renames `source` to that name
    /// inside `workdir` (unless `dry_run`), and files the name under the
    /// book's author key. Blank author names are dropped; books left without
    /// authors are grouped under [`UNKNOWN_AUTHOR`]. Returns the new file name.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::NameTaken`] if another book already carries
    /// the file name, and [`BookshelfError::FailedToRename`] if the rename
    /// fails. The registry is left unchanged in both cases.
    pub fn record(
        &mut self,
        source: &Path,
        metadata: &BookMetadata,
        format: BookFormat,
        workdir: &Path,
        dry_run: bool,
    ) -> Result<String> {
        let mut authors: Vec<String> = metadata
            .authors
            .iter()
            .filter(|name| !naming::normalize(name).is_empty())
            .cloned()
            .collect();
        if authors.is_empty() {
            authors.push(UNKNOWN_AUTHOR.to_string());
        }

        let file_name = naming::book_file_name(&metadata.title, &authors, format.extension());
        let target = workdir.join(&file_name);

        if self.contains_book(&file_name) || (source != target && target.exists()) {
            return Err(BookshelfError::NameTaken {
                path: source.to_path_buf(),
                name: file_name,
            });
        }

        if !dry_run && source != target {
            std::fs::rename(source, &target).map_err(|e| BookshelfError::FailedToRename {
                from: source.to_path_buf(),
                to: target.clone(),
                source: e,
            })?;
        }

        self.insert(naming::author_key(&authors), file_name.clone());
        Ok(file_name)
    }

    /// Whether any key already lists `book`.
    pub fn contains_book(&self, book: &str) -> bool {
        self.entries.values().any(|books| books.contains(book))
    }

    /// Add `book` under `key`, creating the key if needed.
    pub fn insert(&mut self, key: impl Into<String>, book: impl Into<String>) {
        self.entries.entry(key.into()).or_default().insert(book.into());
    }

    /// Books filed under `key`.
    pub fn get(&self, key: &str) -> Option<&BookSet> {
        self.entries.get(key)
    }

    /// Number of author keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of books across all keys.
    pub fn book_count(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BookSet)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn into_entries(self) -> IndexMap<String, BookSet> {
        self.entries
    }
}

impl<K: Into<String>, B: Into<String>> FromIterator<(K, B)> for Registry {
    fn from_iter<I: IntoIterator<Item = (K, B)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (key, book) in iter {
            registry.insert(key, book);
        }
        registry
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut paths = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();
    Ok(paths)
}

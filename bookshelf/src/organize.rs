//! Filesystem organization.
//!
//! Moves every book of a [`MergedRegistry`] into `root/<author key>/` and
//! prunes directories left empty. Failures on individual files or folders are
//! collected in the report and never stop the pass.
//!
//! # Examples
//!
//! ```no_run
//! use bookshelf::merge::merge;
//! use bookshelf::organize::Organizer;
//! use bookshelf::registry::Registry;
//! use std::path::Path;
//!
//! # fn example() -> bookshelf::Result<()> {
//! let root = Path::new("books");
//! let merged = merge(Registry::seed(root)?);
//! let organizer = Organizer::new(root);
//! let mut report = organizer.organize(&merged);
//! report.absorb(organizer.prune_empty_dirs());
//! println!("Moved {} book(s)", report.moved.len());
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::BookshelfError;
use crate::merge::MergedRegistry;

/// A failure recorded while organizing.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizeFailure {
    /// File or directory concerned.
    pub path: PathBuf,
    /// Human-readable cause.
    pub message: String,
}

impl OrganizeFailure {
    fn from_error(path: PathBuf, err: &BookshelfError) -> Self {
        Self {
            path,
            message: err.to_string(),
        }
    }
}

/// What an organize pass did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizeReport {
    /// Author directories that did not exist before.
    pub created_dirs: Vec<PathBuf>,
    /// Final paths of books that were moved.
    pub moved: Vec<PathBuf>,
    /// Books that were already in their author directory.
    pub in_place: usize,
    /// Empty directories that were removed.
    pub removed_dirs: Vec<PathBuf>,
    /// Per-item failures.
    pub failures: Vec<OrganizeFailure>,
}

impl OrganizeReport {
    /// Fold another report into this one.
    pub fn absorb(&mut self, other: OrganizeReport) {
        self.created_dirs.extend(other.created_dirs);
        self.moved.extend(other.moved);
        self.in_place += other.in_place;
        self.removed_dirs.extend(other.removed_dirs);
        self.failures.extend(other.failures);
    }
}

/// Relocates books under a library root.
#[derive(Debug, Clone)]
pub struct Organizer {
    root: PathBuf,
}

impl Organizer {
    /// Create an organizer for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure one directory per key and move each book into it.
    ///
    /// Books are located anywhere under the root by file name; the first match
    /// in sorted walk order wins.
    pub fn organize(&self, merged: &MergedRegistry) -> OrganizeReport {
        let mut report = OrganizeReport::default();

        for (key, books) in merged.iter() {
            let author_dir = self.root.join(key);

            if !author_dir.is_dir() {
                if let Err(e) = std::fs::create_dir_all(&author_dir) {
                    let err = BookshelfError::FailedToCreateDir {
                        path: author_dir.clone(),
                        source: e,
                    };
                    log::warn!("{err}");
                    report
                        .failures
                        .push(OrganizeFailure::from_error(author_dir, &err));
                    continue;
                }
                report.created_dirs.push(author_dir.clone());
            }

            for book in books {
                let destination = author_dir.join(book);

                match self.find_book(book) {
                    Some(source) if source == destination => report.in_place += 1,
                    Some(source) => match std::fs::rename(&source, &destination) {
                        Ok(()) => {
                            log::debug!("Moved '{book}' to {}", author_dir.display());
                            report.moved.push(destination);
                        }
                        Err(e) => {
                            let err = BookshelfError::FailedToMove {
                                book: book.clone(),
                                to: destination.clone(),
                                source: e,
                            };
                            log::warn!("{err}");
                            report.failures.push(OrganizeFailure::from_error(source, &err));
                        }
                    },
                    None => {
                        let err = BookshelfError::BookNotFound {
                            book: book.clone(),
                            root: self.root.clone(),
                        };
                        log::warn!("{err}");
                        report
                            .failures
                            .push(OrganizeFailure::from_error(destination, &err));
                    }
                }
            }
        }

        report
    }

    /// Remove every empty directory below the root, deepest first.
    ///
    /// Parents emptied by the removal of their children are removed too. The
    /// root itself is kept.
    pub fn prune_empty_dirs(&self) -> OrganizeReport {
        let mut report = OrganizeReport::default();

        let dirs = WalkDir::new(&self.root)
            .min_depth(1)
            .contents_first(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_dir() => Some(entry.into_path()),
                Ok(_) => None,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {e}");
                    None
                }
            });

        for dir in dirs {
            let is_empty = match std::fs::read_dir(&dir) {
                Ok(mut entries) => entries.next().is_none(),
                Err(_) => false,
            };
            if !is_empty {
                continue;
            }

            match std::fs::remove_dir(&dir) {
                Ok(()) => {
                    log::debug!("Removed empty folder: {}", dir.display());
                    report.removed_dirs.push(dir);
                }
                Err(e) => {
                    let err = BookshelfError::FailedToRemoveDir {
                        path: dir.clone(),
                        source: e,
                    };
                    log::warn!("{err}");
                    report.failures.push(OrganizeFailure::from_error(dir, &err));
                }
            }
        }

        report
    }

    /// First file named `book` under the root.
    fn find_book(&self, book: &str) -> Option<PathBuf> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .find(|entry| entry.file_type().is_file() && entry.file_name() == book)
            .map(walkdir::DirEntry::into_path)
    }
}

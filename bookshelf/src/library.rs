//! End-to-end library run.
//!
//! [`Library::run`] drives one pass over a library folder:
//!
//! 1. seed the registry from existing author folders
//! 2. extract, rename and record every loose book in the root
//! 3. merge author keys naming the same people
//! 4. move books into author folders and prune empty ones
//! 5. write the catalog
//!
//! Books that fail extraction or renaming and items that fail to move are
//! reported in the [`RunSummary`] and never stop the run. Dry runs stop after
//! step 3 and touch nothing on disk.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::catalog::{CatalogGenerator, CatalogStatistics};
use crate::config::Config;
use crate::error::{BookshelfError, FailureKind, Result};
use crate::extract::{BookFormat, BookMetadata, Extractor};
use crate::merge::{MergedRegistry, merge};
use crate::organize::{OrganizeReport, Organizer};
use crate::registry::Registry;

/// A loose book that was extracted and recorded.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedBook {
    /// Original path in the library root.
    pub source: PathBuf,
    /// Normalized file name the book now carries.
    pub file_name: String,
    /// Format the book was read as.
    pub format: BookFormat,
    /// Extracted metadata.
    pub metadata: BookMetadata,
}

/// A loose book that was left where it was.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedBook {
    /// Path in the library root.
    pub path: PathBuf,
    /// Failure class.
    pub kind: FailureKind,
    /// Human-readable cause.
    pub message: String,
}

/// One merged author folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorGroup {
    /// Folder name.
    pub author: String,
    /// Book file names in the folder.
    pub books: Vec<String>,
}

/// Everything a run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Library root.
    pub library: PathBuf,
    /// Whether the run was a dry run.
    pub dry_run: bool,
    /// Author folders found before the run.
    pub seeded_authors: usize,
    /// Books recorded during this run.
    pub processed: Vec<ProcessedBook>,
    /// Books that could not be read or renamed.
    pub skipped: Vec<SkippedBook>,
    /// Final author grouping.
    pub authors: Vec<AuthorGroup>,
    /// Filesystem changes; absent for dry runs.
    pub organize: Option<OrganizeReport>,
    /// Catalog results; absent for dry runs or when disabled.
    pub catalog: Option<CatalogStatistics>,
}

impl RunSummary {
    fn new(config: &Config) -> Self {
        Self {
            library: config.library.clone(),
            dry_run: config.dry_run,
            seeded_authors: 0,
            processed: Vec::new(),
            skipped: Vec::new(),
            authors: Vec::new(),
            organize: None,
            catalog: None,
        }
    }

    /// Total number of books across all author folders.
    pub fn book_count(&self) -> usize {
        self.authors.iter().map(|a| a.books.len()).sum()
    }

    /// Number of per-item failures, extraction and organize combined.
    pub fn failure_count(&self) -> usize {
        self.skipped.len()
            + self
                .organize
                .as_ref()
                .map_or(0, |report| report.failures.len())
    }
}

/// A library folder and the settings to sort it with.
#[derive(Debug, Clone)]
pub struct Library {
    config: Config,
    extractor: Extractor,
    catalog: CatalogGenerator,
}

impl Library {
    /// Prepare a run with `config`.
    pub fn new(config: Config) -> Self {
        let extractor = Extractor::new(config.extractor.clone());
        let catalog = CatalogGenerator::new(config.catalog_config.clone());
        Self {
            config,
            extractor,
            catalog,
        }
    }

    /// The run configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Library root.
    pub fn root(&self) -> &Path {
        &self.config.library
    }

    /// Loose books in the root, sorted by path.
    ///
    /// Directories, the catalog file and files with other extensions are
    /// left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be listed.
    pub fn scan(&self) -> Result<Vec<(PathBuf, BookFormat)>> {
        let mut paths = std::fs::read_dir(self.root())?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        let catalog_name = self.config.catalog_config.file_name.as_str();
        let books = paths
            .into_iter()
            .filter(|path| path.is_file())
            .filter(|path| path.file_name().is_none_or(|name| name != catalog_name))
            .filter_map(|path| match BookFormat::from_path(&path) {
                Some(format) => Some((path, format)),
                None => {
                    log::debug!("Ignoring {}", path.display());
                    None
                }
            })
            .collect();
        Ok(books)
    }

    /// Run the whole pipeline.
    ///
    /// # Errors
    ///
    /// Fails before touching anything if the root is missing or not a
    /// directory. A catalog failure is returned after the library has been
    /// organized.
    pub fn run(&self) -> Result<RunSummary> {
        self.check_root()?;
        let mut summary = RunSummary::new(&self.config);

        let mut registry = Registry::seed(self.root())?;
        summary.seeded_authors = registry.len();

        self.record_books(&mut registry, &mut summary)?;

        let merged = merge(registry);
        summary.authors = author_groups(&merged);
        log::info!(
            "{} book(s) under {} author(s)",
            merged.book_count(),
            merged.len()
        );

        if self.config.dry_run {
            return Ok(summary);
        }

        let organizer = Organizer::new(self.root());
        let mut report = organizer.organize(&merged);
        report.absorb(organizer.prune_empty_dirs());
        summary.organize = Some(report);

        if self.config.catalog {
            summary.catalog = Some(self.catalog.write(&merged, self.root())?);
        }

        Ok(summary)
    }

    fn check_root(&self) -> Result<()> {
        let root = self.root();
        if !root.exists() {
            return Err(BookshelfError::LibraryNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(BookshelfError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        Ok(())
    }

    fn record_books(&self, registry: &mut Registry, summary: &mut RunSummary) -> Result<()> {
        for (path, format) in self.scan()? {
            let recorded = self.extractor.extract(&path, format).and_then(|metadata| {
                let file_name = registry.record(
                    &path,
                    &metadata,
                    format,
                    self.root(),
                    self.config.dry_run,
                )?;
                Ok((file_name, metadata))
            });

            let (file_name, metadata) = match recorded {
                Ok(recorded) => recorded,
                Err(err) if err.is_recoverable() => {
                    log::warn!("Skipping {}: {err}", path.display());
                    summary.skipped.push(SkippedBook {
                        path,
                        kind: err.kind(),
                        message: err.to_string(),
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };
            log::debug!("Recorded '{file_name}'");

            summary.processed.push(ProcessedBook {
                source: path,
                file_name,
                format,
                metadata,
            });
        }
        Ok(())
    }
}

fn author_groups(merged: &MergedRegistry) -> Vec<AuthorGroup> {
    merged
        .iter()
        .map(|(author, books)| AuthorGroup {
            author: author.to_string(),
            books: books.iter().cloned().collect(),
        })
        .collect()
}

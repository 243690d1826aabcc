//! FB2 catalog of the organized library.
//!
//! The catalog is itself an FB2 book: one subtitle per author, one linked
//! paragraph per book and an empty line after each author. Links are
//! relative to the library root (`<author key>/<book file>`), so the file
//! must live in the root it describes.
//!
//! Generation runs in fixed stages:
//!
//! 1. [`CatalogGenerator::build`] turns the merged registry into nodes
//! 2. the nodes are rendered one per line and repeated lines are dropped
//! 3. the text is parsed once, dangling links and orphan headers are pruned
//! 4. the result is pretty-printed and written atomically
//!
//! # Examples
//!
//! ```no_run
//! use bookshelf::catalog::CatalogGenerator;
//! use bookshelf::merge::merge;
//! use bookshelf::registry::Registry;
//! use std::path::Path;
//!
//! # fn example() -> bookshelf::Result<()> {
//! let root = Path::new("books");
//! let merged = merge(Registry::seed(root)?);
//! let stats = CatalogGenerator::default().write(&merged, root)?;
//! println!("{} entries in {}", stats.entries, stats.path.display());
//! # Ok(())
//! # }
//! ```

pub mod cleanup;
pub mod markup;

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::io::CatalogWriter;
use crate::merge::MergedRegistry;
use crate::naming::bracketed_title;

pub use cleanup::{PruneStats, dedup_lines, prune};
pub use markup::{Layout, parse, render};

/// One child of the catalog section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogNode {
    /// Author subtitle.
    Header(String),
    /// Linked book paragraph.
    Entry {
        /// Link target relative to the library root.
        href: String,
        /// Visible link text.
        label: String,
    },
    /// Spacer closing an author block.
    Spacer,
}

/// Catalog content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Book title in the front matter.
    pub title: String,
    /// Section children in document order.
    pub nodes: Vec<CatalogNode>,
}

impl Catalog {
    /// Number of author headers.
    pub fn header_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, CatalogNode::Header(_)))
            .count()
    }

    /// Number of book entries.
    pub fn entry_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, CatalogNode::Entry { .. }))
            .count()
    }
}

/// Summary of a generation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogStatistics {
    /// Author headers in the final catalog.
    pub authors: usize,
    /// Book entries in the final catalog.
    pub entries: usize,
    /// Books skipped because their name carries no «title».
    pub untitled: usize,
    /// Repeated lines dropped.
    pub duplicate_lines: usize,
    /// Entries dropped because the target file is missing.
    pub dangling_links: usize,
    /// Headers dropped because no entry follows them.
    pub orphan_headers: usize,
    /// Where the catalog was written.
    pub path: PathBuf,
    /// Size of the written file in bytes.
    pub file_size: u64,
}

/// Pretty-printed catalog text plus its statistics.
#[derive(Debug, Clone)]
pub struct GeneratedCatalog {
    /// Final document text.
    pub text: String,
    /// What generation did; `path` and `file_size` are unset until written.
    pub stats: CatalogStatistics,
}

/// Builds and writes catalogs.
#[derive(Debug, Clone, Default)]
pub struct CatalogGenerator {
    config: CatalogConfig,
    writer: CatalogWriter,
}

impl CatalogGenerator {
    /// Create a generator with the given layout settings.
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            writer: CatalogWriter::new(),
        }
    }

    /// Layout settings.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Naive catalog for `merged`: every author, every titled book.
    ///
    /// Returns the catalog and the number of books skipped for lacking a
    /// `«title»` in their file name.
    pub fn build(&self, merged: &MergedRegistry) -> (Catalog, usize) {
        let mut nodes = Vec::with_capacity(merged.book_count() + 2 * merged.len());
        let mut untitled = 0;

        for (author, books) in merged.iter() {
            nodes.push(CatalogNode::Header(author.to_string()));
            for book in books {
                match bracketed_title(book) {
                    Some(title) => nodes.push(CatalogNode::Entry {
                        href: format!("{author}/{book}"),
                        label: format!("  - {title}"),
                    }),
                    None => {
                        log::debug!("No «title» in '{book}', leaving it out of the catalog");
                        untitled += 1;
                    }
                }
            }
            nodes.push(CatalogNode::Spacer);
        }

        let catalog = Catalog {
            title: self.config.title.clone(),
            nodes,
        };
        (catalog, untitled)
    }

    /// Produce the cleaned, pretty-printed catalog for the library at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BookshelfError::MalformedCatalog`] if the
    /// intermediate text cannot be serialized or parsed back.
    pub fn generate(&self, merged: &MergedRegistry, root: &Path) -> Result<GeneratedCatalog> {
        let (catalog, untitled) = self.build(merged);

        let lines = render(&catalog, &self.config, Layout::Lines)?;
        let (deduped, duplicate_lines) = dedup_lines(&lines);

        let parsed = parse(&deduped, &self.config)?;
        let (nodes, pruned) = prune(parsed.nodes, |href| root.join(href).is_file());
        let catalog = Catalog {
            title: parsed.title,
            nodes,
        };

        let text = render(&catalog, &self.config, Layout::Pretty)?;
        let stats = CatalogStatistics {
            authors: catalog.header_count(),
            entries: catalog.entry_count(),
            untitled,
            duplicate_lines,
            dangling_links: pruned.dangling_links,
            orphan_headers: pruned.orphan_headers,
            ..Default::default()
        };

        Ok(GeneratedCatalog { text, stats })
    }

    /// Generate the catalog and write it to `root/<file name>`, replacing any
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns the generation error, or
    /// [`crate::BookshelfError::FailedToWriteCatalog`] if the file cannot be
    /// written.
    pub fn write(&self, merged: &MergedRegistry, root: &Path) -> Result<CatalogStatistics> {
        let GeneratedCatalog { text, mut stats } = self.generate(merged, root)?;

        let written = self.writer.write(&root.join(&self.config.file_name), &text)?;
        stats.path = written.output_path;
        stats.file_size = written.file_size;

        log::info!(
            "Catalog written: {} author(s), {} book(s)",
            stats.authors,
            stats.entries
        );
        Ok(stats)
    }
}

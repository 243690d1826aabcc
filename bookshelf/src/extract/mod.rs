//! Book metadata extraction.
//!
//! Title and authors are pulled out of EPUB and FB2 files by running the
//! query sets from [`ExtractorConfig`] against the metadata documents.
//!
//! # Examples
//!
//! ```no_run
//! use bookshelf::config::ExtractorConfig;
//! use bookshelf::extract::{BookFormat, Extractor};
//! use std::path::Path;
//!
//! # fn example() -> bookshelf::Result<()> {
//! let extractor = Extractor::new(ExtractorConfig::default());
//! let meta = extractor.extract(Path::new("books/dune.fb2"), BookFormat::Fb2)?;
//! println!("{} by {}", meta.title, meta.authors.join(", "));
//! # Ok(())
//! # }
//! ```

mod epub;
mod fb2;
pub mod query;

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::config::ExtractorConfig;
use crate::error::{BookshelfError, Result};

pub use query::{Query, Selection};

/// Container format of a book file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    /// ZIP container with an OPF package document.
    Epub,
    /// Single FictionBook XML document.
    Fb2,
}

impl BookFormat {
    /// Detect the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("epub") {
            Some(Self::Epub)
        } else if ext.eq_ignore_ascii_case("fb2") {
            Some(Self::Fb2)
        } else {
            None
        }
    }

    /// Extension used for renamed files.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Epub => "epub",
            Self::Fb2 => "fb2",
        }
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Epub => "EPUB",
            Self::Fb2 => "FB2",
        })
    }
}

/// Title and authors of one book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookMetadata {
    /// Book title.
    pub title: String,
    /// Author names in document order.
    pub authors: Vec<String>,
}

/// Metadata extractor bound to a fixed set of namespace and query tables.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl Extractor {
    /// Create an extractor with the given tables.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// The tables this extractor runs with.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract metadata from `path`, read as `format`.
    ///
    /// The file is only read, never modified.
    ///
    /// # Errors
    ///
    /// Returns an extraction-class [`BookshelfError`] when the file cannot be
    /// read, is not a valid container, is not well-formed XML or lacks a
    /// required node.
    pub fn extract(&self, path: &Path, format: BookFormat) -> Result<BookMetadata> {
        log::debug!("Extracting {format} metadata from {}", path.display());
        match format {
            BookFormat::Epub => epub::extract(path, &self.config),
            BookFormat::Fb2 => fb2::extract(path, &self.config),
        }
    }

    /// Detect the format from the extension, then extract.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::UnsupportedFormat`] for unknown extensions,
    /// otherwise the same errors as [`Extractor::extract`].
    pub fn extract_path(&self, path: &Path) -> Result<BookMetadata> {
        let format = BookFormat::from_path(path).ok_or_else(|| BookshelfError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        self.extract(path, format)
    }
}

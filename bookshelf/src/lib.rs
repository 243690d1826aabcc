//! bookshelf - Sort a folder of e-books into author folders.
//!
//! This library reads title and author metadata from EPUB and FB2 files,
//! renames every book to a canonical `«Title», Author.ext` form, groups books
//! by author (treating "Иван Петров" and "И. Петров" as one person), moves
//! them into one folder per author and writes an FB2 catalog linking to every
//! book.
//!
//! # Examples
//!
//! ## Sorting a library
//!
//! ```no_run
//! use bookshelf::config::Config;
//! use bookshelf::library::Library;
//!
//! # fn example() -> bookshelf::Result<()> {
//! let config = Config::for_library("books");
//! let summary = Library::new(config).run()?;
//! println!(
//!     "{} book(s) under {} author(s)",
//!     summary.book_count(),
//!     summary.authors.len()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use bookshelf::catalog::CatalogGenerator;
//! use bookshelf::extract::Extractor;
//! use bookshelf::merge::merge;
//! use bookshelf::registry::Registry;
//! use std::path::Path;
//!
//! # fn example() -> bookshelf::Result<()> {
//! let meta = Extractor::default().extract_path(Path::new("books/dune.fb2"))?;
//! println!("{} by {}", meta.title, meta.authors.join(", "));
//!
//! let root = Path::new("books");
//! let merged = merge(Registry::seed(root)?);
//! CatalogGenerator::default().write(&merged, root)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod io;
pub mod library;
pub mod merge;
pub mod naming;
pub mod organize;
pub mod output;
pub mod registry;

// Re-export commonly used types
pub use config::Config;
pub use error::{BookshelfError, FailureKind, Result};
pub use library::{Library, RunSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

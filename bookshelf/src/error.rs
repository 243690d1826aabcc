//! Error types for bookshelf.
//!
//! Every failure that can happen while sorting a library is a
//! [`BookshelfError`]. Errors carry the path they concern and, where there is
//! one, the underlying cause.
//!
//! # Error Categories
//!
//! - **Extraction**: a book could not be read or lacks required metadata. The
//!   book is skipped.
//! - **Organize**: a book could not be renamed or moved, or a directory could
//!   not be created or removed. The item is skipped.
//! - **Catalog**: the catalog could not be generated or written. Catalog
//!   generation stops, the library tree is left as organized.
//! - **Fatal**: the run cannot start or cannot continue at all.

use serde::Serialize;
use std::io;
use std::path::PathBuf;

/// Result type alias for bookshelf operations.
pub type Result<T> = std::result::Result<T, BookshelfError>;

/// Broad class of a failure, used to decide whether a run may continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// A single book could not be read.
    Extraction,
    /// A single file or directory could not be relocated or pruned.
    Organize,
    /// The catalog could not be produced.
    Catalog,
    /// The run cannot proceed.
    Fatal,
}

/// Main error type for bookshelf operations.
#[derive(Debug, thiserror::Error)]
pub enum BookshelfError {
    /// The library folder does not exist.
    #[error("Library folder not found: {}", path.display())]
    LibraryNotFound {
        /// Path that was expected to be the library.
        path: PathBuf,
    },

    /// The library path exists but is not a directory.
    #[error("Not a directory: {}", path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// The file extension is not one of the supported book formats.
    #[error("Unsupported book format: {}", path.display())]
    UnsupportedFormat {
        /// Path to the file.
        path: PathBuf,
    },

    /// A book file could not be read from disk.
    #[error("Cannot read book: {}\n  Reason: {source}", path.display())]
    FailedToReadBook {
        /// Path to the book.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The EPUB container is not a readable ZIP archive.
    #[error("Invalid EPUB archive: {}\n  Reason: {source}", path.display())]
    InvalidArchive {
        /// Path to the archive.
        path: PathBuf,
        /// Underlying archive error.
        source: zip::result::ZipError,
    },

    /// A required entry is missing from the EPUB container.
    #[error("Missing archive entry '{entry}' in: {}", path.display())]
    MissingArchiveEntry {
        /// Path to the archive.
        path: PathBuf,
        /// Name of the entry that was not found.
        entry: String,
    },

    /// A metadata document is not well-formed XML.
    #[error("Malformed document: {}\n  Details: {details}", path.display())]
    MalformedDocument {
        /// Path to the book holding the document.
        path: PathBuf,
        /// Parser message.
        details: String,
    },

    /// A required metadata query matched nothing.
    #[error("Missing metadata in: {}\n  Query '{query}' matched no node", path.display())]
    MissingMetadata {
        /// Path to the book.
        path: PathBuf,
        /// Query expression that came back empty.
        query: String,
    },

    /// A query expression could not be parsed or evaluated.
    #[error("Invalid query '{expression}': {reason}")]
    InvalidQuery {
        /// The offending expression.
        expression: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A book could not be renamed to its normalized name.
    #[error("Failed to rename {} to {}\n  Reason: {source}", from.display(), to.display())]
    FailedToRename {
        /// Original path.
        from: PathBuf,
        /// Target path.
        to: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Another book already carries the normalized name.
    #[error("Cannot rename {}: a book named '{name}' already exists", path.display())]
    NameTaken {
        /// Book that was left alone.
        path: PathBuf,
        /// Normalized file name that is taken.
        name: String,
    },

    /// A book listed in the registry was not found under the library root.
    #[error("Book not found under {}: {book}", root.display())]
    BookNotFound {
        /// File name that was searched for.
        book: String,
        /// Library root that was searched.
        root: PathBuf,
    },

    /// A book could not be moved into its author directory.
    #[error("Failed to move '{book}' to {}\n  Reason: {source}", to.display())]
    FailedToMove {
        /// File name of the book.
        book: String,
        /// Destination path.
        to: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An author directory could not be created.
    #[error("Failed to create directory: {}\n  Reason: {source}", path.display())]
    FailedToCreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An empty directory could not be removed.
    #[error("Failed to remove empty folder: {}\n  Reason: {source}", path.display())]
    FailedToRemoveDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Intermediate catalog text could not be parsed back.
    #[error("Malformed catalog: {details}")]
    MalformedCatalog {
        /// Parser message or structural problem.
        details: String,
    },

    /// The catalog file could not be written.
    #[error("Failed to write catalog: {}\n  Reason: {source}", path.display())]
    FailedToWriteCatalog {
        /// Catalog path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for BookshelfError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl BookshelfError {
    /// Create a MalformedDocument error.
    pub fn malformed_document(path: PathBuf, details: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path,
            details: details.into(),
        }
    }

    /// Create a MissingMetadata error.
    pub fn missing_metadata(path: PathBuf, query: impl Into<String>) -> Self {
        Self::MissingMetadata {
            path,
            query: query.into(),
        }
    }

    /// Create an InvalidQuery error.
    pub fn invalid_query(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create a MalformedCatalog error.
    pub fn malformed_catalog(details: impl Into<String>) -> Self {
        Self::MalformedCatalog {
            details: details.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Classify the error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnsupportedFormat { .. }
            | Self::FailedToReadBook { .. }
            | Self::InvalidArchive { .. }
            | Self::MissingArchiveEntry { .. }
            | Self::MalformedDocument { .. }
            | Self::MissingMetadata { .. }
            | Self::InvalidQuery { .. } => FailureKind::Extraction,
            Self::FailedToRename { .. }
            | Self::NameTaken { .. }
            | Self::BookNotFound { .. }
            | Self::FailedToMove { .. }
            | Self::FailedToCreateDir { .. }
            | Self::FailedToRemoveDir { .. } => FailureKind::Organize,
            Self::MalformedCatalog { .. } | Self::FailedToWriteCatalog { .. } => {
                FailureKind::Catalog
            }
            Self::LibraryNotFound { .. }
            | Self::NotADirectory { .. }
            | Self::InvalidConfig { .. }
            | Self::Io { .. }
            | Self::Other { .. } => FailureKind::Fatal,
        }
    }

    /// Check if this error is recoverable (the run skips the item and continues).
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), FailureKind::Extraction | FailureKind::Organize)
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LibraryNotFound { .. } => 2,
            Self::NotADirectory { .. } => 2,
            Self::InvalidConfig { .. } => 1,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
            _ => match self.kind() {
                FailureKind::Extraction => 3,
                FailureKind::Organize => 4,
                FailureKind::Catalog => 6,
                FailureKind::Fatal => 1,
            },
        }
    }
}

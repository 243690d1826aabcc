//! Catalog file writing.
//!
//! Writes are atomic: the text goes to a sibling temp file which
//! is then renamed over the destination, so a crash never leaves a truncated
//! catalog behind.
//!
//! # Examples
//!
//! ```no_run
//! use bookshelf::io::writer::{CatalogWriter, format_file_size};
//! use std::path::Path;
//!
//! # fn example() -> bookshelf::Result<()> {
//! let writer = CatalogWriter::new();
//! let stats = writer.write(Path::new("books/output.fb2"), "<FictionBook/>")?;
//! println!("Wrote {}", format_file_size(stats.file_size));
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{BookshelfError, Result};

/// Statistics about a write operation.
#[derive(Debug, Clone, Serialize)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    #[serde(skip)]
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

/// Atomic text file writer.
#[derive(Debug, Clone)]
pub struct CatalogWriter {
    buffer_size: usize,
}

impl Default for CatalogWriter {
    fn default() -> Self {
        Self { buffer_size: 8192 }
    }
}

impl CatalogWriter {
    /// Create a writer with the default buffer size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `text` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::FailedToWriteCatalog`] if the file cannot be
    /// created, written or moved into place.
    pub fn write(&self, path: &Path, text: &str) -> Result<WriteStatistics> {
        let start = Instant::now();

        let write_path = path.with_extension("tmp");

        let failed = |path: &Path| {
            let path = path.to_path_buf();
            move |source| BookshelfError::FailedToWriteCatalog { path, source }
        };

        let file = std::fs::File::create(&write_path).map_err(failed(&write_path))?;
        let mut writer = std::io::BufWriter::with_capacity(self.buffer_size, file);
        writer
            .write_all(text.as_bytes())
            .map_err(failed(&write_path))?;
        writer.flush().map_err(failed(&write_path))?;
        drop(writer);

        std::fs::rename(&write_path, path).map_err(failed(path))?;

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        log::debug!("Wrote {} ({} bytes)", path.display(), file_size);

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
        })
    }
}

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

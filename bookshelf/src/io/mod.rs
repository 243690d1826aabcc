//! File output helpers.

pub mod writer;

pub use writer::{CatalogWriter, WriteStatistics, format_file_size};

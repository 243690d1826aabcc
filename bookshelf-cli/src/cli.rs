//! CLI argument parsing for bookshelf.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled into the build script to render the man page, so it
//! only depends on `clap` and the library crate.

use clap::Parser;
use std::path::PathBuf;

use bookshelf::config::{Config, DEFAULT_LIBRARY};
use bookshelf::error::{BookshelfError, Result};

/// Sort a folder of e-books into author folders and catalog them.
///
/// bookshelf reads the title and authors of every EPUB and FB2 file lying
/// loose in the library folder, renames each one to "«Title», Author.ext",
/// moves it into a folder named after its author and writes an FB2 catalog
/// (output.fb2) linking to every book.
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(version)]
#[command(about = "Sort a folder of e-books into author folders", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Library folder to sort
    ///
    /// Loose books are read from the top level of this folder. Existing
    /// author folders are picked up and merged with newly found authors.
    #[arg(value_name = "LIBRARY", default_value = DEFAULT_LIBRARY)]
    pub library: PathBuf,

    /// Dry run - read metadata and show the resulting layout without
    /// renaming, moving or writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show every rename and catalog details
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Do not write the catalog file
    #[arg(long)]
    pub no_catalog: bool,

    /// Print the run summary as JSON on stdout
    ///
    /// Status messages are suppressed; warnings and errors still go to
    /// stderr.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::InvalidConfig`] if configuration validation
    /// fails.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::for_library(&self.library);
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;
        config.quiet = self.quiet || self.json;
        config.catalog = !self.no_catalog;

        config.validate().map_err(|e| {
            BookshelfError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// # Errors
    ///
    /// Returns an error if the library argument is empty or `--json` is
    /// combined with `--verbose`.
    pub fn validate(&self) -> Result<()> {
        if self.library.as_os_str().is_empty() {
            return Err(BookshelfError::invalid_config("No library folder specified"));
        }

        if self.json && self.verbose {
            return Err(BookshelfError::invalid_config(
                "Cannot use both --json and --verbose",
            ));
        }

        Ok(())
    }
}

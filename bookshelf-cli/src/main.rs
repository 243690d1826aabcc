//! bookshelf - Sort a folder of e-books into author folders.
//!
//! Renames EPUB and FB2 books after their metadata, groups them by author and
//! writes an FB2 catalog of the result.

mod cli;

use clap::Parser;
use log::LevelFilter;
use std::process;

use crate::cli::Cli;
use bookshelf::error::BookshelfError;
use bookshelf::library::Library;
use bookshelf::output::{OutputFormatter, display_run_summary};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_logging(&cli);

    // Run the application and handle errors
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log level implied by the output flags. `RUST_LOG` overrides it.
fn log_level(cli: &Cli) -> LevelFilter {
    if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    }
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(log_level(cli))
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Main application logic.
fn run(cli: &Cli) -> Result<(), BookshelfError> {
    cli.validate()?;
    let config = cli.to_config()?;

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", bookshelf::NAME, bookshelf::VERSION));
        formatter.blank_line();
    }

    formatter.info(&format!("Sorting library: {}", config.library.display()));
    if config.dry_run {
        formatter.info("Dry run: no file will be renamed, moved or written");
    }

    let summary = Library::new(config).run()?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| BookshelfError::other(format!("Failed to serialize summary: {e}")))?;
        println!("{json}");
    } else {
        formatter.blank_line();
        display_run_summary(&formatter, &summary);
    }

    Ok(())
}

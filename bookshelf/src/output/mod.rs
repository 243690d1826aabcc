//! Operator-facing output for bookshelf.
//!
//! Status lines go through [`OutputFormatter`]; the `display_*` helpers turn
//! run results into those lines.
//!
//! # Examples
//!
//! ```no_run
//! use bookshelf::library::Library;
//! use bookshelf::output::{OutputFormatter, display_run_summary};
//! use bookshelf::config::Config;
//!
//! # fn example(config: Config) -> bookshelf::Result<()> {
//! let formatter = OutputFormatter::from_config(&config);
//! let summary = Library::new(config).run()?;
//! display_run_summary(&formatter, &summary);
//! # Ok(())
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::catalog::CatalogStatistics;
use crate::io::format_file_size;
use crate::library::RunSummary;
use crate::organize::OrganizeReport;

/// Display the outcome of a run.
pub fn display_run_summary(formatter: &OutputFormatter, summary: &RunSummary) {
    for skipped in &summary.skipped {
        formatter.warning(&format!(
            "Skipped {}: {}",
            skipped.path.display(),
            skipped.message
        ));
    }

    for book in &summary.processed {
        formatter.debug(&format!(
            "{} -> {}",
            book.source.display(),
            book.file_name
        ));
    }

    formatter.info(&format!(
        "Processed {} new book(s), {} author folder(s) already present",
        summary.processed.len(),
        summary.seeded_authors
    ));

    if summary.dry_run {
        display_plan(formatter, summary);
        return;
    }

    if let Some(report) = &summary.organize {
        display_organize_report(formatter, report);
    }

    if let Some(stats) = &summary.catalog {
        display_catalog_statistics(formatter, stats);
    }

    match outcome_message(summary) {
        (MessageLevel::Success, message) => formatter.success(&message),
        (_, message) => formatter.warning(&message),
    }
}

fn outcome_message(summary: &RunSummary) -> (MessageLevel, String) {
    let totals = format!(
        "{} book(s) under {} author(s)",
        summary.book_count(),
        summary.authors.len()
    );
    match summary.failure_count() {
        0 => (MessageLevel::Success, format!("Library sorted: {totals}")),
        failures => (
            MessageLevel::Warning,
            format!("Library sorted with {failures} problem(s): {totals}"),
        ),
    }
}

/// Display the author layout a dry run would produce.
pub fn display_plan(formatter: &OutputFormatter, summary: &RunSummary) {
    formatter.section("Planned layout:");
    for (index, group) in summary.authors.iter().enumerate() {
        formatter.list_item(index + 1, &format!("{}/ ({} book(s))", group.author, group.books.len()));
        for book in &group.books {
            formatter.detail("book", book);
        }
    }
    formatter.blank_line();
    formatter.success("Dry run completed, nothing was changed");
}

/// Display filesystem changes.
pub fn display_organize_report(formatter: &OutputFormatter, report: &OrganizeReport) {
    for failure in &report.failures {
        formatter.warning(&format!("{}: {}", failure.path.display(), failure.message));
    }

    formatter.info(&organize_message(report));
}

fn organize_message(report: &OrganizeReport) -> String {
    format!(
        "Moved {} book(s), {} already in place, created {} and removed {} folder(s)",
        report.moved.len(),
        report.in_place,
        report.created_dirs.len(),
        report.removed_dirs.len()
    )
}

/// Display catalog results.
pub fn display_catalog_statistics(formatter: &OutputFormatter, stats: &CatalogStatistics) {
    formatter.info(&format!(
        "Catalog {}: {} author(s), {} book(s), {}",
        stats.path.display(),
        stats.authors,
        stats.entries,
        format_file_size(stats.file_size)
    ));
    formatter.detail("Untitled books left out", &stats.untitled.to_string());
    formatter.detail("Duplicate lines dropped", &stats.duplicate_lines.to_string());
    formatter.detail("Dangling links dropped", &stats.dangling_links.to_string());
    formatter.detail("Empty headers dropped", &stats.orphan_headers.to_string());
}

//! Integration tests for error handling and edge cases.

use bookshelf::config::Config;
use bookshelf::error::{BookshelfError, FailureKind};
use bookshelf::library::Library;

use crate::common::{TestLibrary, epub_with_metadata};

#[test]
fn test_error_missing_library() {
    let result = Library::new(Config::for_library("/nonexistent/library")).run();

    let err = result.unwrap_err();
    assert!(matches!(err, BookshelfError::LibraryNotFound { .. }));
    assert!(!err.is_recoverable());
    assert_eq!(err.kind(), FailureKind::Fatal);
}

#[test]
fn test_error_library_is_a_file() {
    let library = TestLibrary::new();
    let file = library.add_file("book.fb2", b"");

    let err = Library::new(Config::for_library(file)).run().unwrap_err();
    assert!(matches!(err, BookshelfError::NotADirectory { .. }));
}

#[test]
fn test_broken_books_are_skipped() {
    let library = TestLibrary::new();
    library.add_file("broken.fb2", b"<FictionBook><description>");
    library.add_file("not-a-zip.epub", b"plain text");
    library.add_fb2("dune.fb2", "Дюна", &[("Фрэнк", "Герберт")]);

    let summary = library.run();

    assert_eq!(summary.processed.len(), 1);
    assert_eq!(summary.skipped.len(), 2);
    assert!(
        summary
            .skipped
            .iter()
            .all(|s| s.kind == FailureKind::Extraction)
    );
    assert_eq!(
        library.loose_files(),
        vec!["broken.fb2", "not-a-zip.epub", "output.fb2"]
    );
    assert!(!library.catalog().contains("broken"));
}

#[test]
fn test_epub_without_title_is_skipped() {
    let library = TestLibrary::new();
    library.add_file(
        "untitled.epub",
        &epub_with_metadata("<dc:creator>Someone</dc:creator>"),
    );

    let summary = library.run();

    assert_eq!(summary.skipped.len(), 1);
    assert!(summary.skipped[0].message.contains("dc:title"));
    assert!(library.path("untitled.epub").is_file());
}

#[test]
fn test_fb2_without_title_is_kept() {
    let library = TestLibrary::new();
    library.add_file(
        "x.fb2",
        br#"<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0">
<description><title-info><author><first-name>A</first-name><last-name>B</last-name></author></title-info></description>
</FictionBook>"#,
    );

    library.run();

    assert_eq!(library.books_of("A B"), vec!["«Unknown Title», A B.fb2"]);
}

#[test]
fn test_other_files_are_ignored() {
    let library = TestLibrary::new();
    library.add_file("notes.txt", b"hello");
    library.add_file("cover.jpg", b"\xFF\xD8");

    let summary = library.run();

    assert!(summary.processed.is_empty());
    assert!(summary.skipped.is_empty());
    assert_eq!(
        library.loose_files(),
        vec!["cover.jpg", "notes.txt", "output.fb2"]
    );
}

#[test]
fn test_rename_failure_skips_only_that_book() {
    let library = TestLibrary::new();
    // Normalized name is far beyond the 255-byte file name limit.
    let title = "Очень длинное название книги ".repeat(12);
    library.add_fb2("long.fb2", &title, &[("Фрэнк", "Герберт")]);
    library.add_fb2("z_dune.fb2", "Дюна", &[("Фрэнк", "Герберт")]);

    let summary = library.run();

    assert_eq!(summary.processed.len(), 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].kind, FailureKind::Organize);
    assert!(library.path("long.fb2").is_file());
    assert_eq!(
        library.books_of("Фрэнк Герберт"),
        vec!["«Дюна», Фрэнк Герберт.fb2"]
    );
    assert!(summary.catalog.is_some());
    assert!(library.catalog().contains("  - Дюна"));
}

#[test]
fn test_same_normalized_name_keeps_both_files() {
    let library = TestLibrary::new();
    library.add_fb2("a.fb2", "Дюна", &[("Фрэнк", "Герберт")]);
    library.add_fb2("b.fb2", "Дюна", &[("Фрэнк", "Герберт")]);

    let summary = library.run();

    assert_eq!(summary.processed.len(), 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].path, library.path("b.fb2"));
    assert!(summary.skipped[0].message.contains("already exists"));
    assert_eq!(library.loose_files(), vec!["b.fb2", "output.fb2"]);
    assert_eq!(
        library.books_of("Фрэнк Герберт"),
        vec!["«Дюна», Фрэнк Герберт.fb2"]
    );

    // The leftover copy is refused again instead of overwriting the sorted one.
    let summary = library.run();
    assert_eq!(summary.skipped.len(), 1);
    assert!(library.path("b.fb2").is_file());
}

#[test]
fn test_blank_creator_goes_to_unknown() {
    let library = TestLibrary::new();
    library.add_file(
        "blank.epub",
        &epub_with_metadata("<dc:title>T</dc:title><dc:creator/>"),
    );

    let summary = library.run();

    assert_eq!(summary.processed[0].file_name, "«T», Unknown.epub");
    assert_eq!(library.books_of("Unknown"), vec!["«T», Unknown.epub"]);
    assert_eq!(library.loose_files(), vec!["output.fb2"]);
    assert!(library.catalog().contains(r#"href="Unknown/«T», Unknown.epub""#));
}

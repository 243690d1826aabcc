//! Running over a library that was sorted before.

use crate::common::{TestLibrary, empty_dirs};

#[test]
fn test_second_run_is_a_no_op() {
    let library = TestLibrary::new();
    library.add_fb2("a.fb2", "Один", &[("Иван", "Петров")]);
    library.add_epub("b.epub", "Два", &["Анна Смирнова"]);

    library.run();
    let dirs = library.dirs();
    let catalog = library.catalog();

    let summary = library.run();

    assert!(summary.processed.is_empty());
    assert!(summary.skipped.is_empty());
    assert_eq!(summary.seeded_authors, 2);
    assert_eq!(library.dirs(), dirs);
    // Seeded folders come back in name order, so author blocks may swap places.
    assert_eq!(sorted_lines(&library.catalog()), sorted_lines(&catalog));
    let organize = summary.organize.unwrap();
    assert!(organize.moved.is_empty());
    assert_eq!(organize.in_place, 2);
}

#[test]
fn test_rerun_catalog_follows_folder_order() {
    let library = TestLibrary::new();
    library.add_fb2("a.fb2", "Один", &[("Иван", "Петров")]);
    library.add_epub("b.epub", "Два", &["Анна Смирнова"]);

    library.run();
    let first = library.catalog();
    assert!(first.find("Иван Петров") < first.find("Анна Смирнова"));

    library.run();
    let second = library.catalog();
    assert!(second.find("Анна Смирнова") < second.find("Иван Петров"));
}

#[test]
fn test_existing_folder_spelling_wins() {
    let library = TestLibrary::new();
    library.add_fb2("a.fb2", "Один", &[("Иван", "Петров")]);
    library.run();

    library.add_fb2("new.fb2", "Три", &[("И.", "Петров")]);
    let summary = library.run();

    assert_eq!(summary.processed.len(), 1);
    assert_eq!(library.dirs(), vec!["Иван Петров"]);
    assert_eq!(
        library.books_of("Иван Петров"),
        vec!["«Один», Иван Петров.fb2", "«Три», И. Петров.fb2"]
    );
    assert_eq!(library.loose_files(), vec!["output.fb2"]);
}

#[test]
fn test_folders_with_equal_surnames_are_merged() {
    let library = TestLibrary::new();
    library.add_file("И. Петров/«Один», И. Петров.fb2", b"");
    library.add_file("Иван Петров/«Два», Иван Петров.fb2", b"");

    library.run();

    // Folder names sort "И. Петров" first, so its spelling is kept.
    assert_eq!(library.dirs(), vec!["И. Петров"]);
    assert_eq!(
        library.books_of("И. Петров"),
        vec!["«Два», Иван Петров.fb2", "«Один», И. Петров.fb2"]
    );
    assert!(empty_dirs(library.root()).is_empty());
}

#[test]
fn test_untitled_books_in_seeded_folders_stay_out_of_catalog() {
    let library = TestLibrary::new();
    library.add_file("Old Author/scan.fb2", b"");

    let summary = library.run();

    assert_eq!(library.books_of("Old Author"), vec!["scan.fb2"]);
    let catalog = summary.catalog.unwrap();
    assert_eq!(catalog.untitled, 1);
    assert_eq!(catalog.authors, 0);
    assert_eq!(catalog.orphan_headers, 1);
    assert!(!library.catalog().contains("Old Author"));
}

#[test]
fn test_leftover_empty_folders_are_removed() {
    let library = TestLibrary::new();
    std::fs::create_dir_all(library.path("Empty/Nested/Deeper")).unwrap();
    library.add_fb2("a.fb2", "Один", &[("Иван", "Петров")]);

    let summary = library.run();

    assert_eq!(library.dirs(), vec!["Иван Петров"]);
    assert!(empty_dirs(library.root()).is_empty());
    assert_eq!(summary.organize.unwrap().removed_dirs.len(), 3);
}

fn sorted_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().collect();
    lines.sort_unstable();
    lines
}

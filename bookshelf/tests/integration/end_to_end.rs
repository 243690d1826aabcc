//! Full runs over freshly populated libraries.

use bookshelf::catalog::{CatalogNode, parse};
use bookshelf::config::CatalogConfig;

use crate::common::{TestLibrary, empty_dirs};

#[test]
fn test_shared_surname_lands_in_one_folder() {
    let library = TestLibrary::new();
    library.add_fb2("a.fb2", "Один", &[("Иван", "Петров")]);
    library.add_fb2("b.fb2", "Два", &[("И.", "Петров")]);

    let summary = library.run();

    assert_eq!(library.dirs(), vec!["Иван Петров"]);
    assert_eq!(
        library.books_of("Иван Петров"),
        vec!["«Два», И. Петров.fb2", "«Один», Иван Петров.fb2"]
    );
    assert_eq!(library.loose_files(), vec!["output.fb2"]);
    assert!(empty_dirs(library.root()).is_empty());

    let catalog = summary.catalog.expect("catalog written");
    assert_eq!(catalog.authors, 1);
    assert_eq!(catalog.entries, 2);

    let parsed = parse(&library.catalog(), &CatalogConfig::default()).unwrap();
    assert_eq!(parsed.header_count(), 1);
    assert_eq!(parsed.nodes[0], CatalogNode::Header("Иван Петров".to_string()));
}

#[test]
fn test_mixed_formats_and_coauthors() {
    let library = TestLibrary::new();
    library.add_epub(
        "picnic.epub",
        "Пикник на обочине",
        &["Аркадий Стругацкий", "Борис Стругацкий"],
    );
    library.add_fb2(
        "monday.FB2",
        "Понедельник начинается в субботу",
        &[("Аркадий", "Стругацкий"), ("Борис", "Стругацкий")],
    );
    library.add_fb2("dune.fb2", "Дюна", &[("Фрэнк", "Герберт")]);

    let summary = library.run();

    assert_eq!(summary.processed.len(), 3);
    assert_eq!(
        library.dirs(),
        vec!["Аркадий Стругацкий, Борис Стругацкий", "Фрэнк Герберт"]
    );
    assert_eq!(
        library.books_of("Аркадий Стругацкий, Борис Стругацкий"),
        vec![
            "«Пикник на обочине», Аркадий Стругацкий, Борис Стругацкий.epub",
            "«Понедельник начинается в субботу», Аркадий Стругацкий, Борис Стругацкий.fb2",
        ]
    );
}

#[test]
fn test_catalog_links_and_labels() {
    let library = TestLibrary::new();
    library.add_fb2("dune.fb2", "Дюна", &[("Фрэнк", "Герберт")]);

    library.run();
    let text = library.catalog();

    assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(text.contains(r#"xmlns="http://www.gribuser.ru/xml/fictionbook/2.0""#));
    assert!(text.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
    assert!(text.contains("<book-title>MyLibrary</book-title>"));
    assert!(text.contains("<subtitle>Фрэнк Герберт</subtitle>"));
    assert!(text.contains(
        r#"<a xlink:href="Фрэнк Герберт/«Дюна», Фрэнк Герберт.fb2">  - Дюна</a>"#
    ));

    let parsed = parse(&text, &CatalogConfig::default()).unwrap();
    for node in &parsed.nodes {
        if let CatalogNode::Entry { href, .. } = node {
            assert!(library.path(href).is_file(), "dangling link {href}");
        }
    }
}

#[test]
fn test_hostile_characters_are_stripped() {
    let library = TestLibrary::new();
    library.add_fb2("messiah.fb2", "Dune: Messiah?", &[("Frank", "Herbert")]);

    library.run();

    assert_eq!(
        library.books_of("Frank Herbert"),
        vec!["«Dune Messiah», Frank Herbert.fb2"]
    );
}

#[test]
fn test_book_without_authors_goes_to_unknown() {
    let library = TestLibrary::new();
    library.add_epub("anon.epub", "Beowulf", &[]);

    library.run();

    assert_eq!(library.books_of("Unknown"), vec!["«Beowulf», Unknown.epub"]);
}

#[test]
fn test_empty_library_gets_empty_catalog() {
    let library = TestLibrary::new();

    let summary = library.run();

    assert!(summary.authors.is_empty());
    assert_eq!(library.loose_files(), vec!["output.fb2"]);
    let parsed = parse(&library.catalog(), &CatalogConfig::default()).unwrap();
    assert!(parsed.nodes.is_empty());
}

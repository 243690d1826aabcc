//! Dry runs plan the layout without touching the library.

use bookshelf::library::AuthorGroup;

use crate::common::TestLibrary;

#[test]
fn test_dry_run_leaves_library_untouched() {
    let library = TestLibrary::new();
    library.add_fb2("a.fb2", "Один", &[("Иван", "Петров")]);
    library.add_fb2("b.fb2", "Два", &[("И.", "Петров")]);
    std::fs::create_dir(library.path("Empty")).unwrap();

    let mut config = library.config();
    config.dry_run = true;
    let summary = library.run_with(config);

    assert_eq!(library.loose_files(), vec!["a.fb2", "b.fb2"]);
    assert_eq!(library.dirs(), vec!["Empty"]);
    assert!(summary.organize.is_none());
    assert!(summary.catalog.is_none());

    assert_eq!(
        summary.authors,
        vec![
            AuthorGroup {
                author: "Empty".to_string(),
                books: vec![],
            },
            AuthorGroup {
                author: "Иван Петров".to_string(),
                books: vec![
                    "«Два», И. Петров.fb2".to_string(),
                    "«Один», Иван Петров.fb2".to_string(),
                ],
            },
        ]
    );
}

#[test]
fn test_dry_run_matches_real_run() {
    let planned = TestLibrary::new();
    let real = TestLibrary::new();
    for library in [&planned, &real] {
        library.add_epub("x.epub", "Пикник на обочине", &["Аркадий Стругацкий"]);
        library.add_fb2("y.fb2", "Дюна", &[("Фрэнк", "Герберт")]);
    }

    let mut config = planned.config();
    config.dry_run = true;
    let plan = planned.run_with(config);
    let done = real.run();

    assert_eq!(plan.authors, done.authors);
    let names = |s: &bookshelf::RunSummary| {
        s.processed
            .iter()
            .map(|b| b.file_name.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&plan), names(&done));
}

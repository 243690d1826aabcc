//! Shared helpers for the integration tests.
//!
//! Books are generated on the fly into a scratch library, so the tests need
//! no checked-in fixtures.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bookshelf::config::Config;
use bookshelf::library::{Library, RunSummary};
use zip::write::SimpleFileOptions;

/// FB2 document with the given title and `(first, last)` author names.
pub fn fb2_document(title: &str, authors: &[(&str, &str)]) -> String {
    let authors: String = authors
        .iter()
        .map(|(first, last)| {
            format!("<author><first-name>{first}</first-name><last-name>{last}</last-name></author>")
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0" xmlns:l="http://www.w3.org/1999/xlink">
  <description>
    <title-info>{authors}<book-title>{title}</book-title><lang>ru</lang></title-info>
  </description>
  <body><section><p>...</p></section></body>
</FictionBook>"#
    )
}

/// EPUB archive bytes with the given title and creators.
pub fn epub_archive(title: &str, creators: &[&str]) -> Vec<u8> {
    let creators: String = creators
        .iter()
        .map(|c| format!("<dc:creator>{c}</dc:creator>"))
        .collect();
    epub_with_metadata(&format!("<dc:title>{title}</dc:title>{creators}"))
}

/// EPUB archive bytes whose package metadata holds `metadata` verbatim.
pub fn epub_with_metadata(metadata: &str) -> Vec<u8> {
    let container = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles><rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/></rootfiles>
</container>"#;

    let package = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">{metadata}</metadata>
</package>"#
    );

    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, body) in [
        ("mimetype", "application/epub+zip"),
        ("META-INF/container.xml", container),
        ("OEBPS/content.opf", package.as_str()),
    ] {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A scratch library folder.
pub struct TestLibrary {
    dir: tempfile::TempDir,
}

impl TestLibrary {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn add_fb2(&self, name: &str, title: &str, authors: &[(&str, &str)]) -> PathBuf {
        self.add_file(name, fb2_document(title, authors).as_bytes())
    }

    pub fn add_epub(&self, name: &str, title: &str, creators: &[&str]) -> PathBuf {
        self.add_file(name, &epub_archive(title, creators))
    }

    pub fn add_file(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, bytes).unwrap();
        path
    }

    pub fn config(&self) -> Config {
        let mut config = Config::for_library(self.root());
        config.quiet = true;
        config
    }

    pub fn run(&self) -> RunSummary {
        self.run_with(self.config())
    }

    pub fn run_with(&self, config: Config) -> RunSummary {
        Library::new(config).run().expect("library run failed")
    }

    /// Sorted names of the top-level directories.
    pub fn dirs(&self) -> Vec<String> {
        self.entries(|p| p.is_dir())
    }

    /// Sorted names of the top-level files.
    pub fn loose_files(&self) -> Vec<String> {
        self.entries(|p| p.is_file())
    }

    /// Sorted file names inside `author`.
    pub fn books_of(&self, author: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(author))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn catalog(&self) -> String {
        fs::read_to_string(self.path("output.fb2")).expect("catalog not written")
    }

    fn entries(&self, keep: impl Fn(&Path) -> bool) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| keep(p))
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Directories anywhere below `root` that contain nothing.
pub fn empty_dirs(root: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .filter(|e| fs::read_dir(e.path()).unwrap().next().is_none())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

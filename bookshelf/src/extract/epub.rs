//! EPUB metadata.
//!
//! The container manifest names the package document; title and creators
//! come from the package document's Dublin Core metadata.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::BookMetadata;
use super::query::{Query, parse_document};
use crate::config::ExtractorConfig;
use crate::error::{BookshelfError, Result};

type Archive = zip::ZipArchive<BufReader<File>>;

pub(super) fn extract(path: &Path, config: &ExtractorConfig) -> Result<BookMetadata> {
    let queries = &config.epub;
    let ns = &config.namespaces;

    let file = File::open(path).map_err(|e| BookshelfError::FailedToReadBook {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut archive =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|e| BookshelfError::InvalidArchive {
            path: path.to_path_buf(),
            source: e,
        })?;

    let manifest = read_entry(&mut archive, path, &queries.manifest_entry)?;
    let manifest_doc = parse_document(&manifest)
        .map_err(|e| BookshelfError::malformed_document(path.to_path_buf(), e.to_string()))?;

    let container = Query::parse(&queries.container)?;
    let package_path = container
        .first_text(manifest_doc.root_element(), ns)?
        .ok_or_else(|| BookshelfError::missing_metadata(path.to_path_buf(), &queries.container))?
        .to_string();

    let package = read_entry(&mut archive, path, &package_path)?;
    let package_doc = parse_document(&package)
        .map_err(|e| BookshelfError::malformed_document(path.to_path_buf(), e.to_string()))?;
    let root = package_doc.root_element();

    let title = Query::parse(&queries.title)?
        .first_text(root, ns)?
        .ok_or_else(|| BookshelfError::missing_metadata(path.to_path_buf(), &queries.title))?
        .to_string();

    let authors = Query::parse(&queries.creator)?
        .select(root, ns)?
        .iter()
        .map(|creator| creator.text().unwrap_or_default().to_string())
        .collect();

    Ok(BookMetadata { title, authors })
}

fn read_entry(archive: &mut Archive, path: &Path, name: &str) -> Result<String> {
    let mut entry = archive.by_name(name).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => BookshelfError::MissingArchiveEntry {
            path: path.to_path_buf(),
            entry: name.to_string(),
        },
        other => BookshelfError::InvalidArchive {
            path: path.to_path_buf(),
            source: other,
        },
    })?;

    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| BookshelfError::FailedToReadBook {
            path: path.to_path_buf(),
            source: e,
        })?;

    String::from_utf8(bytes).map_err(|e| {
        BookshelfError::malformed_document(path.to_path_buf(), format!("{name}: {e}"))
    })
}

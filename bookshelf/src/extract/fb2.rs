//! FB2 metadata.
//!
//! FB2 is a single XML document; metadata sits in `description/title-info`.
//! Files in the wild are frequently windows-1251, so the declared encoding is
//! honored before parsing.

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use super::BookMetadata;
use super::query::{Query, parse_document};
use crate::config::ExtractorConfig;
use crate::error::{BookshelfError, Result};

/// Title used when the document has none.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

static DECLARED_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?-u)^(?:\xEF\xBB\xBF)?<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("static regex is valid")
});

pub(super) fn extract(path: &Path, config: &ExtractorConfig) -> Result<BookMetadata> {
    let bytes = std::fs::read(path).map_err(|e| BookshelfError::FailedToReadBook {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = decode(&bytes);

    let doc = parse_document(&text)
        .map_err(|e| BookshelfError::malformed_document(path.to_path_buf(), e.to_string()))?;
    let root = doc.root_element();
    let queries = &config.fb2;
    let ns = &config.namespaces;

    let title = Query::parse(&queries.title)?
        .first_text(root, ns)?
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_TITLE)
        .to_string();

    let first_name = Query::parse(&queries.first_name)?;
    let last_name = Query::parse(&queries.last_name)?;

    let mut authors = Vec::new();
    for author in Query::parse(&queries.author)?.select(root, ns)? {
        let Some(node) = author.node() else { continue };
        let first = first_name.first_text(node, ns)?;
        let last = last_name.first_text(node, ns)?;
        authors.push(author_name(first, last));
    }

    Ok(BookMetadata { title, authors })
}

/// A first name is required; a last name alone does not identify an author.
fn author_name(first: Option<&str>, last: Option<&str>) -> String {
    match (first, last) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(first), None) => first.to_string(),
        (None, _) => crate::naming::UNKNOWN_AUTHOR.to_string(),
    }
}

/// Decode raw FB2 bytes using the BOM or the encoding named in the prolog.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let encoding = DECLARED_ENCODING
        .captures(bytes)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::warn!("Invalid {} sequences replaced while decoding", used.name());
    }
    text
}

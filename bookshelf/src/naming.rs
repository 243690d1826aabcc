//! File and author-key naming.
//!
//! Everything that turns metadata into strings used on disk goes through
//! [`normalize`], so the same author spelled with stray punctuation or extra
//! whitespace always produces the same key.

use regex::Regex;
use std::sync::LazyLock;

/// Characters that never survive into a file or folder name.
pub const HOSTILE_CHARS: &[char] = &[
    '?', '!', '@', '#', '$', '%', '^', '&', '*', '_', '+', '|', '/', '\\', ':', ';', '[', ']',
    '{', '}', '<', '>', '=',
];

/// Author placeholder used when a book names nobody.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

static BRACKETED_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    // Non-greedy: the first «...» pair wins.
    Regex::new(r"«(.*?)»").expect("static regex is valid")
});

/// Canonical display/file-name form of `text`.
///
/// Hostile characters are deleted, then every whitespace run becomes a single
/// space and the ends are trimmed. Deleting before collapsing keeps the
/// function idempotent: `"a ? b"` becomes `"a b"`, not `"a  b"`.
///
/// ```
/// use bookshelf::naming::normalize;
///
/// assert_eq!(normalize("  Dune:\tMessiah  "), "Dune Messiah");
/// assert_eq!(normalize(&normalize("a ? b")), normalize("a ? b"));
/// ```
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .trim_start()
        .chars()
        .filter(|c| !HOSTILE_CHARS.contains(c))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// File name for a book: `«title», author1, author2.ext`, normalized.
pub fn book_file_name(title: &str, authors: &[String], extension: &str) -> String {
    normalize(&format!("«{title}», {}.{extension}", authors.join(", ")))
}

/// Registry key for an ordered author list.
pub fn author_key(authors: &[String]) -> String {
    normalize(&authors.join(", "))
}

/// Title between the first `«` and `»` in `name`, if any.
pub fn bracketed_title(name: &str) -> Option<&str> {
    BRACKETED_TITLE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split a key back into its component author names.
pub fn key_names(key: &str) -> impl Iterator<Item = &str> {
    key.split(", ")
}

/// Surname of a single author name: its last whitespace-delimited token.
///
/// A name without any token (empty or blank) is its own surname.
pub fn surname(name: &str) -> &str {
    name.split_whitespace().next_back().unwrap_or(name)
}

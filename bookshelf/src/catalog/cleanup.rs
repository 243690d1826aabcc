//! Catalog repair passes.
//!
//! Generation is naive: it emits every author and every titled book. These
//! passes bring the result in line with what is actually on disk.

use std::collections::HashSet;

use super::CatalogNode;

/// Serialized form of a spacer node. Spacer lines are never deduplicated.
pub const SPACER_MARKER: &str = "<empty-line/>";

/// Counters for what the repair passes removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneStats {
    /// Entries whose link target does not exist.
    pub dangling_links: usize,
    /// Headers not followed by any entry.
    pub orphan_headers: usize,
}

/// Drop every line identical to an earlier one, except spacer lines.
///
/// Returns the cleaned text and how many lines were dropped. First-seen order
/// is preserved.
pub fn dedup_lines(text: &str) -> (String, usize) {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut dropped = 0;

    for line in text.split('\n') {
        if line.contains(SPACER_MARKER) || seen.insert(line) {
            kept.push(line);
        } else {
            dropped += 1;
        }
    }

    (kept.join("\n"), dropped)
}

/// Drop dangling entries, then headers left without an entry right after them.
///
/// `exists` decides whether a link target is present. A header is kept only if
/// the node directly following it, once dangling entries are gone, is an
/// entry. Both rules are applied in one backward walk.
pub fn prune<F>(nodes: Vec<CatalogNode>, exists: F) -> (Vec<CatalogNode>, PruneStats)
where
    F: Fn(&str) -> bool,
{
    let mut stats = PruneStats::default();
    let mut kept = Vec::with_capacity(nodes.len());
    let mut next_is_entry = false;

    for node in nodes.into_iter().rev() {
        match node {
            CatalogNode::Entry { ref href, .. } if !exists(href) => {
                log::debug!("Dropping catalog link to missing file: {href}");
                stats.dangling_links += 1;
            }
            CatalogNode::Entry { .. } => {
                next_is_entry = true;
                kept.push(node);
            }
            CatalogNode::Header(ref author) => {
                if next_is_entry {
                    kept.push(node);
                } else {
                    log::debug!("Dropping catalog header without books: {author}");
                    stats.orphan_headers += 1;
                }
                next_is_entry = false;
            }
            CatalogNode::Spacer => {
                next_is_entry = false;
                kept.push(node);
            }
        }
    }

    kept.reverse();
    (kept, stats)
}

//! PDF bookmark (outline) support
//!
//! The engine exposes the outline only as "first child of X" and "next
//! sibling of X" links. [`load_outline`] walks those links inside a single
//! engine session and rebuilds an ordered forest of [`Bookmark`] values.
//!
//! Malformed outlines never fail the call: a sibling link back into the
//! chain being walked ends that chain, a child link back to an enclosing
//! entry drops those children, a missing destination yields page 0, and
//! nesting deeper than [`OutlineOptions::max_depth`] is dropped.

use crate::config::OutlineOptions;
use crate::engine::{DocumentRef, Engine, OutlineRef};
use crate::gate::EngineSession;
use crate::wide_text;
use serde::Serialize;
use std::collections::HashSet;

/// A bookmark (outline item) in a PDF document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Bookmark {
    /// The display text.
    pub title: String,
    /// Zero-based destination page; 0 when the bookmark has no destination.
    pub page_index: usize,
    /// Child bookmarks, in document order.
    pub children: Vec<Bookmark>,
}

impl Bookmark {
    /// Number of bookmarks in this subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Bookmark::count).sum::<usize>()
    }

    /// Flatten a forest into a pre-order list with depth information.
    ///
    /// This is useful for building a table of contents UI.
    pub fn flatten(forest: &[Bookmark]) -> Vec<FlatBookmark> {
        let mut result = Vec::new();
        flatten_recursive(forest, 0, &mut result);
        result
    }
}

/// A flattened bookmark entry with depth information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatBookmark {
    /// The bookmark title.
    pub title: String,
    /// The destination page index (0-based).
    pub page_index: usize,
    /// The depth in the tree (0 = root level).
    pub depth: usize,
}

fn flatten_recursive(forest: &[Bookmark], depth: usize, result: &mut Vec<FlatBookmark>) {
    for bookmark in forest {
        result.push(FlatBookmark {
            title: bookmark.title.clone(),
            page_index: bookmark.page_index,
            depth,
        });
        flatten_recursive(&bookmark.children, depth + 1, result);
    }
}

/// Load the whole outline of `doc`. Runs entirely inside `session`.
pub(crate) fn load_outline(
    session: &EngineSession<'_, dyn Engine>,
    doc: DocumentRef,
    options: OutlineOptions,
) -> Vec<Bookmark> {
    let mut loader = OutlineLoader {
        engine: &**session,
        doc,
        options,
        ancestors: Vec::new(),
    };
    loader.load_chain(session.first_child(doc, None), 0)
}

struct OutlineLoader<'s> {
    engine: &'s dyn Engine,
    doc: DocumentRef,
    options: OutlineOptions,
    /// Entries whose children are being loaded, outermost first.
    ancestors: Vec<OutlineRef>,
}

impl OutlineLoader<'_> {
    /// Load one sibling chain starting at `first`.
    ///
    /// The chain head is part of the visited set, so a last-to-first sibling
    /// loop yields each entry once (A, B, C) rather than repeating the head
    /// (A, B, C, A).
    fn load_chain(&mut self, first: Option<OutlineRef>, depth: usize) -> Vec<Bookmark> {
        let Some(first) = first else {
            return Vec::new();
        };

        // Visited set is per chain: a cycle through sibling links can only
        // come back to a node of this same chain.
        let mut visited = HashSet::from([first]);
        let mut bookmarks = vec![self.load_bookmark(first, depth)];

        let mut current = first;
        while let Some(next) = self.engine.next_sibling(self.doc, current) {
            if !visited.insert(next) {
                log::warn!(
                    "Bookmark sibling loop at depth {depth} (entry {:#x} revisited), truncating after {} entries",
                    next.as_raw(),
                    bookmarks.len()
                );
                break;
            }
            bookmarks.push(self.load_bookmark(next, depth));
            current = next;
        }

        bookmarks
    }

    fn load_bookmark(&mut self, node: OutlineRef, depth: usize) -> Bookmark {
        let title = wide_text::read_trimmed(
            |buffer| self.engine.bookmark_title(self.doc, node, buffer),
            "bookmark title",
        );
        let page_index = self.page_index(node);

        let children = match self.engine.first_child(self.doc, Some(node)) {
            None => Vec::new(),
            Some(child)
                if child == node
                    || self.ancestors.contains(&node)
                    || self.ancestors.contains(&child) =>
            {
                log::warn!(
                    "Bookmark {title:?} links back to an enclosing entry, dropping its children"
                );
                Vec::new()
            }
            Some(_) if depth + 1 >= self.options.max_depth => {
                log::warn!(
                    "Bookmark {title:?} nests deeper than {} levels, dropping its children",
                    self.options.max_depth
                );
                Vec::new()
            }
            Some(child) => {
                self.ancestors.push(node);
                let children = self.load_chain(Some(child), depth + 1);
                self.ancestors.pop();
                children
            }
        };

        Bookmark {
            title,
            page_index,
            children,
        }
    }

    fn page_index(&self, node: OutlineRef) -> usize {
        let Some(dest) = self.engine.bookmark_dest(self.doc, node) else {
            return 0;
        };
        let index = self.engine.dest_page_index(self.doc, dest);
        usize::try_from(index).unwrap_or_else(|_| {
            log::warn!("Bookmark destination has invalid page index {index}, using 0");
            0
        })
    }
}

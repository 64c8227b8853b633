//! In-memory engine.
//!
//! Serves scripted documents instead of parsing PDF files. Documents are
//! registered under the exact bytes that open them; opening from a path
//! reads the file and looks its content up, so a path open and a bytes open
//! of the same content see the same document.
//!
//! The engine also keeps counters (open attempts, closes, live documents) and
//! detects overlapping calls, which makes the gate's guarantees observable.
//!
//! # Example
//!
//! ```
//! use docnet_core::{DocLib, MemoryBookmark, MemoryDocument, MemoryEngine, PageDimensions};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(MemoryEngine::new());
//! engine.register(
//!     b"%PDF-1.7 sample".to_vec(),
//!     MemoryDocument::new(19)
//!         .with_meta("Title", "PDF - Wikipedia")
//!         .with_bookmarks(vec![MemoryBookmark::new("Introduction").with_page(0)]),
//! );
//!
//! let lib = DocLib::with_engine(engine.clone());
//! let reader = lib.doc_reader_from_bytes(
//!     b"%PDF-1.7 sample".to_vec(),
//!     None,
//!     PageDimensions::new(10, 10)?,
//! )?;
//! assert_eq!(reader.page_count()?, 19);
//! assert_eq!(reader.meta_text("Title")?, "PDF - Wikipedia");
//! # Ok::<(), docnet_core::DocnetError>(())
//! ```

use super::{DestRef, DocumentRef, Engine, ErrorCode, OutlineRef};
use std::collections::HashMap;
use std::ffi::CStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A bookmark in a scripted outline.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryBookmark {
    title: String,
    page: Option<i32>,
    children: Vec<MemoryBookmark>,
}

impl MemoryBookmark {
    /// A bookmark without destination or children.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            page: None,
            children: Vec::new(),
        }
    }

    /// Give the bookmark a destination page. Negative values model a
    /// destination the engine cannot resolve.
    pub fn with_page(mut self, page: i32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_children(mut self, children: Vec<MemoryBookmark>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone)]
struct OutlineNode {
    /// UTF-16LE title including the terminator
    title: Vec<u8>,
    dest_page: Option<i32>,
    first_child: Option<usize>,
    next_sibling: Option<usize>,
}

/// A scripted document.
///
/// Outline nodes are numbered in pre-order starting at 0, which is the
/// numbering used by [`MemoryDocument::link_next_sibling`] and
/// [`MemoryDocument::link_first_child`].
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    version: Option<i32>,
    page_count: i32,
    page_size: (f64, f64),
    metadata: HashMap<String, String>,
    password: Option<String>,
    nodes: Vec<OutlineNode>,
    root: Option<usize>,
}

impl MemoryDocument {
    /// A PDF 1.7 document with `page_count` US-letter pages and no outline.
    pub fn new(page_count: i32) -> Self {
        Self {
            version: Some(17),
            page_count,
            page_size: (612.0, 792.0),
            metadata: HashMap::new(),
            password: None,
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = Some(version);
        self
    }

    /// Make version retrieval fail.
    pub fn without_version(mut self) -> Self {
        self.version = None;
        self
    }

    pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
        self.page_size = (width, height);
        self
    }

    pub fn with_meta(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(tag.into(), value.into());
        self
    }

    /// Require `password` to open the document.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Replace the outline with `bookmarks` (root level, in order).
    pub fn with_bookmarks(mut self, bookmarks: Vec<MemoryBookmark>) -> Self {
        self.nodes.clear();
        self.root = push_chain(&mut self.nodes, &bookmarks);
        self
    }

    /// Point node `from`'s next-sibling link at node `to`.
    pub fn link_next_sibling(mut self, from: usize, to: usize) -> Self {
        if let Some(node) = self.nodes.get_mut(from) {
            node.next_sibling = Some(to);
        }
        self
    }

    /// Point node `from`'s first-child link at node `to`.
    pub fn link_first_child(mut self, from: usize, to: usize) -> Self {
        if let Some(node) = self.nodes.get_mut(from) {
            node.first_child = Some(to);
        }
        self
    }

    fn node(&self, node: OutlineRef) -> Option<&OutlineNode> {
        self.nodes.get(node.as_raw() - 1)
    }
}

fn push_chain(nodes: &mut Vec<OutlineNode>, items: &[MemoryBookmark]) -> Option<usize> {
    let mut first = None;
    let mut prev: Option<usize> = None;

    for item in items {
        let index = nodes.len();
        let mut title = encode_utf16le(&item.title);
        title.extend_from_slice(&[0, 0]);
        nodes.push(OutlineNode {
            title,
            dest_page: item.page,
            first_child: None,
            next_sibling: None,
        });

        nodes[index].first_child = push_chain(nodes, &item.children);
        match prev {
            Some(p) => nodes[p].next_sibling = Some(index),
            None => first = Some(index),
        }
        prev = Some(index);
    }

    first
}

fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Two-phase copy: fills `buffer` only when it is large enough.
fn copy_out(payload: &[u8], buffer: &mut [u8]) -> usize {
    if buffer.len() >= payload.len() {
        buffer[..payload.len()].copy_from_slice(payload);
    }
    payload.len()
}

fn node_ref(index: Option<usize>) -> Option<OutlineRef> {
    index.and_then(|i| OutlineRef::from_raw(i + 1))
}

/// Engine serving [`MemoryDocument`]s.
#[derive(Default)]
pub struct MemoryEngine {
    library: Mutex<HashMap<Vec<u8>, Arc<MemoryDocument>>>,
    open: Mutex<HashMap<DocumentRef, Arc<MemoryDocument>>>,
    next_id: AtomicUsize,
    open_attempts: AtomicUsize,
    closes: AtomicUsize,
    stale_calls: AtomicUsize,
    busy: AtomicBool,
    overlaps: AtomicUsize,
    call_delay: Option<Duration>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep inside every call. Widens the window in which an ungated
    /// concurrent call would be detected.
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = Some(delay);
        self
    }

    /// Serve `document` to opens of exactly `content`.
    pub fn register(&self, content: Vec<u8>, document: MemoryDocument) {
        lock(&self.library).insert(content, Arc::new(document));
    }

    /// Number of open calls received, successful or not.
    pub fn open_attempts(&self) -> usize {
        self.open_attempts.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Documents opened and not yet closed.
    pub fn live_documents(&self) -> usize {
        lock(&self.open).len()
    }

    /// Calls that named a document which was not open.
    pub fn stale_calls(&self) -> usize {
        self.stale_calls.load(Ordering::SeqCst)
    }

    /// Calls that started while another call was still running.
    pub fn overlapping_calls(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    fn enter(&self) -> CallProbe<'_> {
        if self.busy.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        if let Some(delay) = self.call_delay {
            std::thread::sleep(delay);
        }
        CallProbe { busy: &self.busy }
    }

    fn document(&self, doc: DocumentRef) -> Option<Arc<MemoryDocument>> {
        let found = lock(&self.open).get(&doc).cloned();
        if found.is_none() {
            self.stale_calls.fetch_add(1, Ordering::SeqCst);
        }
        found
    }

    fn open_content(
        &self,
        content: &[u8],
        password: Option<&CStr>,
    ) -> Result<DocumentRef, ErrorCode> {
        let document = lock(&self.library)
            .get(content)
            .cloned()
            .ok_or(ErrorCode::FORMAT)?;

        if let Some(expected) = &document.password {
            if password.map(CStr::to_bytes) != Some(expected.as_bytes()) {
                return Err(ErrorCode::PASSWORD);
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let doc = DocumentRef::from_raw(id).ok_or(ErrorCode::UNKNOWN)?;
        lock(&self.open).insert(doc, document);
        Ok(doc)
    }
}

struct CallProbe<'a> {
    busy: &'a AtomicBool,
}

impl Drop for CallProbe<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Engine for MemoryEngine {
    fn open_file(&self, path: &CStr, password: Option<&CStr>) -> Result<DocumentRef, ErrorCode> {
        let _probe = self.enter();
        self.open_attempts.fetch_add(1, Ordering::SeqCst);

        let path = path.to_str().map_err(|_| ErrorCode::FILE)?;
        let content = std::fs::read(path).map_err(|_| ErrorCode::FILE)?;
        self.open_content(&content, password)
    }

    fn open_memory(
        &self,
        data: &[u8],
        password: Option<&CStr>,
    ) -> Result<DocumentRef, ErrorCode> {
        let _probe = self.enter();
        self.open_attempts.fetch_add(1, Ordering::SeqCst);
        self.open_content(data, password)
    }

    fn close_document(&self, doc: DocumentRef) {
        let _probe = self.enter();
        if lock(&self.open).remove(&doc).is_some() {
            self.closes.fetch_add(1, Ordering::SeqCst);
        } else {
            self.stale_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn file_version(&self, doc: DocumentRef) -> Option<i32> {
        let _probe = self.enter();
        self.document(doc)?.version
    }

    fn page_count(&self, doc: DocumentRef) -> i32 {
        let _probe = self.enter();
        self.document(doc).map_or(0, |d| d.page_count)
    }

    fn page_size(&self, doc: DocumentRef, page_index: i32) -> Option<(f64, f64)> {
        let _probe = self.enter();
        let document = self.document(doc)?;
        (0..document.page_count)
            .contains(&page_index)
            .then_some(document.page_size)
    }

    fn meta_text(&self, doc: DocumentRef, tag: &CStr, buffer: &mut [u8]) -> usize {
        let _probe = self.enter();
        let Some(document) = self.document(doc) else {
            return 0;
        };
        let value = tag
            .to_str()
            .ok()
            .and_then(|t| document.metadata.get(t))
            .map(|v| encode_utf16le(v))
            .unwrap_or_default();

        let mut payload = value;
        payload.extend_from_slice(&[0, 0]);
        copy_out(&payload, buffer)
    }

    fn first_child(&self, doc: DocumentRef, parent: Option<OutlineRef>) -> Option<OutlineRef> {
        let _probe = self.enter();
        let document = self.document(doc)?;
        match parent {
            None => node_ref(document.root),
            Some(node) => node_ref(document.node(node)?.first_child),
        }
    }

    fn next_sibling(&self, doc: DocumentRef, node: OutlineRef) -> Option<OutlineRef> {
        let _probe = self.enter();
        let document = self.document(doc)?;
        node_ref(document.node(node)?.next_sibling)
    }

    fn bookmark_title(&self, doc: DocumentRef, node: OutlineRef, buffer: &mut [u8]) -> usize {
        let _probe = self.enter();
        let Some(document) = self.document(doc) else {
            return 0;
        };
        document
            .node(node)
            .map_or(0, |n| copy_out(&n.title, buffer))
    }

    fn bookmark_dest(&self, doc: DocumentRef, node: OutlineRef) -> Option<DestRef> {
        let _probe = self.enter();
        let document = self.document(doc)?;
        document.node(node)?.dest_page?;
        DestRef::from_raw(node.as_raw())
    }

    fn dest_page_index(&self, doc: DocumentRef, dest: DestRef) -> i32 {
        let _probe = self.enter();
        self.document(doc)
            .and_then(|d| d.nodes.get(dest.as_raw() - 1).and_then(|n| n.dest_page))
            .unwrap_or(-1)
    }
}

//! PDFium engine adapter.
//!
//! Thin mapping from [`Engine`] onto `pdfium-sys`. Every method assumes the
//! caller holds the engine gate; nothing here locks.

use super::{DestRef, DocumentRef, Engine, ErrorCode, OutlineRef};
use pdfium_sys::{FPDF_BOOKMARK, FPDF_DEST, FPDF_DOCUMENT};
use std::ffi::{c_char, c_int, c_ulong, c_void, CStr};
use std::ptr;
use std::sync::OnceLock;

/// Global `PDFium` initialization. Never torn down.
static PDFIUM_INIT: OnceLock<()> = OnceLock::new();

/// Engine backed by the native PDFium library.
#[derive(Debug)]
pub struct PdfiumEngine {
    _initialized: bool,
}

impl PdfiumEngine {
    /// Initialize the `PDFium` library.
    ///
    /// `FPDF_InitLibrary()` runs once per process no matter how many engines
    /// are created. `FPDF_DestroyLibrary()` is never called.
    #[must_use = "constructors return a new instance"]
    pub fn new() -> Self {
        PDFIUM_INIT.get_or_init(|| {
            // SAFETY:
            // - Called exactly once due to OnceLock
            // - No other PDFium call can happen before an engine exists
            unsafe {
                pdfium_sys::FPDF_InitLibrary();
            }
            log::debug!("PDFium library initialized");
        });
        Self { _initialized: true }
    }
}

impl Default for PdfiumEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn doc_ptr(doc: DocumentRef) -> FPDF_DOCUMENT {
    doc.as_raw() as FPDF_DOCUMENT
}

fn bookmark_ptr(node: Option<OutlineRef>) -> FPDF_BOOKMARK {
    node.map_or(ptr::null_mut(), |n| n.as_raw() as FPDF_BOOKMARK)
}

fn dest_ptr(dest: DestRef) -> FPDF_DEST {
    dest.as_raw() as FPDF_DEST
}

fn password_ptr(password: Option<&CStr>) -> *const c_char {
    password.map_or(ptr::null(), CStr::as_ptr)
}

/// Empty buffers are passed as (null, 0), which PDFium treats as a size query.
fn buffer_args(buffer: &mut [u8]) -> (*mut c_void, c_ulong) {
    if buffer.is_empty() {
        (ptr::null_mut(), 0)
    } else {
        (buffer.as_mut_ptr().cast::<c_void>(), buffer.len() as c_ulong)
    }
}

fn last_error() -> ErrorCode {
    // SAFETY: reads PDFium's last-error slot, which the failing call just set
    let code = unsafe { pdfium_sys::FPDF_GetLastError() };
    ErrorCode::new(u32::try_from(code).unwrap_or(u32::MAX))
}

impl Engine for PdfiumEngine {
    fn open_file(&self, path: &CStr, password: Option<&CStr>) -> Result<DocumentRef, ErrorCode> {
        // SAFETY:
        // - path is a valid null-terminated C string
        // - password pointer is either null or a valid null-terminated C string
        let raw = unsafe { pdfium_sys::FPDF_LoadDocument(path.as_ptr(), password_ptr(password)) };
        DocumentRef::from_raw(raw as usize).ok_or_else(last_error)
    }

    fn open_memory(
        &self,
        data: &[u8],
        password: Option<&CStr>,
    ) -> Result<DocumentRef, ErrorCode> {
        let size = c_int::try_from(data.len()).map_err(|_| ErrorCode::FILE)?;
        // SAFETY:
        // - data.as_ptr() is valid for data.len() bytes
        // - PDFium keeps the pointer until FPDF_CloseDocument; the caller keeps
        //   the buffer alive and unmodified until then
        let raw = unsafe {
            pdfium_sys::FPDF_LoadMemDocument(
                data.as_ptr().cast::<c_void>(),
                size,
                password_ptr(password),
            )
        };
        DocumentRef::from_raw(raw as usize).ok_or_else(last_error)
    }

    fn close_document(&self, doc: DocumentRef) {
        // SAFETY:
        // - doc was returned by FPDF_LoadDocument/FPDF_LoadMemDocument
        // - DocumentHandle closes each document exactly once
        unsafe { pdfium_sys::FPDF_CloseDocument(doc_ptr(doc)) }
    }

    fn file_version(&self, doc: DocumentRef) -> Option<i32> {
        let mut version: c_int = 0;
        // SAFETY: doc is open, version is a valid out-pointer
        let ok = unsafe { pdfium_sys::FPDF_GetFileVersion(doc_ptr(doc), &mut version) };
        (ok != 0).then_some(version)
    }

    fn page_count(&self, doc: DocumentRef) -> i32 {
        // SAFETY: doc is open
        unsafe { pdfium_sys::FPDF_GetPageCount(doc_ptr(doc)) }
    }

    fn page_size(&self, doc: DocumentRef, page_index: i32) -> Option<(f64, f64)> {
        let mut width = 0.0;
        let mut height = 0.0;
        // SAFETY: doc is open, width/height are valid out-pointers; PDFium
        // returns 0 for an out-of-range index
        let ok = unsafe {
            pdfium_sys::FPDF_GetPageSizeByIndex(doc_ptr(doc), page_index, &mut width, &mut height)
        };
        (ok != 0).then_some((width, height))
    }

    fn meta_text(&self, doc: DocumentRef, tag: &CStr, buffer: &mut [u8]) -> usize {
        let (buf, len) = buffer_args(buffer);
        // SAFETY:
        // - doc is open, tag is a valid null-terminated C string
        // - buf is null (size query) or valid for len bytes
        let needed = unsafe { pdfium_sys::FPDF_GetMetaText(doc_ptr(doc), tag.as_ptr(), buf, len) };
        needed as usize
    }

    fn first_child(&self, doc: DocumentRef, parent: Option<OutlineRef>) -> Option<OutlineRef> {
        // SAFETY: doc is open; a null bookmark asks for the root's first child
        let raw =
            unsafe { pdfium_sys::FPDFBookmark_GetFirstChild(doc_ptr(doc), bookmark_ptr(parent)) };
        OutlineRef::from_raw(raw as usize)
    }

    fn next_sibling(&self, doc: DocumentRef, node: OutlineRef) -> Option<OutlineRef> {
        // SAFETY: doc is open, node came from this document's outline
        let raw = unsafe {
            pdfium_sys::FPDFBookmark_GetNextSibling(doc_ptr(doc), bookmark_ptr(Some(node)))
        };
        OutlineRef::from_raw(raw as usize)
    }

    fn bookmark_title(&self, _doc: DocumentRef, node: OutlineRef, buffer: &mut [u8]) -> usize {
        let (buf, len) = buffer_args(buffer);
        // SAFETY: node is a live bookmark, buf is null (size query) or valid for len bytes
        let needed = unsafe { pdfium_sys::FPDFBookmark_GetTitle(bookmark_ptr(Some(node)), buf, len) };
        needed as usize
    }

    fn bookmark_dest(&self, doc: DocumentRef, node: OutlineRef) -> Option<DestRef> {
        // SAFETY: doc is open, node is a live bookmark of doc
        let raw = unsafe { pdfium_sys::FPDFBookmark_GetDest(doc_ptr(doc), bookmark_ptr(Some(node))) };
        DestRef::from_raw(raw as usize)
    }

    fn dest_page_index(&self, doc: DocumentRef, dest: DestRef) -> i32 {
        // SAFETY: doc is open, dest was returned by FPDFBookmark_GetDest for doc
        unsafe { pdfium_sys::FPDFDest_GetDestPageIndex(doc_ptr(doc), dest_ptr(dest)) }
    }
}

//! Boundary to the native document engine.
//!
//! The [`Engine`] trait lists every operation the facade needs from the
//! underlying engine. Implementations are plain adapters: they do not lock,
//! cache or interpret anything. Serialization happens one level up, in
//! [`crate::gate`], and every call in this crate goes through it.
//!
//! Text accessors follow the engine's two-phase convention: called with an
//! empty buffer they return the required size in bytes (UTF-16LE, including
//! the two-byte terminator); called with a buffer at least that large they
//! fill it and return the same size.

use std::ffi::CStr;
use std::fmt;
use std::num::NonZeroUsize;

pub mod memory;
#[cfg(feature = "pdfium")]
pub mod pdfium;

pub use memory::{MemoryBookmark, MemoryDocument, MemoryEngine};
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumEngine;

macro_rules! native_ref {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(NonZeroUsize);

        impl $name {
            /// Wrap a raw engine value. Zero (a null pointer) yields `None`.
            pub fn from_raw(raw: usize) -> Option<Self> {
                NonZeroUsize::new(raw).map(Self)
            }

            /// The raw engine value. Identity is defined by this value.
            pub fn as_raw(self) -> usize {
                self.0.get()
            }
        }
    };
}

native_ref!(
    /// An opened document, as issued by the engine.
    DocumentRef
);
native_ref!(
    /// One outline (bookmark) entry. Only valid during the traversal that
    /// produced it.
    OutlineRef
);
native_ref!(
    /// A bookmark destination.
    DestRef
);

/// Error code reported by the engine when a document fails to open.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(u32);

impl ErrorCode {
    pub const SUCCESS: ErrorCode = ErrorCode(0);
    pub const UNKNOWN: ErrorCode = ErrorCode(1);
    pub const FILE: ErrorCode = ErrorCode(2);
    pub const FORMAT: ErrorCode = ErrorCode(3);
    pub const PASSWORD: ErrorCode = ErrorCode(4);
    pub const SECURITY: ErrorCode = ErrorCode(5);
    pub const PAGE: ErrorCode = ErrorCode(6);

    pub fn new(raw: u32) -> Self {
        ErrorCode(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Human-readable meaning of the code.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::SUCCESS => "No error reported",
            ErrorCode::UNKNOWN => "Unknown error",
            ErrorCode::FILE => "File not found or could not be opened",
            ErrorCode::FORMAT => "File not in PDF format or corrupted",
            ErrorCode::PASSWORD => "Password required or incorrect password",
            ErrorCode::SECURITY => "Unsupported security scheme",
            ErrorCode::PAGE => "Page not found or content error",
            _ => "Unknown error code",
        }
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorCode({}: {})", self.0, self.description())
    }
}

/// Operations required from the native engine.
///
/// Methods take `&self` and must be callable from any thread, but callers
/// guarantee that no two calls ever run at the same time (see
/// [`crate::gate::with_engine`]).
pub trait Engine: Send + Sync {
    /// Open a document from a filesystem path.
    fn open_file(&self, path: &CStr, password: Option<&CStr>) -> Result<DocumentRef, ErrorCode>;

    /// Open a document from memory. The engine may keep reading `data`
    /// until the document is closed; the caller keeps it alive and unchanged.
    fn open_memory(&self, data: &[u8], password: Option<&CStr>)
        -> Result<DocumentRef, ErrorCode>;

    fn close_document(&self, doc: DocumentRef);

    /// Version code (e.g. 17 for 1.7), or `None` when the engine reports failure.
    fn file_version(&self, doc: DocumentRef) -> Option<i32>;

    fn page_count(&self, doc: DocumentRef) -> i32;

    /// Page size in points, or `None` for an unknown page.
    fn page_size(&self, doc: DocumentRef, page_index: i32) -> Option<(f64, f64)>;

    /// Two-phase metadata accessor.
    fn meta_text(&self, doc: DocumentRef, tag: &CStr, buffer: &mut [u8]) -> usize;

    /// First child of `parent`, or of the outline root when `parent` is `None`.
    fn first_child(&self, doc: DocumentRef, parent: Option<OutlineRef>) -> Option<OutlineRef>;

    fn next_sibling(&self, doc: DocumentRef, node: OutlineRef) -> Option<OutlineRef>;

    /// Two-phase bookmark title accessor.
    fn bookmark_title(&self, doc: DocumentRef, node: OutlineRef, buffer: &mut [u8]) -> usize;

    fn bookmark_dest(&self, doc: DocumentRef, node: OutlineRef) -> Option<DestRef>;

    /// Zero-based page index of a destination; negative when unresolvable.
    fn dest_page_index(&self, doc: DocumentRef, dest: DestRef) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_refs_are_none() {
        assert!(DocumentRef::from_raw(0).is_none());
        assert!(OutlineRef::from_raw(0).is_none());
        assert!(DestRef::from_raw(0).is_none());
    }

    #[test]
    fn test_refs_compare_by_raw_value() {
        let a = OutlineRef::from_raw(0x1000).unwrap();
        let b = OutlineRef::from_raw(0x1000).unwrap();
        let c = OutlineRef::from_raw(0x2000).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_raw(), 0x1000);
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(
            ErrorCode::PASSWORD.description(),
            "Password required or incorrect password"
        );
        assert_eq!(ErrorCode::new(42).description(), "Unknown error code");
        assert_eq!(ErrorCode::new(3), ErrorCode::FORMAT);
    }
}

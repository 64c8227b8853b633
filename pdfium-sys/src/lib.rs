//! FFI bindings to PDFium
//!
//! This crate declares the subset of the PDFium C API needed to open
//! documents, read document metadata and walk the bookmark outline
//! (`fpdfview.h` and `fpdf_doc.h`). Link configuration lives in `build.rs`.
//!
//! None of these functions are safe to call concurrently: PDFium keeps
//! process-wide state. Callers must serialize every call themselves.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use libc::{c_char, c_double, c_int, c_ulong, c_void};

#[repr(C)]
pub struct fpdf_document_t__ {
    _private: [u8; 0],
}

#[repr(C)]
pub struct fpdf_bookmark_t__ {
    _private: [u8; 0],
}

#[repr(C)]
pub struct fpdf_dest_t__ {
    _private: [u8; 0],
}

pub type FPDF_DOCUMENT = *mut fpdf_document_t__;
pub type FPDF_BOOKMARK = *mut fpdf_bookmark_t__;
pub type FPDF_DEST = *mut fpdf_dest_t__;
pub type FPDF_BOOL = c_int;
pub type FPDF_DWORD = c_ulong;
/// NUL-terminated byte string (UTF-8 for paths, Latin-1/ASCII for tags).
pub type FPDF_BYTESTRING = *const c_char;
pub type FPDF_STRING = *const c_char;

// Error codes returned by FPDF_GetLastError()
pub const FPDF_ERR_SUCCESS: c_ulong = 0;
pub const FPDF_ERR_UNKNOWN: c_ulong = 1;
pub const FPDF_ERR_FILE: c_ulong = 2;
pub const FPDF_ERR_FORMAT: c_ulong = 3;
pub const FPDF_ERR_PASSWORD: c_ulong = 4;
pub const FPDF_ERR_SECURITY: c_ulong = 5;
pub const FPDF_ERR_PAGE: c_ulong = 6;

extern "C" {
    // fpdfview.h
    pub fn FPDF_InitLibrary();
    pub fn FPDF_DestroyLibrary();
    pub fn FPDF_LoadDocument(file_path: FPDF_STRING, password: FPDF_BYTESTRING)
        -> FPDF_DOCUMENT;
    pub fn FPDF_LoadMemDocument(
        data_buf: *const c_void,
        size: c_int,
        password: FPDF_BYTESTRING,
    ) -> FPDF_DOCUMENT;
    pub fn FPDF_CloseDocument(document: FPDF_DOCUMENT);
    pub fn FPDF_GetLastError() -> c_ulong;
    pub fn FPDF_GetFileVersion(doc: FPDF_DOCUMENT, file_version: *mut c_int) -> FPDF_BOOL;
    pub fn FPDF_GetPageCount(document: FPDF_DOCUMENT) -> c_int;
    pub fn FPDF_GetPageSizeByIndex(
        document: FPDF_DOCUMENT,
        page_index: c_int,
        width: *mut c_double,
        height: *mut c_double,
    ) -> c_int;

    // fpdf_doc.h
    pub fn FPDF_GetMetaText(
        document: FPDF_DOCUMENT,
        tag: FPDF_BYTESTRING,
        buffer: *mut c_void,
        buflen: c_ulong,
    ) -> c_ulong;
    pub fn FPDFBookmark_GetFirstChild(
        document: FPDF_DOCUMENT,
        bookmark: FPDF_BOOKMARK,
    ) -> FPDF_BOOKMARK;
    pub fn FPDFBookmark_GetNextSibling(
        document: FPDF_DOCUMENT,
        bookmark: FPDF_BOOKMARK,
    ) -> FPDF_BOOKMARK;
    pub fn FPDFBookmark_GetTitle(
        bookmark: FPDF_BOOKMARK,
        buffer: *mut c_void,
        buflen: c_ulong,
    ) -> c_ulong;
    pub fn FPDFBookmark_GetDest(document: FPDF_DOCUMENT, bookmark: FPDF_BOOKMARK) -> FPDF_DEST;
    pub fn FPDFDest_GetDestPageIndex(document: FPDF_DOCUMENT, dest: FPDF_DEST) -> c_int;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fpdf_init() {
        unsafe {
            FPDF_InitLibrary();
            FPDF_DestroyLibrary();
        }
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            FPDF_ERR_SUCCESS,
            FPDF_ERR_UNKNOWN,
            FPDF_ERR_FILE,
            FPDF_ERR_FORMAT,
            FPDF_ERR_PASSWORD,
            FPDF_ERR_SECURITY,
            FPDF_ERR_PAGE,
        ];
        for (i, code) in codes.iter().enumerate() {
            assert_eq!(*code as usize, i);
        }
    }
}

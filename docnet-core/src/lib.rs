//! # docnet-core
//!
//! Thread-safe document access on top of PDFium.
//!
//! PDFium is not safe to call from more than one thread at a time. This
//! crate puts every engine call behind one process-wide gate and exposes a
//! small, owned API:
//!
//! - **Readers** opened from a path or from bytes, with an optional password
//! - **Metadata** lookups (`Title`, `Author`, ...) decoded from UTF-16LE
//! - **Bookmark outlines** rebuilt as an ordered tree, robust to cyclic links
//! - **Page readers** that keep their document alive on their own
//!
//! ## Quick Start
//!
//! ```no_run
//! use docnet_core::{DocLib, PageDimensions};
//!
//! # #[cfg(feature = "pdfium")]
//! # {
//! let lib = DocLib::new()?;
//! let reader = lib.doc_reader_from_file("document.pdf", None, PageDimensions::new(1080, 1920)?)?;
//!
//! println!("PDF {}", reader.pdf_version()?.number());
//! println!("Title: {}", reader.meta_text("Title")?);
//!
//! for entry in docnet_core::Bookmark::flatten(&reader.bookmarks()?) {
//!     println!("{}{} ({})", "  ".repeat(entry.depth), entry.title, entry.page_index);
//! }
//! # }
//! # Ok::<(), docnet_core::DocnetError>(())
//! ```
//!
//! ## Backends
//!
//! The native backend is behind the `pdfium` feature. Without it the crate
//! still builds and ships [`MemoryEngine`], a scripted engine used in tests.

mod config;
mod doc_lib;
pub mod engine;
mod error;
pub mod gate;
mod handle;
mod outline;
mod page;
mod reader;
mod wide_text;

pub use config::{OutlineOptions, PageDimensions};
pub use doc_lib::DocLib;
pub use engine::{
    DestRef, DocumentRef, Engine, ErrorCode, MemoryBookmark, MemoryDocument, MemoryEngine,
    OutlineRef,
};
#[cfg(feature = "pdfium")]
pub use engine::PdfiumEngine;
pub use error::{DocnetError, Result};
pub use gate::EngineSession;
pub use outline::{Bookmark, FlatBookmark};
pub use page::PageReader;
pub use reader::{DocReader, DocumentInfo, MetaTag, PdfVersion};

//! Document reader: the public face of one opened document.

use crate::config::{OutlineOptions, PageDimensions};
use crate::engine::{DocumentRef, Engine};
use crate::error::{DocnetError, Result};
use crate::gate::EngineSession;
use crate::handle::DocumentHandle;
use crate::outline::{self, Bookmark};
use crate::page::PageReader;
use crate::wide_text;
use serde::Serialize;
use std::ffi::CString;
use std::fmt;
use std::sync::Arc;

/// PDF file version as reported by the engine (e.g. 17 for PDF 1.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PdfVersion(i32);

impl PdfVersion {
    pub fn new(number: i32) -> Self {
        Self(number)
    }

    /// The raw version code.
    pub fn number(&self) -> i32 {
        self.0
    }
}

/// Standard document information keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaTag {
    Title,
    Author,
    Subject,
    Keywords,
    Creator,
    Producer,
    CreationDate,
    ModDate,
}

impl MetaTag {
    pub const ALL: [MetaTag; 8] = [
        MetaTag::Title,
        MetaTag::Author,
        MetaTag::Subject,
        MetaTag::Keywords,
        MetaTag::Creator,
        MetaTag::Producer,
        MetaTag::CreationDate,
        MetaTag::ModDate,
    ];

    /// The key as stored in the document's info dictionary.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaTag::Title => "Title",
            MetaTag::Author => "Author",
            MetaTag::Subject => "Subject",
            MetaTag::Keywords => "Keywords",
            MetaTag::Creator => "Creator",
            MetaTag::Producer => "Producer",
            MetaTag::CreationDate => "CreationDate",
            MetaTag::ModDate => "ModDate",
        }
    }
}

/// All standard metadata of a document. Absent entries are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
    pub creator: String,
    pub producer: String,
    /// PDF date format (D:YYYYMMDDHHmmSSOHH'mm'), not parsed.
    pub creation_date: String,
    pub modification_date: String,
}

/// Reader over one opened document.
///
/// Every method makes its engine calls inside one gated session, so readers
/// can be used from any number of threads at once. After [`dispose`] every
/// method returns [`DocnetError::DocumentClosed`].
///
/// # Example
///
/// ```no_run
/// use docnet_core::{DocLib, PageDimensions};
///
/// # #[cfg(feature = "pdfium")]
/// # {
/// let lib = DocLib::new()?;
/// let reader = lib.doc_reader_from_file("document.pdf", None, PageDimensions::new(1080, 1920)?)?;
///
/// println!("Pages: {}", reader.page_count()?);
/// for bookmark in reader.bookmarks()? {
///     println!("{} -> page {}", bookmark.title, bookmark.page_index);
/// }
/// # }
/// # Ok::<(), docnet_core::DocnetError>(())
/// ```
///
/// [`dispose`]: DocReader::dispose
pub struct DocReader {
    handle: Option<Arc<DocumentHandle>>,
    dimensions: PageDimensions,
    outline: OutlineOptions,
}

impl DocReader {
    pub(crate) fn new(
        handle: DocumentHandle,
        dimensions: PageDimensions,
        outline: OutlineOptions,
    ) -> Self {
        Self {
            handle: Some(Arc::new(handle)),
            dimensions,
            outline,
        }
    }

    fn handle(&self) -> Result<&Arc<DocumentHandle>> {
        self.handle.as_ref().ok_or(DocnetError::DocumentClosed)
    }

    /// Get the PDF file version.
    pub fn pdf_version(&self) -> Result<PdfVersion> {
        self.handle()?
            .with_engine(|e, doc| e.file_version(doc))
            .map(PdfVersion)
            .ok_or(DocnetError::Engine {
                operation: "get pdf version",
            })
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> Result<usize> {
        let count = self.handle()?.with_engine(|e, doc| e.page_count(doc));
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Get a reader bound to one page (0-based).
    ///
    /// The page reader keeps the document open: it stays usable after this
    /// reader is disposed.
    pub fn page_reader(&self, page_index: usize) -> Result<PageReader> {
        let count = self.page_count()?;
        if page_index >= count {
            return Err(DocnetError::PageIndexOutOfBounds {
                index: page_index,
                count,
            });
        }
        Ok(PageReader::new(
            Arc::clone(self.handle()?),
            page_index,
            self.dimensions,
        ))
    }

    /// Get a metadata entry, e.g. `"Title"` or `"Producer"`.
    ///
    /// Returns an empty string when the entry is absent or empty.
    pub fn meta_text(&self, tag: &str) -> Result<String> {
        let c_tag = meta_tag_to_c(tag)?;
        Ok(self
            .handle()?
            .with_engine(|e, doc| read_meta(e, doc, &c_tag, tag)))
    }

    /// Get all standard metadata entries in one engine session.
    pub fn metadata(&self) -> Result<DocumentInfo> {
        let tags = MetaTag::ALL
            .iter()
            .map(|tag| meta_tag_to_c(tag.as_str()).map(|c| (*tag, c)))
            .collect::<Result<Vec<_>>>()?;

        let mut values = self
            .handle()?
            .with_engine(|e, doc| {
                tags.iter()
                    .map(|(tag, c_tag)| read_meta(e, doc, c_tag, tag.as_str()))
                    .collect::<Vec<_>>()
            })
            .into_iter();

        let mut next = || values.next().unwrap_or_default();
        Ok(DocumentInfo {
            title: next(),
            author: next(),
            subject: next(),
            keywords: next(),
            creator: next(),
            producer: next(),
            creation_date: next(),
            modification_date: next(),
        })
    }

    /// Get the bookmark outline: root-level bookmarks in document order,
    /// each with its children. Empty for documents without an outline.
    pub fn bookmarks(&self) -> Result<Vec<Bookmark>> {
        let options = self.outline;
        Ok(self
            .handle()?
            .with_engine(|e, doc| outline::load_outline(e, doc, options)))
    }

    /// The page dimensions handed to page readers.
    pub fn dimensions(&self) -> PageDimensions {
        self.dimensions
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_none()
    }

    /// Release the document. Safe to call more than once.
    ///
    /// The native document is closed once no page reader holds it anymore.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            log::debug!(
                "Disposing reader ({} page readers still attached)",
                Arc::strong_count(&handle) - 1
            );
        }
    }
}

impl fmt::Debug for DocReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocReader")
            .field("dimensions", &self.dimensions)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

fn meta_tag_to_c(tag: &str) -> Result<CString> {
    CString::new(tag).map_err(|_| {
        DocnetError::invalid_argument(format!("metadata tag contains a null byte: {tag:?}"))
    })
}

fn read_meta(
    session: &EngineSession<'_, dyn Engine>,
    doc: DocumentRef,
    c_tag: &CString,
    tag: &str,
) -> String {
    wide_text::read_sized(|buffer| session.meta_text(doc, c_tag, buffer), tag)
}

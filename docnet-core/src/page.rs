//! Page readers.

use crate::config::PageDimensions;
use crate::error::{DocnetError, Result};
use crate::handle::DocumentHandle;
use std::fmt;
use std::sync::Arc;

/// A reader bound to one page of a document.
///
/// Holds a share of the document, so it remains valid after the
/// [`DocReader`](crate::DocReader) that created it is disposed.
pub struct PageReader {
    handle: Arc<DocumentHandle>,
    page_index: usize,
    dimensions: PageDimensions,
}

impl PageReader {
    pub(crate) fn new(
        handle: Arc<DocumentHandle>,
        page_index: usize,
        dimensions: PageDimensions,
    ) -> Self {
        Self {
            handle,
            page_index,
            dimensions,
        }
    }

    /// Get the page index (0-based).
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Target dimensions this page was requested with.
    pub fn dimensions(&self) -> PageDimensions {
        self.dimensions
    }

    /// Native page size in points (1/72 inch), as (width, height).
    pub fn page_size(&self) -> Result<(f64, f64)> {
        let index = i32::try_from(self.page_index).map_err(|_| {
            DocnetError::invalid_argument(format!("page index {} too large", self.page_index))
        })?;
        self.handle
            .with_engine(|e, doc| e.page_size(doc, index))
            .ok_or(DocnetError::Engine {
                operation: "get page size",
            })
    }
}

impl fmt::Debug for PageReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageReader")
            .field("page_index", &self.page_index)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

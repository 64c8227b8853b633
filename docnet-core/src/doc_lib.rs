//! Library entry point.

use crate::config::{OutlineOptions, PageDimensions};
use crate::engine::Engine;
use crate::error::Result;
use crate::handle::DocumentHandle;
use crate::reader::DocReader;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Creates document readers on top of one engine.
///
/// Cheap to clone; clones share the engine. All readers of all `DocLib`
/// instances are serialized through the same process-wide gate.
#[derive(Clone)]
pub struct DocLib {
    engine: Arc<dyn Engine>,
    outline: OutlineOptions,
}

impl DocLib {
    /// Create a library backed by PDFium.
    ///
    /// # Errors
    /// Currently always succeeds; returns `Result` for backend setup failures.
    #[cfg(feature = "pdfium")]
    pub fn new() -> Result<Self> {
        Ok(Self::with_engine(Arc::new(crate::engine::PdfiumEngine::new())))
    }

    /// Create a library over any engine implementation.
    pub fn with_engine(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            outline: OutlineOptions::default(),
        }
    }

    /// Set the outline limits used by readers created afterwards.
    pub fn with_outline_options(mut self, options: OutlineOptions) -> Self {
        self.outline = options;
        self
    }

    pub fn outline_options(&self) -> OutlineOptions {
        self.outline
    }

    /// Open a document from a file path.
    ///
    /// `dimensions` are validated before the engine is touched.
    ///
    /// # Errors
    /// - [`DocnetError::InvalidArgument`](crate::DocnetError::InvalidArgument) for bad dimensions,
    ///   an empty or non-UTF8 path, or a null byte in path or password
    /// - [`DocnetError::OpenFailed`](crate::DocnetError::OpenFailed) when the engine refuses the
    ///   document (missing file, not a PDF, wrong password, ...)
    pub fn doc_reader_from_file<P: AsRef<Path>>(
        &self,
        path: P,
        password: Option<&str>,
        dimensions: PageDimensions,
    ) -> Result<DocReader> {
        dimensions.validate()?;
        let handle = DocumentHandle::open_file(Arc::clone(&self.engine), path.as_ref(), password)?;
        Ok(DocReader::new(handle, dimensions, self.outline))
    }

    /// Open a document from bytes. The reader owns the bytes until the
    /// document is closed.
    ///
    /// # Errors
    /// Same as [`doc_reader_from_file`](Self::doc_reader_from_file); empty
    /// data is an invalid argument.
    pub fn doc_reader_from_bytes(
        &self,
        bytes: impl Into<Vec<u8>>,
        password: Option<&str>,
        dimensions: PageDimensions,
    ) -> Result<DocReader> {
        dimensions.validate()?;
        let handle = DocumentHandle::open_memory(Arc::clone(&self.engine), bytes.into(), password)?;
        Ok(DocReader::new(handle, dimensions, self.outline))
    }
}

impl fmt::Debug for DocLib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocLib")
            .field("outline", &self.outline)
            .finish_non_exhaustive()
    }
}

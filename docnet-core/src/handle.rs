//! Owned native document handle.

use crate::engine::{DocumentRef, Engine};
use crate::error::{DocnetError, Result};
use crate::gate::{self, EngineSession};
use std::ffi::CString;
use std::path::Path;
use std::sync::Arc;

/// One opened document.
///
/// Opened under the engine gate and closed under the gate exactly once, in
/// `Drop`. Memory-backed documents keep their bytes here: the engine reads
/// them lazily, so they are released only after the document is closed.
pub(crate) struct DocumentHandle {
    engine: Arc<dyn Engine>,
    raw: DocumentRef,
    /// Owned data for memory-loaded documents. Dropped after `raw` is closed.
    _data: Option<Vec<u8>>,
}

impl DocumentHandle {
    pub(crate) fn open_file(
        engine: Arc<dyn Engine>,
        path: &Path,
        password: Option<&str>,
    ) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(DocnetError::invalid_argument("file path must not be empty"));
        }
        let path_str = path.to_str().ok_or_else(|| {
            DocnetError::invalid_argument(format!("Invalid path (non-UTF8): {}", path.display()))
        })?;
        let c_path = CString::new(path_str).map_err(|_| {
            DocnetError::invalid_argument(format!(
                "Invalid path string (contains null byte): {path_str}"
            ))
        })?;
        let c_password = password_to_c(password)?;

        let raw = gate::with_engine(&*engine, |e| e.open_file(&c_path, c_password.as_deref()))
            .map_err(|code| DocnetError::OpenFailed { code })?;

        log::debug!("Opened document {:#x} from {}", raw.as_raw(), path.display());
        Ok(Self {
            engine,
            raw,
            _data: None,
        })
    }

    pub(crate) fn open_memory(
        engine: Arc<dyn Engine>,
        data: Vec<u8>,
        password: Option<&str>,
    ) -> Result<Self> {
        if data.is_empty() {
            return Err(DocnetError::invalid_argument("document bytes must not be empty"));
        }
        // The engine takes the length as a C int
        if data.len() > i32::MAX as usize {
            return Err(DocnetError::invalid_argument(format!(
                "PDF data too large: {} bytes exceeds maximum {} bytes",
                data.len(),
                i32::MAX
            )));
        }
        let c_password = password_to_c(password)?;

        // Moving `data` into the handle afterwards does not move its heap
        // buffer, so the pointer the engine keeps stays valid.
        let raw = gate::with_engine(&*engine, |e| e.open_memory(&data, c_password.as_deref()))
            .map_err(|code| DocnetError::OpenFailed { code })?;

        log::debug!(
            "Opened document {:#x} from {} bytes in memory",
            raw.as_raw(),
            data.len()
        );
        Ok(Self {
            engine,
            raw,
            _data: Some(data),
        })
    }

    /// Run `f` inside one engine session, with this document's reference.
    pub(crate) fn with_engine<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&EngineSession<'_, dyn Engine>, DocumentRef) -> T,
    {
        gate::with_engine(&*self.engine, |session| f(session, self.raw))
    }
}

impl Drop for DocumentHandle {
    fn drop(&mut self) {
        gate::with_engine(&*self.engine, |e| e.close_document(self.raw));
        log::debug!("Closed document {:#x}", self.raw.as_raw());
    }
}

fn password_to_c(password: Option<&str>) -> Result<Option<CString>> {
    password
        .map(|p| {
            CString::new(p)
                .map_err(|_| DocnetError::invalid_argument("password contains a null byte"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ErrorCode, MemoryDocument, MemoryEngine};

    fn engine_with(bytes: &[u8], doc: MemoryDocument) -> Arc<MemoryEngine> {
        let engine = Arc::new(MemoryEngine::new());
        engine.register(bytes.to_vec(), doc);
        engine
    }

    #[test]
    fn test_open_and_drop_closes_once() {
        let engine = engine_with(b"%PDF-handle", MemoryDocument::new(3));
        let handle = DocumentHandle::open_memory(engine.clone(), b"%PDF-handle".to_vec(), None)
            .unwrap();
        assert_eq!(engine.live_documents(), 1);

        let pages = handle.with_engine(|e, doc| e.page_count(doc));
        assert_eq!(pages, 3);

        drop(handle);
        assert_eq!(engine.live_documents(), 0);
        assert_eq!(engine.close_count(), 1);
    }

    #[test]
    fn test_empty_arguments_rejected_before_engine() {
        let engine = Arc::new(MemoryEngine::new());

        let err = DocumentHandle::open_memory(engine.clone(), Vec::new(), None).err().unwrap();
        assert!(err.is_validation());

        let err = DocumentHandle::open_file(engine.clone(), Path::new(""), None).err().unwrap();
        assert!(err.is_validation());

        assert_eq!(engine.open_attempts(), 0);
    }

    #[test]
    fn test_nul_in_password_rejected() {
        let engine = engine_with(b"%PDF-nul", MemoryDocument::new(1));
        let err = DocumentHandle::open_memory(engine.clone(), b"%PDF-nul".to_vec(), Some("a\0b"))
            .err()
            .unwrap();
        assert!(err.is_validation());
        assert_eq!(engine.open_attempts(), 0);
    }

    #[test]
    fn test_engine_failure_keeps_code() {
        let engine = Arc::new(MemoryEngine::new());
        let err = DocumentHandle::open_memory(engine.clone(), b"garbage".to_vec(), None)
            .err()
            .unwrap();
        assert_eq!(err.error_code(), Some(ErrorCode::FORMAT));
        assert_eq!(engine.open_attempts(), 1);
        assert_eq!(engine.live_documents(), 0);
    }
}

//! Process-wide serialization of engine calls.
//!
//! The engine keeps global, non-reentrant state, so a single lock guards
//! every call into it, across all documents and all [`Engine`] instances.
//! Holding an [`EngineSession`] is the only way this crate reaches an engine.

use crate::engine::Engine;
use std::ops::Deref;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The engine lock. Lives for the whole process.
static ENGINE_LOCK: Mutex<()> = Mutex::new(());

/// Exclusive access to the engine for the duration of one gated call.
///
/// Sessions are not reentrant: opening a second session while one is alive
/// on the same thread deadlocks.
pub struct EngineSession<'a, E: ?Sized> {
    engine: &'a E,
    _lock: MutexGuard<'static, ()>,
}

impl<E: ?Sized> Deref for EngineSession<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.engine
    }
}

/// Run `f` while holding the engine lock.
///
/// The lock is released when `f` returns or unwinds. A panic inside an
/// earlier session poisons the mutex; the guard protects no Rust data, so
/// the poison is cleared and the gate keeps working.
pub fn with_engine<E, T, F>(engine: &E, f: F) -> T
where
    E: Engine + ?Sized,
    F: FnOnce(&EngineSession<'_, E>) -> T,
{
    let lock = ENGINE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let session = EngineSession {
        engine,
        _lock: lock,
    };
    f(&session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryDocument, MemoryEngine};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_lock_released_after_call() {
        let engine = MemoryEngine::new();
        let first = with_engine(&engine, |_| 1);
        let second = with_engine(&engine, |_| 2);
        assert_eq!(first + second, 3);
    }

    #[test]
    fn test_lock_released_after_panic() {
        let engine = MemoryEngine::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            with_engine(&engine, |_| panic!("engine call blew up"));
        }));
        assert!(result.is_err());

        // Gate must still be usable
        let bytes = b"%PDF-gate".to_vec();
        engine.register(bytes.clone(), MemoryDocument::new(1));
        let doc = with_engine(&engine, |e| e.open_memory(&bytes, None));
        assert!(doc.is_ok());
        with_engine(&engine, |e| e.close_document(doc.unwrap()));
    }

    #[test]
    fn test_session_derefs_to_dyn_engine() {
        let engine: std::sync::Arc<dyn Engine> = std::sync::Arc::new(MemoryEngine::new());
        let attempts = with_engine(&*engine, |e| {
            e.open_memory(b"not registered", None).is_err()
        });
        assert!(attempts);
    }
}

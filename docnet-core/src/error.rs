//! Error types for docnet-core

use crate::engine::ErrorCode;
use thiserror::Error;

/// Result type for docnet-core operations
pub type Result<T> = std::result::Result<T, DocnetError>;

/// Error types for document operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocnetError {
    /// Caller-supplied argument is structurally invalid. Raised before the
    /// engine is touched.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The engine refused to open the document
    #[error("Failed to open PDF document: {} (code {})", .code.description(), .code.raw())]
    OpenFailed { code: ErrorCode },

    /// Any other engine call reported failure
    #[error("Engine call failed: {operation}")]
    Engine { operation: &'static str },

    /// Page index out of bounds
    #[error("Page index {index} out of bounds (document has {count} pages)")]
    PageIndexOutOfBounds { index: usize, count: usize },

    /// The reader was disposed
    #[error("Document has been disposed")]
    DocumentClosed,
}

impl DocnetError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        DocnetError::InvalidArgument {
            message: message.into(),
        }
    }

    /// True for argument validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, DocnetError::InvalidArgument { .. })
    }

    /// True for failures reported by the engine, opening included.
    pub fn is_engine(&self) -> bool {
        matches!(
            self,
            DocnetError::OpenFailed { .. } | DocnetError::Engine { .. }
        )
    }

    /// True when the engine refused to open a document.
    pub fn is_open_failure(&self) -> bool {
        matches!(self, DocnetError::OpenFailed { .. })
    }

    /// The engine's error code, when one was reported.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            DocnetError::OpenFailed { code } => Some(*code),
            _ => None,
        }
    }
}

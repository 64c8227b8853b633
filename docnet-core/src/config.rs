//! Reader configuration.

use crate::error::{DocnetError, Result};
use serde::{Deserialize, Serialize};

/// Target page size in pixels handed to page readers.
///
/// Both dimensions must be strictly positive. [`PageDimensions::new`]
/// validates eagerly; values built another way (e.g. deserialized) are
/// checked again when a reader is created, before the engine is touched.
///
/// # Example
///
/// ```
/// use docnet_core::PageDimensions;
///
/// let dims = PageDimensions::new(1080, 1920)?;
/// assert_eq!(dims.width(), 1080);
///
/// assert!(PageDimensions::new(0, 1920).is_err());
/// # Ok::<(), docnet_core::DocnetError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDimensions {
    width: i32,
    height: i32,
}

impl PageDimensions {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let dims = Self { width, height };
        dims.validate()?;
        Ok(dims)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check that both dimensions are positive.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 {
            return Err(DocnetError::invalid_argument(format!(
                "page width must be greater than 0, got {}",
                self.width
            )));
        }
        if self.height <= 0 {
            return Err(DocnetError::invalid_argument(format!(
                "page height must be greater than 0, got {}",
                self.height
            )));
        }
        Ok(())
    }
}

impl TryFrom<(i32, i32)> for PageDimensions {
    type Error = DocnetError;

    fn try_from((width, height): (i32, i32)) -> Result<Self> {
        Self::new(width, height)
    }
}

/// Limits applied while loading the bookmark outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineOptions {
    /// Number of nesting levels loaded, root entries included. Children
    /// below the last level are dropped.
    pub max_depth: usize,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

impl OutlineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

//! Error types for pagination and page editing.

use thiserror::Error;

use crate::layout::MeasureError;

/// Result type alias for pageflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by layout and page operations.
///
/// None of these are fatal: the page sequence stays usable after any of them.
#[derive(Error, Debug)]
pub enum Error {
    /// An operation referenced a page outside `[0, page_count)`.
    #[error("Page index {index} is out of range (document has {page_count} pages)")]
    InvalidPageIndex { index: usize, page_count: usize },

    /// Pagination was requested with no source content.
    #[error("No document content available")]
    EmptyDocument,

    /// The text measurer failed during a reflow pass.
    #[error("Measurement failed: {0}")]
    Measurement(#[from] MeasureError),

    /// Move/split operations need at least two paragraphs.
    #[error("Need at least 2 paragraphs on page {page} (found {found})")]
    InsufficientParagraphs { page: usize, found: usize },

    /// The last remaining page cannot be deleted.
    #[error("Cannot delete the only page")]
    CannotDeleteOnlyPage,

    /// No image placeholder with the given id exists on the page.
    #[error("Image placeholder {id} not found on page {page}")]
    ImageNotFound { page: usize, id: String },

    /// The user declined a confirmation prompt.
    #[error("Operation cancelled")]
    Cancelled,

    /// Page settings could not be parsed or serialized.
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error should surface as a warning rather than an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::InsufficientParagraphs { .. } | Error::Cancelled)
    }
}

//! Error types for render model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Page {page} is outside a document of {total} pages")]
    PageOutOfRange { page: usize, total: usize },

    #[error("Invalid page setup: {0}")]
    InvalidPageSetup(#[from] layout_engine::LayoutError),
}

pub type Result<T> = std::result::Result<T, RenderError>;

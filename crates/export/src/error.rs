//! Error types for report export

use crate::pdf::PdfError;
use crate::xlsx::XlsxError;
use layout_engine::LayoutError;
use render_model::RenderError;
use thiserror::Error;

/// Encoding the final artifact failed; no partial output is produced
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("XLSX encoding failed: {0}")]
    Xlsx(#[from] XlsxError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Preview not found: {0}")]
    PreviewNotFound(String),
}

impl From<PdfError> for ExportError {
    fn from(err: PdfError) -> Self {
        ExportError::Serialization(SerializationError::Pdf(err))
    }
}

impl From<XlsxError> for ExportError {
    fn from(err: XlsxError) -> Self {
        ExportError::Serialization(SerializationError::Xlsx(err))
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

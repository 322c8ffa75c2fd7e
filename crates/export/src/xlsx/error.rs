//! Error types for XLSX export

use thiserror::Error;

/// Errors that can occur while writing a workbook
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The workbook has nothing to write
    #[error("Invalid workbook: {0}")]
    InvalidWorkbook(String),
}

pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

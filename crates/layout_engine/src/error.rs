//! Error and warning types for the layout engine

use report_model::BlockOrigin;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid page setup: {0}")]
    InvalidPageSetup(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Non-fatal conditions found while planning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LayoutWarning {
    /// A block's minimum height exceeds the usable page height. It was
    /// placed alone on its page and overflows into the footer area.
    DegeneratePage {
        page_number: usize,
        origin: BlockOrigin,
        height: f32,
        usable_height: f32,
    },
}

impl std::fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutWarning::DegeneratePage {
                page_number,
                origin,
                height,
                usable_height,
            } => write!(
                f,
                "block {:?} needs {}pt but page {} only has {}pt of usable height",
                origin, height, page_number, usable_height
            ),
        }
    }
}

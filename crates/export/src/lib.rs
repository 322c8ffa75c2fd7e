//! Export - PDF and XLSX artifacts for report documents
//!
//! The PDF path runs the layout engine and page renderer and serializes the
//! resulting draw commands; the XLSX path flattens the content model into
//! worksheets without paginating. Finished PDFs can be saved (download) or
//! published under a revocable URL (preview) from the same bytes.

mod artifact;
mod assets;
mod error;
mod exporter;
pub mod pdf;
mod preview;
mod settings;
pub mod xlsx;

pub use artifact::*;
pub use assets::*;
pub use error::*;
pub use exporter::*;
pub use preview::*;
pub use settings::*;

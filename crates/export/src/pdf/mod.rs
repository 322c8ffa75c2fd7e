//! PDF Export Module
//!
//! Serializes a [`render_model::RenderModel`] into a PDF file.
//!
//! # Architecture
//!
//! - `objects`: PDF object model (Dictionary, Array, Stream, Reference)
//! - `content`: Content stream operators
//! - `fonts`: Standard Type 1 fonts and WinAnsi text encoding
//! - `images`: JPEG image XObjects
//! - `painter`: Draw commands to content streams
//! - `writer`: File structure and document assembly

mod content;
mod fonts;
mod images;
mod objects;
mod painter;
mod writer;

pub use content::ContentStream;
pub use fonts::{encode_win_ansi, StandardFont};
pub use images::{ImageError, JpegImage};
pub use objects::format_number;
pub use painter::paint_page;
pub use writer::{DocumentInfo, PdfDocumentWriter, PdfError, PdfOptions};

#[cfg(test)]
pub(crate) use images::test_jpeg;

//! Report Model - Page-independent description of report content
//!
//! This crate defines the immutable content model that the report builder
//! produces and the layout engine consumes: sections of typed content blocks
//! (headings, key/value tables, data tables, dividers and summary cards)
//! plus a trailing list of cross-section blocks.

mod block;
mod document;
mod error;

pub use block::*;
pub use document::*;
pub use error::*;

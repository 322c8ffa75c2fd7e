//! XLSX Export Module
//!
//! - `workbook`: flat sheet model projected from a report document
//! - `writer`: SpreadsheetML package writer
//! - `error`: XLSX error types

mod error;
mod workbook;
mod writer;

pub use error::{XlsxError, XlsxResult};
pub use workbook::{column_letter, Workbook, Worksheet};
pub use writer::{write_workbook, XlsxWriter};

//! Error types for the report model

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportModelError {
    #[error("Row {row} has {found} cells, table declares {expected} columns")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Table has no columns")]
    NoColumns,
}

pub type Result<T> = std::result::Result<T, ReportModelError>;

//! Error types for the report builder

use report_model::ReportKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Select at least one {kind} record to generate a report")]
    EmptySelection { kind: ReportKind },

    #[error("Record {index} is a {found} record but the report is a {expected} report")]
    KindMismatch {
        index: usize,
        expected: ReportKind,
        found: ReportKind,
    },
}

pub type Result<T> = std::result::Result<T, BuildError>;

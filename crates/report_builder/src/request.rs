//! Report requests as submitted by the selection screens

use crate::builder::check_selection;
use crate::{EntityRecord, ReportBuilder, ReportOptions, Result};
use chrono::{DateTime, Utc};
use report_model::{Document, ReportKind};
use serde::{Deserialize, Serialize};

/// A report kind, its options and the selected records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub kind: ReportKind,
    #[serde(default)]
    pub options: ReportOptions,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

impl ReportRequest {
    pub fn new(kind: ReportKind, entities: Vec<EntityRecord>) -> Self {
        Self {
            kind,
            options: ReportOptions::default(),
            entities,
        }
    }

    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    /// Check the selection before any report work starts
    pub fn validate(&self) -> Result<()> {
        check_selection(self.kind, &self.entities)
    }

    /// Build the document with a fixed generation time
    pub fn build_at(&self, generated_at: DateTime<Utc>) -> Result<Document> {
        ReportBuilder::new(self.options)
            .generated_at(generated_at)
            .build(self.kind, &self.entities)
    }
}

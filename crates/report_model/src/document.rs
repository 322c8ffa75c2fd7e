//! Document root: report kind, sections and trailing blocks

use crate::{ContentBlock, Stat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which report is being produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Site,
    Supplier,
}

impl ReportKind {
    /// Entity name used in titles, sheet names and file names
    pub fn entity_label(&self) -> &'static str {
        match self {
            ReportKind::Site => "Site",
            ReportKind::Supplier => "Supplier",
        }
    }

    /// Name of the nested sub-table, if this kind has one
    pub fn sub_table_label(&self) -> Option<&'static str> {
        match self {
            ReportKind::Site => Some("Systems"),
            ReportKind::Supplier => None,
        }
    }

    pub fn title(&self) -> String {
        format!("{} Report", self.entity_label())
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.entity_label())
    }
}

/// Content for one selected entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

impl Section {
    pub fn new(title: impl Into<String>, blocks: Vec<ContentBlock>) -> Self {
        Self {
            title: title.into(),
            blocks,
        }
    }
}

/// Where a block sits in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockOrigin {
    /// Block `block` of section `section`
    Section { section: usize, block: usize },
    /// Block `block` of the trailing blocks
    Trailing { block: usize },
}

/// A complete report, immutable once built
///
/// `generated_at` is fixed when the document is built and reused for every
/// page footer of a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub kind: ReportKind,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
    /// Cross-section blocks placed after all sections
    #[serde(default)]
    pub trailing_blocks: Vec<ContentBlock>,
    /// Headline counts shown under the title on every page
    #[serde(default)]
    pub summary: Vec<Stat>,
}

impl Document {
    pub fn new(kind: ReportKind, generated_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            title: kind.title(),
            generated_at,
            sections: Vec::new(),
            trailing_blocks: Vec::new(),
            summary: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_trailing(mut self, block: ContentBlock) -> Self {
        self.trailing_blocks.push(block);
        self
    }

    pub fn with_summary(mut self, summary: Vec<Stat>) -> Self {
        self.summary = summary;
        self
    }

    /// All blocks in layout order: section blocks first, then trailing blocks
    pub fn blocks(&self) -> impl Iterator<Item = (BlockOrigin, &ContentBlock)> {
        let sections = self.sections.iter().enumerate().flat_map(|(s, section)| {
            section
                .blocks
                .iter()
                .enumerate()
                .map(move |(b, block)| (BlockOrigin::Section { section: s, block: b }, block))
        });
        let trailing = self
            .trailing_blocks
            .iter()
            .enumerate()
            .map(|(b, block)| (BlockOrigin::Trailing { block: b }, block));
        sections.chain(trailing)
    }

    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum::<usize>() + self.trailing_blocks.len()
    }

    /// Look up a block by origin
    pub fn block(&self, origin: BlockOrigin) -> Option<&ContentBlock> {
        match origin {
            BlockOrigin::Section { section, block } => {
                self.sections.get(section).and_then(|s| s.blocks.get(block))
            }
            BlockOrigin::Trailing { block } => self.trailing_blocks.get(block),
        }
    }

    /// Date part of `generated_at`, as used in artifact file names
    pub fn iso_date(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }
}

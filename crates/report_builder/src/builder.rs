//! Report builder
//!
//! Site report:
//! ```text
//! Section per site:  [Divider]  Heading(site)  KeyValueTable(site fields)
//!                    [Heading("Systems")  DataTable(systems)]      if include_sub_table
//! Trailing:          Divider  Heading("All Systems")  DataTable(site + systems)
//!                                                   if include_sub_table and any systems
//! ```
//!
//! Supplier report: one `Suppliers` section holding a summary card with
//! status and subcontractor counts followed by one data table row per supplier.

use crate::fields::{self, COMBINED_SITE_COLUMN, SITE_FIELDS, SUPPLIER_COLUMNS, SYSTEM_COLUMNS};
use crate::{
    BuildError, EntityRecord, ReportOptions, Result, SiteRecord, SupplierRecord, SupplierStatus,
};
use chrono::{DateTime, Utc};
use report_model::{ContentBlock, Document, KeyValueRow, ReportKind, Section, Stat};
use tracing::info;

/// Builds documents for one set of report options
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    options: ReportOptions,
    generated_at: DateTime<Utc>,
}

impl ReportBuilder {
    /// Create a builder stamped with the current time
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            generated_at: Utc::now(),
        }
    }

    /// Fix the generation timestamp
    pub fn generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Build a document for the selected entities
    pub fn build(&self, kind: ReportKind, entities: &[EntityRecord]) -> Result<Document> {
        check_selection(kind, entities)?;

        let document = match kind {
            ReportKind::Site => {
                let sites: Vec<&SiteRecord> = entities.iter().filter_map(EntityRecord::as_site).collect();
                self.site_report(&sites)
            }
            ReportKind::Supplier => {
                let suppliers: Vec<&SupplierRecord> =
                    entities.iter().filter_map(EntityRecord::as_supplier).collect();
                self.supplier_report(&suppliers)
            }
        };

        info!(
            kind = %kind,
            entities = entities.len(),
            sections = document.sections.len(),
            blocks = document.block_count(),
            "report document built"
        );
        Ok(document)
    }

    // =========================================================================
    // Site report
    // =========================================================================

    fn site_report(&self, sites: &[&SiteRecord]) -> Document {
        let total_systems: usize = sites.iter().map(|site| site.systems.len()).sum();
        let summary = vec![
            Stat::new("Sites", sites.len()),
            Stat::new("Systems", total_systems),
        ];

        let mut document = Document::new(ReportKind::Site, self.generated_at).with_summary(summary);
        for (index, site) in sites.iter().enumerate() {
            document = document.with_section(self.site_section(index, site));
        }

        if self.options.include_sub_table && total_systems > 0 {
            document = document
                .with_trailing(ContentBlock::Divider)
                .with_trailing(ContentBlock::heading("All Systems", 2))
                .with_trailing(self.combined_systems(sites));
        }
        document
    }

    fn site_section(&self, index: usize, site: &SiteRecord) -> Section {
        let title = site_title(site, index);
        let mut blocks = Vec::new();
        if index > 0 {
            blocks.push(ContentBlock::Divider);
        }
        blocks.push(ContentBlock::heading(title.clone(), 2));
        blocks.push(ContentBlock::key_value(
            SITE_FIELDS
                .iter()
                .map(|field| KeyValueRow::new(field.label, field.resolve(site, &self.options)))
                .collect(),
        ));

        if self.options.include_sub_table && !site.systems.is_empty() {
            blocks.push(ContentBlock::heading("Systems", 3));
            blocks.push(ContentBlock::data_table(
                fields::labels(SYSTEM_COLUMNS),
                site.systems
                    .iter()
                    .map(|system| fields::values(SYSTEM_COLUMNS, system, &self.options))
                    .collect(),
            ));
        }
        Section::new(title, blocks)
    }

    /// Every system of every site, prefixed with its site name
    fn combined_systems(&self, sites: &[&SiteRecord]) -> ContentBlock {
        let mut columns = vec![COMBINED_SITE_COLUMN.to_string()];
        columns.extend(fields::labels(SYSTEM_COLUMNS));

        let rows = sites
            .iter()
            .enumerate()
            .flat_map(|(index, site)| {
                let name = site_title(site, index);
                site.systems.iter().map(move |system| {
                    let mut row = vec![name.clone()];
                    row.extend(fields::values(SYSTEM_COLUMNS, system, &self.options));
                    row
                })
            })
            .collect();
        ContentBlock::data_table(columns, rows)
    }

    // =========================================================================
    // Supplier report
    // =========================================================================

    fn supplier_report(&self, suppliers: &[&SupplierRecord]) -> Document {
        let summary = supplier_summary(suppliers);
        let table = ContentBlock::data_table(
            fields::labels(SUPPLIER_COLUMNS),
            suppliers
                .iter()
                .map(|supplier| fields::values(SUPPLIER_COLUMNS, *supplier, &self.options))
                .collect(),
        );

        Document::new(ReportKind::Supplier, self.generated_at)
            .with_summary(summary.clone())
            .with_section(Section::new(
                "Suppliers",
                vec![ContentBlock::summary(summary), table],
            ))
    }
}

/// Counts over exactly the suppliers passed in
pub fn supplier_summary(suppliers: &[&SupplierRecord]) -> Vec<Stat> {
    let count_status = |status: SupplierStatus| {
        suppliers
            .iter()
            .filter(|supplier| supplier.status() == status)
            .count()
    };
    let subcontractors = suppliers
        .iter()
        .filter(|supplier| supplier.is_subcontractor)
        .count();

    vec![
        Stat::new("Total", suppliers.len()),
        Stat::new("Active", count_status(SupplierStatus::Active)),
        Stat::new("Inactive", count_status(SupplierStatus::Inactive)),
        Stat::new("Subcontractors", subcontractors),
        Stat::new("Non-Subcontractors", suppliers.len() - subcontractors),
    ]
}

fn site_title(site: &SiteRecord, index: usize) -> String {
    let name = site.site_name.trim();
    if name.is_empty() {
        format!("Site {}", index + 1)
    } else {
        name.to_string()
    }
}

/// Reject empty selections and records of the wrong kind
pub(crate) fn check_selection(kind: ReportKind, entities: &[EntityRecord]) -> Result<()> {
    if entities.is_empty() {
        return Err(BuildError::EmptySelection { kind });
    }
    if let Some((index, entity)) = entities
        .iter()
        .enumerate()
        .find(|(_, entity)| entity.kind() != kind)
    {
        return Err(BuildError::KindMismatch {
            index,
            expected: kind,
            found: entity.kind(),
        });
    }
    Ok(())
}

/// Build a document stamped with the current time
pub fn build(kind: ReportKind, entities: &[EntityRecord], options: &ReportOptions) -> Result<Document> {
    ReportBuilder::new(*options).build(kind, entities)
}

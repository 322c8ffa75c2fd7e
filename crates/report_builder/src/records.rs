//! Entity records supplied by the selection screens
//!
//! Records arrive fully resolved; the builder performs no lookups. Every
//! string field defaults to empty so partially filled records still load.

use report_model::ReportKind;
use serde::{Deserialize, Serialize};

/// An equipment system installed at a site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemRecord {
    pub system_name: String,
    pub system_type: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub install_date: String,
    pub status: String,
}

/// A customer site with its systems
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteRecord {
    pub site_name: String,
    pub site_code: String,
    pub customer_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub contact_person: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub remarks: String,
    pub systems: Vec<SystemRecord>,
}

/// A supplier or subcontractor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierRecord {
    pub supplier_name: String,
    pub supplier_code: String,
    pub category: String,
    pub address: String,
    pub contact_person: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub status: String,
    pub is_subcontractor: bool,
    pub remarks: String,
}

/// Status of a supplier, matched case-insensitively on the trimmed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierStatus {
    Active,
    Inactive,
    Other,
}

impl SupplierRecord {
    pub fn status(&self) -> SupplierStatus {
        let status = self.status.trim();
        if status.eq_ignore_ascii_case("active") {
            SupplierStatus::Active
        } else if status.eq_ignore_ascii_case("inactive") {
            SupplierStatus::Inactive
        } else {
            SupplierStatus::Other
        }
    }
}

/// One selected entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityRecord {
    Site(SiteRecord),
    Supplier(SupplierRecord),
}

impl EntityRecord {
    pub fn kind(&self) -> ReportKind {
        match self {
            EntityRecord::Site(_) => ReportKind::Site,
            EntityRecord::Supplier(_) => ReportKind::Supplier,
        }
    }

    pub fn as_site(&self) -> Option<&SiteRecord> {
        match self {
            EntityRecord::Site(site) => Some(site),
            _ => None,
        }
    }

    pub fn as_supplier(&self) -> Option<&SupplierRecord> {
        match self {
            EntityRecord::Supplier(supplier) => Some(supplier),
            _ => None,
        }
    }
}

impl From<SiteRecord> for EntityRecord {
    fn from(site: SiteRecord) -> Self {
        EntityRecord::Site(site)
    }
}

impl From<SupplierRecord> for EntityRecord {
    fn from(supplier: SupplierRecord) -> Self {
        EntityRecord::Supplier(supplier)
    }
}

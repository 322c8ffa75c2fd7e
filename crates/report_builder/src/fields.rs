//! Declared report fields
//!
//! Row order in key/value tables and column order in data tables and
//! spreadsheets is the order of these tables.

use crate::{ReportOptions, SiteRecord, SupplierRecord, SystemRecord};

/// Marker shown in place of a value the options exclude
pub const EXCLUDED: &str = "Excluded";

/// Shown for fields with no value
pub const NOT_AVAILABLE: &str = "N/A";

/// Option group a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// Always shown
    Core,
    /// Controlled by `include_contact_fields`
    Contact,
    /// Controlled by `include_remarks`
    Remarks,
}

/// A labelled field of a record type
pub struct FieldSpec<R> {
    pub label: &'static str,
    pub group: FieldGroup,
    pub value: fn(&R) -> String,
}

impl<R> FieldSpec<R> {
    /// Display value of this field for `record` under `options`
    pub fn resolve(&self, record: &R, options: &ReportOptions) -> String {
        if !options.shows(self.group) {
            return EXCLUDED.to_string();
        }
        let value = (self.value)(record);
        let trimmed = value.trim();
        if trimmed.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Labels of a field table, in declared order
pub fn labels<R>(fields: &[FieldSpec<R>]) -> Vec<String> {
    fields.iter().map(|field| field.label.to_string()).collect()
}

/// Values of a field table for one record, in declared order
pub fn values<R>(fields: &[FieldSpec<R>], record: &R, options: &ReportOptions) -> Vec<String> {
    fields.iter().map(|field| field.resolve(record, options)).collect()
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

pub const SITE_FIELDS: &[FieldSpec<SiteRecord>] = &[
    FieldSpec { label: "Site Name", group: FieldGroup::Core, value: |s: &SiteRecord| s.site_name.clone() },
    FieldSpec { label: "Site Code", group: FieldGroup::Core, value: |s: &SiteRecord| s.site_code.clone() },
    FieldSpec { label: "Customer", group: FieldGroup::Core, value: |s: &SiteRecord| s.customer_name.clone() },
    FieldSpec { label: "Address", group: FieldGroup::Core, value: |s: &SiteRecord| s.address.clone() },
    FieldSpec { label: "City", group: FieldGroup::Core, value: |s: &SiteRecord| s.city.clone() },
    FieldSpec { label: "State", group: FieldGroup::Core, value: |s: &SiteRecord| s.state.clone() },
    FieldSpec { label: "Country", group: FieldGroup::Core, value: |s: &SiteRecord| s.country.clone() },
    FieldSpec { label: "Postal Code", group: FieldGroup::Core, value: |s: &SiteRecord| s.postal_code.clone() },
    FieldSpec { label: "Contact Person", group: FieldGroup::Contact, value: |s: &SiteRecord| s.contact_person.clone() },
    FieldSpec { label: "Contact Phone", group: FieldGroup::Contact, value: |s: &SiteRecord| s.contact_phone.clone() },
    FieldSpec { label: "Contact Email", group: FieldGroup::Contact, value: |s: &SiteRecord| s.contact_email.clone() },
    FieldSpec { label: "Remarks", group: FieldGroup::Remarks, value: |s: &SiteRecord| s.remarks.clone() },
];

pub const SYSTEM_COLUMNS: &[FieldSpec<SystemRecord>] = &[
    FieldSpec { label: "System Name", group: FieldGroup::Core, value: |s: &SystemRecord| s.system_name.clone() },
    FieldSpec { label: "Type", group: FieldGroup::Core, value: |s: &SystemRecord| s.system_type.clone() },
    FieldSpec { label: "Manufacturer", group: FieldGroup::Core, value: |s: &SystemRecord| s.manufacturer.clone() },
    FieldSpec { label: "Model", group: FieldGroup::Core, value: |s: &SystemRecord| s.model.clone() },
    FieldSpec { label: "Serial Number", group: FieldGroup::Core, value: |s: &SystemRecord| s.serial_number.clone() },
    FieldSpec { label: "Install Date", group: FieldGroup::Core, value: |s: &SystemRecord| s.install_date.clone() },
    FieldSpec { label: "Status", group: FieldGroup::Core, value: |s: &SystemRecord| s.status.clone() },
];

pub const SUPPLIER_COLUMNS: &[FieldSpec<SupplierRecord>] = &[
    FieldSpec { label: "Supplier Name", group: FieldGroup::Core, value: |s: &SupplierRecord| s.supplier_name.clone() },
    FieldSpec { label: "Code", group: FieldGroup::Core, value: |s: &SupplierRecord| s.supplier_code.clone() },
    FieldSpec { label: "Category", group: FieldGroup::Core, value: |s: &SupplierRecord| s.category.clone() },
    FieldSpec { label: "Address", group: FieldGroup::Core, value: |s: &SupplierRecord| s.address.clone() },
    FieldSpec { label: "Contact Person", group: FieldGroup::Contact, value: |s: &SupplierRecord| s.contact_person.clone() },
    FieldSpec { label: "Phone", group: FieldGroup::Contact, value: |s: &SupplierRecord| s.contact_phone.clone() },
    FieldSpec { label: "Email", group: FieldGroup::Contact, value: |s: &SupplierRecord| s.contact_email.clone() },
    FieldSpec { label: "Status", group: FieldGroup::Core, value: |s: &SupplierRecord| s.status.clone() },
    FieldSpec { label: "Subcontractor", group: FieldGroup::Core, value: |s: &SupplierRecord| yes_no(s.is_subcontractor) },
    FieldSpec { label: "Remarks", group: FieldGroup::Remarks, value: |s: &SupplierRecord| s.remarks.clone() },
];

/// Label of the site column that leads the combined systems table
pub const COMBINED_SITE_COLUMN: &str = "Site";

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteRecord {
        SiteRecord {
            site_name: "  North Depot ".to_string(),
            contact_person: "Dana Reyes".to_string(),
            remarks: "Gate code 4411".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_values_follow_declared_order() {
        let values = values(SITE_FIELDS, &site(), &ReportOptions::default());
        assert_eq!(values.len(), SITE_FIELDS.len());
        assert_eq!(values[0], "North Depot");
        assert_eq!(values[1], NOT_AVAILABLE);
        assert_eq!(values[8], "Dana Reyes");
        assert_eq!(values[11], "Gate code 4411");
    }

    #[test]
    fn test_excluded_groups_keep_their_rows() {
        let options = ReportOptions {
            include_contact_fields: false,
            include_remarks: false,
            ..Default::default()
        };
        let values = values(SITE_FIELDS, &site(), &options);
        assert_eq!(values.len(), SITE_FIELDS.len());
        assert_eq!(&values[8..12], &[EXCLUDED; 4]);
        assert_eq!(values[0], "North Depot");
    }

    #[test]
    fn test_subcontractor_flag_renders_yes_no() {
        let supplier = SupplierRecord {
            is_subcontractor: true,
            ..Default::default()
        };
        let values = values(SUPPLIER_COLUMNS, &supplier, &ReportOptions::default());
        assert_eq!(values[8], "Yes");
    }
}

//! Report options

use crate::FieldGroup;
use serde::{Deserialize, Serialize};

/// Flags chosen by the user before generating a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportOptions {
    /// Include nested tables (a site's systems) and the combined trailing table
    pub include_sub_table: bool,
    /// Show contact person, phone and email values
    pub include_contact_fields: bool,
    /// Show remarks values
    pub include_remarks: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_sub_table: true,
            include_contact_fields: true,
            include_remarks: true,
        }
    }
}

impl ReportOptions {
    /// Whether fields of `group` show their values
    pub fn shows(&self, group: FieldGroup) -> bool {
        match group {
            FieldGroup::Core => true,
            FieldGroup::Contact => self.include_contact_fields,
            FieldGroup::Remarks => self.include_remarks,
        }
    }
}

//! Flat workbook model projected from a report document
//!
//! Spreadsheets have no pagination, so the projection works on the content
//! model directly and never sees a page plan.

use report_model::{ContentBlock, DataTable, Document};

/// Sheet names are limited to 31 characters and may not contain these
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const MAX_SHEET_NAME: usize = 31;

/// One worksheet: a header row plus data rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Worksheet {
    pub fn new(name: &str, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: sheet_name(name),
            columns,
            rows,
        }
    }

    fn from_table(name: &str, table: &DataTable) -> Self {
        Self::new(name, table.columns().to_vec(), table.rows().to_vec())
    }
}

/// Ordered list of worksheets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Worksheet>,
}

impl Workbook {
    /// Project a document into worksheets
    ///
    /// The first sheet holds one row per section, built from the section's
    /// key/value table. Documents without key/value tables use their first
    /// data table instead. The combined trailing table, when present, becomes
    /// the second sheet.
    pub fn from_document(document: &Document) -> Self {
        let entity_sheet = format!("{} Information", document.kind.entity_label());
        let mut sheets = Vec::new();

        let key_values: Vec<_> = document
            .sections
            .iter()
            .filter_map(|section| section.blocks.iter().find_map(ContentBlock::as_key_value))
            .collect();

        if let Some(first) = key_values.first() {
            let columns = first.rows.iter().map(|row| row.label.clone()).collect();
            let rows = key_values
                .iter()
                .map(|table| table.rows.iter().map(|row| row.value.clone()).collect())
                .collect();
            sheets.push(Worksheet::new(&entity_sheet, columns, rows));
        } else if let Some(table) = document
            .sections
            .iter()
            .flat_map(|section| section.blocks.iter())
            .find_map(ContentBlock::as_data_table)
        {
            sheets.push(Worksheet::from_table(&entity_sheet, table));
        }

        if let Some(table) = document
            .trailing_blocks
            .iter()
            .find_map(ContentBlock::as_data_table)
        {
            let name = document.kind.sub_table_label().unwrap_or("Details");
            sheets.push(Worksheet::from_table(name, table));
        }

        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

/// Make a name acceptable as a worksheet name
fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c))
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

/// Spreadsheet column letters for a zero-based index (0 -> A, 26 -> AA)
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use report_model::{KeyValueRow, ReportKind, Section, Stat};

    fn site_section(name: &str, phone: &str) -> Section {
        Section::new(
            name,
            vec![
                ContentBlock::heading(name, 2),
                ContentBlock::key_value(vec![
                    KeyValueRow::new("Site Name", name),
                    KeyValueRow::new("Contact Phone", phone),
                ]),
            ],
        )
    }

    #[test]
    fn test_site_sheets() {
        let systems = ContentBlock::data_table(
            vec!["Site".into(), "System Name".into()],
            vec![vec!["North".into(), "Chiller".into()]],
        );
        let doc = Document::new(ReportKind::Site, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
            .with_section(site_section("North", "555-0100"))
            .with_section(site_section("South", "Excluded"))
            .with_trailing(ContentBlock::Divider)
            .with_trailing(systems);

        let book = Workbook::from_document(&doc);
        assert_eq!(book.sheets.len(), 2);

        let info = book.sheet("Site Information").unwrap();
        assert_eq!(info.columns, vec!["Site Name", "Contact Phone"]);
        assert_eq!(info.rows[1], vec!["South", "Excluded"]);

        let systems = book.sheet("Systems").unwrap();
        assert_eq!(systems.rows, vec![vec!["North", "Chiller"]]);
    }

    #[test]
    fn test_supplier_uses_data_table() {
        let doc = Document::new(ReportKind::Supplier, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
            .with_section(Section::new(
                "Suppliers",
                vec![
                    ContentBlock::summary(vec![Stat::new("Total", 1)]),
                    ContentBlock::data_table(vec!["Supplier Name".into()], vec![vec!["Acme".into()]]),
                ],
            ));

        let book = Workbook::from_document(&doc);
        assert_eq!(book.sheets.len(), 1);
        assert_eq!(book.sheets[0].name, "Supplier Information");
        assert_eq!(book.sheets[0].rows, vec![vec!["Acme"]]);
    }

    #[test]
    fn test_sheet_name_cleanup() {
        assert_eq!(sheet_name("A/B: C?"), "AB C");
        assert_eq!(sheet_name("x".repeat(40).as_str()).len(), 31);
        assert_eq!(sheet_name("[]"), "Sheet");
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }
}

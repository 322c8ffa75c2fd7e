//! Content blocks - the units of content the layout engine places on pages

use crate::{ReportModelError, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Themes
// =============================================================================

/// Visual theme of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableTheme {
    /// Header row fill plus alternating row shading
    Striped,
    /// Every cell outlined
    Grid,
    /// No fills and no borders
    Plain,
}

impl Default for TableTheme {
    fn default() -> Self {
        TableTheme::Striped
    }
}

// =============================================================================
// Block Types
// =============================================================================

/// A heading line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    /// Heading level, 1 is the largest
    pub level: u8,
}

/// One label/value row of a key/value table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueRow {
    pub label: String,
    pub value: String,
}

impl KeyValueRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Two-column table of labelled values, never split across pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueTable {
    pub rows: Vec<KeyValueRow>,
    #[serde(default)]
    pub theme: TableTheme,
}

impl KeyValueTable {
    pub fn new(rows: Vec<KeyValueRow>, theme: TableTheme) -> Self {
        Self { rows, theme }
    }

    /// Get the value for a label, if present
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

#[derive(Deserialize)]
struct DataTableRepr {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    #[serde(default)]
    theme: TableTheme,
}

/// Multi-row table with a header row
///
/// Every row has exactly as many cells as there are columns. The layout
/// engine may split a data table between rows; each part keeps the same
/// columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DataTableRepr")]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    theme: TableTheme,
}

impl TryFrom<DataTableRepr> for DataTable {
    type Error = ReportModelError;

    fn try_from(repr: DataTableRepr) -> Result<Self> {
        DataTable::try_new(repr.columns, repr.rows, repr.theme)
    }
}

impl DataTable {
    /// Create a data table
    ///
    /// # Panics
    ///
    /// Panics if there are no columns or if any row's length differs from
    /// the number of columns. A malformed table is a builder bug.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>, theme: TableTheme) -> Self {
        match Self::try_new(columns, rows, theme) {
            Ok(table) => table,
            Err(e) => panic!("malformed data table: {}", e),
        }
    }

    /// Create a data table, checking row arity
    pub fn try_new(columns: Vec<String>, rows: Vec<Vec<String>>, theme: TableTheme) -> Result<Self> {
        if columns.is_empty() {
            return Err(ReportModelError::NoColumns);
        }
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(ReportModelError::RowArity {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }
        Ok(Self { columns, rows, theme })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn theme(&self) -> TableTheme {
        self.theme
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Split after `at` rows. Both parts carry the same columns and theme.
    ///
    /// # Panics
    ///
    /// Panics if `at` is greater than the row count.
    pub fn split_at(&self, at: usize) -> (DataTable, DataTable) {
        assert!(at <= self.rows.len(), "split point {} beyond {} rows", at, self.rows.len());
        let head = DataTable {
            columns: self.columns.clone(),
            rows: self.rows[..at].to_vec(),
            theme: self.theme,
        };
        let tail = DataTable {
            columns: self.columns.clone(),
            rows: self.rows[at..].to_vec(),
            theme: self.theme,
        };
        (head, tail)
    }
}

/// A single labelled count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub count: usize,
}

impl Stat {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Row of labelled counts drawn as boxes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCard {
    pub stats: Vec<Stat>,
}

// =============================================================================
// ContentBlock
// =============================================================================

/// One unit of report content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
    Heading(Heading),
    KeyValueTable(KeyValueTable),
    DataTable(DataTable),
    Divider,
    SummaryCard(SummaryCard),
}

/// Discriminant of a content block, used for logging and accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading,
    KeyValueTable,
    DataTable,
    Divider,
    SummaryCard,
}

impl ContentBlock {
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        ContentBlock::Heading(Heading {
            text: text.into(),
            level,
        })
    }

    pub fn key_value(rows: Vec<KeyValueRow>) -> Self {
        ContentBlock::KeyValueTable(KeyValueTable::new(rows, TableTheme::Grid))
    }

    pub fn data_table(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        ContentBlock::DataTable(DataTable::new(columns, rows, TableTheme::Striped))
    }

    pub fn summary(stats: Vec<Stat>) -> Self {
        ContentBlock::SummaryCard(SummaryCard { stats })
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Heading(_) => BlockKind::Heading,
            ContentBlock::KeyValueTable(_) => BlockKind::KeyValueTable,
            ContentBlock::DataTable(_) => BlockKind::DataTable,
            ContentBlock::Divider => BlockKind::Divider,
            ContentBlock::SummaryCard(_) => BlockKind::SummaryCard,
        }
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, ContentBlock::Divider)
    }

    pub fn as_data_table(&self) -> Option<&DataTable> {
        match self {
            ContentBlock::DataTable(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_key_value(&self) -> Option<&KeyValueTable> {
        match self {
            ContentBlock::KeyValueTable(table) => Some(table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_try_new_rejects_short_row() {
        let err = DataTable::try_new(
            cols(&["A", "B"]),
            vec![row(&["1", "2"]), row(&["3"])],
            TableTheme::Striped,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReportModelError::RowArity {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_try_new_rejects_no_columns() {
        let err = DataTable::try_new(Vec::new(), Vec::new(), TableTheme::Plain).unwrap_err();
        assert_eq!(err, ReportModelError::NoColumns);
    }

    #[test]
    #[should_panic(expected = "malformed data table")]
    fn test_new_panics_on_bad_arity() {
        DataTable::new(cols(&["A"]), vec![row(&["1", "2"])], TableTheme::Grid);
    }

    #[test]
    fn test_split_keeps_columns_and_order() {
        let table = DataTable::new(
            cols(&["Name", "Code"]),
            vec![row(&["a", "1"]), row(&["b", "2"]), row(&["c", "3"])],
            TableTheme::Grid,
        );
        let (head, tail) = table.split_at(2);
        assert_eq!(head.columns(), table.columns());
        assert_eq!(tail.columns(), table.columns());
        assert_eq!(head.rows(), &table.rows()[..2]);
        assert_eq!(tail.rows(), &table.rows()[2..]);
        assert_eq!(tail.theme(), TableTheme::Grid);
    }

    #[test]
    fn test_deserialize_checks_arity() {
        let ok = r#"{"type":"dataTable","columns":["A"],"rows":[["1"]]}"#;
        let block: ContentBlock = serde_json::from_str(ok).unwrap();
        assert_eq!(block.kind(), BlockKind::DataTable);

        let bad = r#"{"type":"dataTable","columns":["A"],"rows":[["1","2"]]}"#;
        assert!(serde_json::from_str::<ContentBlock>(bad).is_err());
    }

    #[test]
    fn test_key_value_lookup() {
        let table = KeyValueTable::new(
            vec![KeyValueRow::new("Site Name", "North Yard")],
            TableTheme::Grid,
        );
        assert_eq!(table.value_of("Site Name"), Some("North Yard"));
        assert_eq!(table.value_of("Missing"), None);
    }
}

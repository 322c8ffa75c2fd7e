//! Block measurement
//!
//! Every content block has a vertical extent that depends only on the block
//! and the page metrics. Text never wraps, so each row is one line.

use crate::PageMetrics;
use report_model::{ContentBlock, DataTable};

/// Vertical extent of a block in points, excluding the spacing after it
pub fn measure(block: &ContentBlock, metrics: &PageMetrics) -> f32 {
    match block {
        ContentBlock::Heading(heading) => metrics.row_height(metrics.heading_font_size(heading.level)),
        ContentBlock::KeyValueTable(table) => table.rows.len() as f32 * metrics.body_row_height(),
        ContentBlock::DataTable(table) => data_table_height(table.row_count(), metrics),
        ContentBlock::Divider => metrics.divider_height,
        ContentBlock::SummaryCard(_) => summary_card_height(metrics),
    }
}

/// Smallest piece of a block that can be placed on its own
///
/// A data table can be split between rows, so its minimum is the header
/// plus one row. Every other block is indivisible.
pub fn min_height(block: &ContentBlock, metrics: &PageMetrics) -> f32 {
    match block {
        ContentBlock::DataTable(table) => data_table_height(table.row_count().min(1), metrics),
        _ => measure(block, metrics),
    }
}

/// Height of a data table header plus `rows` body rows
pub fn data_table_height(rows: usize, metrics: &PageMetrics) -> f32 {
    metrics.table_header_height + rows as f32 * metrics.body_row_height()
}

/// Number of whole rows of `table` that fit, with its header, in `available`
pub fn rows_that_fit(table: &DataTable, available: f32, metrics: &PageMetrics) -> usize {
    if available < metrics.table_header_height {
        return 0;
    }
    let row_height = metrics.body_row_height();
    let mut rows = ((available - metrics.table_header_height) / row_height).floor() as usize;
    rows = rows.min(table.row_count());
    // Guard against float rounding at the boundary
    while rows > 0 && data_table_height(rows, metrics) > available {
        rows -= 1;
    }
    rows
}

/// Height of a summary card: a label line and a count line inside padding
pub fn summary_card_height(metrics: &PageMetrics) -> f32 {
    metrics.card_padding * 2.0
        + metrics.row_height(metrics.card_label_font_size())
        + metrics.row_height(metrics.card_value_font_size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_model::{KeyValueRow, Stat, TableTheme};

    fn table(rows: usize) -> DataTable {
        DataTable::new(
            vec!["Name".to_string(), "Type".to_string()],
            (0..rows)
                .map(|i| vec![format!("System {}", i), "HVAC".to_string()])
                .collect(),
            TableTheme::Striped,
        )
    }

    #[test]
    fn test_measure_key_value_table() {
        let metrics = PageMetrics::default();
        let block = ContentBlock::key_value(vec![
            KeyValueRow::new("A", "1"),
            KeyValueRow::new("B", "2"),
            KeyValueRow::new("C", "3"),
        ]);
        assert_eq!(measure(&block, &metrics), 48.0);
    }

    #[test]
    fn test_measure_data_table() {
        let metrics = PageMetrics::default();
        let block = ContentBlock::DataTable(table(5));
        assert_eq!(measure(&block, &metrics), 20.0 + 5.0 * 16.0);
        assert_eq!(min_height(&block, &metrics), 36.0);
    }

    #[test]
    fn test_empty_table_is_header_only() {
        let metrics = PageMetrics::default();
        let block = ContentBlock::DataTable(table(0));
        assert_eq!(measure(&block, &metrics), 20.0);
        assert_eq!(min_height(&block, &metrics), 20.0);
    }

    #[test]
    fn test_measure_other_blocks() {
        let metrics = PageMetrics::default();
        assert_eq!(measure(&ContentBlock::Divider, &metrics), 12.0);
        assert_eq!(measure(&ContentBlock::heading("Site", 1), &metrics), 24.0);
        let card = ContentBlock::summary(vec![Stat::new("Active", 2)]);
        assert_eq!(measure(&card, &metrics), 12.0 + 15.0 + 22.0);
    }

    #[test]
    fn test_rows_that_fit() {
        let metrics = PageMetrics::default();
        let t = table(10);
        assert_eq!(rows_that_fit(&t, 19.0, &metrics), 0);
        assert_eq!(rows_that_fit(&t, 35.9, &metrics), 0);
        assert_eq!(rows_that_fit(&t, 36.0, &metrics), 1);
        assert_eq!(rows_that_fit(&t, 100.0, &metrics), 5);
        assert_eq!(rows_that_fit(&t, 10_000.0, &metrics), 10);
    }
}

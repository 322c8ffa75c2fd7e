//! Data table column width allocation

use layout_engine::text_width;
use report_model::DataTable;

/// Horizontal padding inside each cell, per side
pub const CELL_PADDING: f64 = 4.0;

/// Narrowest column before scaling to the available width
pub const MIN_COLUMN_WIDTH: f64 = 40.0;

/// Split `available` between the columns of `table`
///
/// Each column gets a share proportional to its natural width, which is the
/// widest of its header (bold) and cells plus padding, floored at
/// [`MIN_COLUMN_WIDTH`]. The widths always sum to `available`.
pub fn column_widths(table: &DataTable, available: f64, font_size: f32) -> Vec<f64> {
    let natural: Vec<f64> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let header_width = text_width(header, font_size, true);
            let widest_cell = table
                .rows()
                .iter()
                .filter_map(|row| row.get(index))
                .map(|cell| text_width(cell, font_size, false))
                .fold(0.0_f32, f32::max);
            (header_width.max(widest_cell) as f64 + CELL_PADDING * 2.0).max(MIN_COLUMN_WIDTH)
        })
        .collect();

    let total: f64 = natural.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }
    natural.iter().map(|width| width / total * available).collect()
}

/// Left edge of each column given its widths
pub fn column_offsets(x: f64, widths: &[f64]) -> Vec<f64> {
    widths
        .iter()
        .scan(x, |left, width| {
            let start = *left;
            *left += width;
            Some(start)
        })
        .collect()
}

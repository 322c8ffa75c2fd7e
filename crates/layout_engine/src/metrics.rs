//! Page Metrics Provider
//!
//! Fixed page geometry and the font-size to row-height table used by
//! measurement and rendering. All values are in PDF points (1/72 inch).

use crate::{LayoutError, Result};
use serde::{Deserialize, Serialize};

/// Standard page sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// A4 (210mm x 297mm)
    A4,
    /// US Letter (8.5" x 11")
    Letter,
    /// Legal (8.5" x 14")
    Legal,
    /// Custom size in points
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Get the width and height in points
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Row height for each supported font size, (font size, row height)
const ROW_HEIGHTS: &[(f32, f32)] = &[
    (7.0, 14.0),
    (8.0, 15.0),
    (9.0, 16.0),
    (10.0, 18.0),
    (11.0, 19.0),
    (12.0, 20.0),
    (13.0, 21.0),
    (14.0, 22.0),
    (16.0, 24.0),
    (18.0, 26.0),
    (20.0, 28.0),
];

/// Smallest header band that still holds the title bar and summary line
pub const MIN_HEADER_HEIGHT: f32 = 40.0;

/// Smallest footer reserve that still holds the footer rule and text
pub const MIN_FOOTER_RESERVE: f32 = 30.0;

/// Fixed page geometry for one render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    pub page_size: PageSize,
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Height of the header band drawn on every page
    pub header_height: f32,
    /// Gap between the header band and the first block
    pub top_padding: f32,
    /// Space kept free at the bottom of every page for the footer band
    pub footer_reserve: f32,
    /// Height of a data table's column header row
    pub table_header_height: f32,
    /// Font size of table cells and key/value rows
    pub body_font_size: f32,
    /// Vertical gap after each placed block
    pub block_spacing: f32,
    pub divider_height: f32,
    /// Inner padding of summary card boxes
    pub card_padding: f32,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageMetrics {
    /// Create an A4 portrait configuration
    pub fn a4() -> Self {
        Self::for_size(PageSize::A4)
    }

    /// Create a Letter portrait configuration
    pub fn letter() -> Self {
        Self::for_size(PageSize::Letter)
    }

    pub fn for_size(page_size: PageSize) -> Self {
        let (page_width, page_height) = page_size.dimensions();
        Self {
            page_size,
            page_width,
            page_height,
            margin_left: 40.0,
            margin_right: 40.0,
            header_height: 96.0,
            top_padding: 14.0,
            footer_reserve: 48.0,
            table_header_height: 20.0,
            body_font_size: 9.0,
            block_spacing: 10.0,
            divider_height: 12.0,
            card_padding: 6.0,
        }
    }

    /// Check that the page leaves room for content
    pub fn validate(&self) -> Result<()> {
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(LayoutError::InvalidPageSetup(format!(
                "page size must be positive, got {}x{}",
                self.page_width, self.page_height
            )));
        }
        if self.content_width() <= 0.0 {
            return Err(LayoutError::InvalidPageSetup(format!(
                "margins {} + {} leave no content width",
                self.margin_left, self.margin_right
            )));
        }
        if self.header_height < MIN_HEADER_HEIGHT {
            return Err(LayoutError::InvalidPageSetup(format!(
                "header height {} is below the minimum {}",
                self.header_height, MIN_HEADER_HEIGHT
            )));
        }
        if self.footer_reserve < MIN_FOOTER_RESERVE {
            return Err(LayoutError::InvalidPageSetup(format!(
                "footer reserve {} is below the minimum {}",
                self.footer_reserve, MIN_FOOTER_RESERVE
            )));
        }
        if self.usable_height() <= 0.0 {
            return Err(LayoutError::InvalidPageSetup(format!(
                "header {} + padding {} + footer {} leave no content height",
                self.header_height, self.top_padding, self.footer_reserve
            )));
        }
        if self.body_font_size <= 0.0 {
            return Err(LayoutError::InvalidPageSetup(
                "body font size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Width between the left and right margins
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Cursor position of the first block on every page
    pub fn content_top(&self) -> f32 {
        self.header_height + self.top_padding
    }

    /// Lowest y any placed block may reach
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.footer_reserve
    }

    /// Height available to blocks on an empty page
    pub fn usable_height(&self) -> f32 {
        self.content_bottom() - self.content_top()
    }

    /// Row height for a font size
    ///
    /// Sizes between table entries round up to the next entry; sizes beyond
    /// the table scale at 1.4x.
    pub fn row_height(&self, font_size: f32) -> f32 {
        ROW_HEIGHTS
            .iter()
            .find(|(size, _)| *size >= font_size)
            .map(|(_, height)| *height)
            .unwrap_or_else(|| (font_size * 1.4).ceil())
    }

    /// Row height of body text (table cells, key/value rows)
    pub fn body_row_height(&self) -> f32 {
        self.row_height(self.body_font_size)
    }

    /// Font size for a heading level
    pub fn heading_font_size(&self, level: u8) -> f32 {
        match level {
            0 | 1 => 16.0,
            2 => 13.0,
            3 => 11.0,
            _ => self.body_font_size + 1.0,
        }
    }

    /// Font size of the count line in summary cards
    pub fn card_value_font_size(&self) -> f32 {
        14.0
    }

    /// Font size of the label line in summary cards
    pub fn card_label_font_size(&self) -> f32 {
        (self.body_font_size - 1.0).max(6.0)
    }
}

//! Page renderer
//!
//! Turns one page of a `PagePlan` into draw commands. Every page gets the same
//! header band and footer band; only the page number text differs between
//! pages. Rendering reads the plan and the context and never modifies them.

use crate::{
    column_offsets, column_widths, Color, DrawCommand, ImageRenderInfo, PageRender, Palette,
    Rect, RenderContext, RenderError, RenderModel, Result, TextRun, CELL_PADDING,
};
use layout_engine::{fit_text, summary_card_height, text_width, Page, PageMetrics, PagePlan};
use report_model::{ContentBlock, DataTable, Heading, KeyValueTable, Stat, SummaryCard, TableTheme};
use tracing::debug;

/// Share of the content width given to key/value labels
const LABEL_COLUMN_SHARE: f64 = 0.35;
/// Gap between summary card boxes
const CARD_GAP: f64 = 8.0;
/// Largest logo drawn in the header band
const LOGO_MAX_WIDTH: f64 = 120.0;
const LOGO_MAX_HEIGHT: f64 = 40.0;
/// Height of the title bar inside the header
const TITLE_BAR_HEIGHT: f64 = 20.0;
const TITLE_FONT_SIZE: f64 = 12.0;
const ORGANIZATION_FONT_SIZE: f64 = 11.0;
const ADDRESS_FONT_SIZE: f64 = 8.0;
const FOOTER_FONT_SIZE: f64 = 7.5;
const CONTINUED_FONT_SIZE: f64 = 7.0;

/// Baseline that vertically centers text of `font_size` in a row
fn baseline(top: f64, row_height: f64, font_size: f64) -> f64 {
    top + (row_height + font_size * 0.7) / 2.0
}

fn width_of(text: &str, font_size: f64, bold: bool) -> f64 {
    text_width(text, font_size as f32, bold) as f64
}

/// Draw-command accumulator for one page
struct Canvas {
    commands: Vec<DrawCommand>,
}

impl Canvas {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Left-aligned text, truncated to `max_width`
    fn text(&mut self, text: &str, x: f64, y: f64, max_width: f64, size: f64, bold: bool, color: Color) {
        let fitted = fit_text(text, max_width as f32, size as f32, bold);
        if fitted.is_empty() {
            return;
        }
        self.push(DrawCommand::Text(TextRun {
            text: fitted.into_owned(),
            x,
            y,
            font_size: size,
            bold,
            color,
        }));
    }

    /// Text ending at `right`, truncated to `max_width`
    fn text_right(&mut self, text: &str, right: f64, y: f64, max_width: f64, size: f64, bold: bool, color: Color) {
        let fitted = fit_text(text, max_width as f32, size as f32, bold);
        let x = right - width_of(&fitted, size, bold);
        self.text(&fitted, x, y, max_width, size, bold, color);
    }

    /// Text centered on `center`, truncated to `max_width`
    fn text_centered(&mut self, text: &str, center: f64, y: f64, max_width: f64, size: f64, bold: bool, color: Color) {
        let fitted = fit_text(text, max_width as f32, size as f32, bold);
        let x = center - width_of(&fitted, size, bold) / 2.0;
        self.text(&fitted, x, y, max_width, size, bold, color);
    }
}

/// Renders planned pages to draw commands
#[derive(Debug, Clone)]
pub struct PageRenderer {
    metrics: PageMetrics,
    palette: Palette,
}

impl PageRenderer {
    /// Create a renderer, rejecting metrics that leave no room for content
    pub fn new(metrics: PageMetrics) -> Result<Self> {
        metrics.validate()?;
        Ok(Self {
            metrics,
            palette: Palette::default(),
        })
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn metrics(&self) -> &PageMetrics {
        &self.metrics
    }

    /// Render every page of a plan
    pub fn render_plan(&self, plan: &PagePlan, ctx: &RenderContext) -> Result<RenderModel> {
        let mut model = RenderModel::new();
        for page in &plan.pages {
            model.add_page(self.render(page, plan.total_pages, ctx)?);
        }
        Ok(model)
    }

    /// Render one page
    pub fn render(&self, page: &Page, total_pages: usize, ctx: &RenderContext) -> Result<PageRender> {
        if page.page_number == 0 || page.page_number > total_pages {
            return Err(RenderError::PageOutOfRange {
                page: page.page_number,
                total: total_pages,
            });
        }

        let mut canvas = Canvas::new();
        self.draw_header(&mut canvas, ctx);
        for placed in &page.placed_blocks {
            let top = placed.y_offset as f64;
            match &placed.block {
                ContentBlock::Heading(heading) => self.draw_heading(&mut canvas, heading, top),
                ContentBlock::KeyValueTable(table) => self.draw_key_value(&mut canvas, table, top),
                ContentBlock::DataTable(table) => {
                    self.draw_data_table(&mut canvas, table, top, placed.continuation)
                }
                ContentBlock::Divider => self.draw_divider(&mut canvas, top),
                ContentBlock::SummaryCard(card) => self.draw_summary_card(&mut canvas, card, top),
            }
        }
        self.draw_footer(&mut canvas, page.page_number, total_pages, ctx);

        debug!(
            page = page.page_number,
            blocks = page.placed_blocks.len(),
            commands = canvas.commands.len(),
            "page rendered"
        );

        Ok(PageRender {
            page_number: page.page_number,
            width: self.metrics.page_width as f64,
            height: self.metrics.page_height as f64,
            commands: canvas.commands,
        })
    }

    fn left(&self) -> f64 {
        self.metrics.margin_left as f64
    }

    fn right(&self) -> f64 {
        (self.metrics.page_width - self.metrics.margin_right) as f64
    }

    fn content_width(&self) -> f64 {
        self.metrics.content_width() as f64
    }

    fn body_size(&self) -> f64 {
        self.metrics.body_font_size as f64
    }

    fn body_row(&self) -> f64 {
        self.metrics.body_row_height() as f64
    }

    // =========================================================================
    // Header and footer bands
    // =========================================================================

    fn draw_header(&self, canvas: &mut Canvas, ctx: &RenderContext) {
        let page_width = self.metrics.page_width as f64;
        let header_height = self.metrics.header_height as f64;
        let band_height = (header_height - TITLE_BAR_HEIGHT * 2.0).max(0.0);
        let palette = &self.palette;

        canvas.push(DrawCommand::fill(
            Rect::new(0.0, 0.0, page_width, band_height),
            palette.header_fill,
        ));

        // Logo region; without a logo the band is left empty
        let mut logo_right = self.left();
        if let Some(logo) = &ctx.logo {
            let (width, height) = logo.fit_within(LOGO_MAX_WIDTH, LOGO_MAX_HEIGHT.min(band_height));
            if width > 0.0 && height > 0.0 {
                let top = (band_height - height) / 2.0;
                canvas.push(DrawCommand::Image(ImageRenderInfo {
                    resource_id: logo.resource_id.clone(),
                    bounds: Rect::new(self.left(), top, width, height),
                }));
                logo_right += width + CARD_GAP;
            }
        }

        // Organization block, right-aligned
        let block_width = self.right() - logo_right;
        let mut line_y = 20.0;
        canvas.text_right(
            &ctx.branding.organization_name,
            self.right(),
            line_y,
            block_width,
            ORGANIZATION_FONT_SIZE,
            true,
            palette.text,
        );
        for line in &ctx.branding.address_lines {
            line_y += ADDRESS_FONT_SIZE + 3.0;
            if line_y > band_height - 3.0 {
                break;
            }
            canvas.text_right(line, self.right(), line_y, block_width, ADDRESS_FONT_SIZE, false, palette.muted_text);
        }

        // Title bar
        let bar_top = header_height - TITLE_BAR_HEIGHT * 1.8;
        canvas.push(DrawCommand::fill(
            Rect::new(self.left(), bar_top, self.content_width(), TITLE_BAR_HEIGHT),
            palette.title_bar_fill,
        ));
        let center = self.left() + self.content_width() / 2.0;
        canvas.text_centered(
            &ctx.title,
            center,
            baseline(bar_top, TITLE_BAR_HEIGHT, TITLE_FONT_SIZE),
            self.content_width() - CELL_PADDING * 2.0,
            TITLE_FONT_SIZE,
            true,
            palette.title_text,
        );

        if let Some(summary) = ctx.summary_line() {
            canvas.text_centered(
                &summary,
                center,
                header_height - 4.0,
                self.content_width(),
                ADDRESS_FONT_SIZE,
                false,
                palette.muted_text,
            );
        }
    }

    fn draw_footer(&self, canvas: &mut Canvas, page_number: usize, total_pages: usize, ctx: &RenderContext) {
        let rule_y = self.metrics.content_bottom() as f64 + 12.0;
        let text_y = rule_y + 14.0;
        let third = self.content_width() / 3.0;
        let palette = &self.palette;

        canvas.push(DrawCommand::horizontal(self.left(), rule_y, self.content_width(), palette.rule, 0.5));
        canvas.text(&ctx.branding.notice, self.left(), text_y, third, FOOTER_FONT_SIZE, false, palette.muted_text);
        canvas.text_centered(
            &ctx.date_label(),
            self.left() + self.content_width() / 2.0,
            text_y,
            third,
            FOOTER_FONT_SIZE,
            false,
            palette.muted_text,
        );
        canvas.text_right(
            &format!("Page {} of {}", page_number, total_pages),
            self.right(),
            text_y,
            third,
            FOOTER_FONT_SIZE,
            false,
            palette.muted_text,
        );
    }

    // =========================================================================
    // Content blocks
    // =========================================================================

    fn draw_heading(&self, canvas: &mut Canvas, heading: &Heading, top: f64) {
        let size = self.metrics.heading_font_size(heading.level);
        let row_height = self.metrics.row_height(size) as f64;
        let size = size as f64;
        canvas.text(
            &heading.text,
            self.left(),
            baseline(top, row_height, size),
            self.content_width(),
            size,
            true,
            self.palette.heading_text,
        );
        if heading.level <= 2 {
            canvas.push(DrawCommand::horizontal(
                self.left(),
                top + row_height - 1.0,
                self.content_width(),
                self.palette.rule,
                0.75,
            ));
        }
    }

    fn draw_key_value(&self, canvas: &mut Canvas, table: &KeyValueTable, top: f64) {
        let row_height = self.body_row();
        let size = self.body_size();
        let label_width = self.content_width() * LABEL_COLUMN_SHARE;
        let value_width = self.content_width() - label_width;
        let value_x = self.left() + label_width;
        let palette = &self.palette;

        for (index, row) in table.rows.iter().enumerate() {
            let row_top = top + index as f64 * row_height;
            let label_cell = Rect::new(self.left(), row_top, label_width, row_height);
            let value_cell = Rect::new(value_x, row_top, value_width, row_height);
            match table.theme {
                TableTheme::Grid => {
                    canvas.push(DrawCommand::fill(label_cell, palette.label_fill));
                    canvas.push(DrawCommand::stroke(label_cell, palette.grid_stroke, 0.5));
                    canvas.push(DrawCommand::stroke(value_cell, palette.grid_stroke, 0.5));
                }
                TableTheme::Striped if index % 2 == 1 => {
                    canvas.push(DrawCommand::fill(
                        Rect::new(self.left(), row_top, self.content_width(), row_height),
                        palette.stripe_fill,
                    ));
                }
                _ => {}
            }
            let text_y = baseline(row_top, row_height, size);
            canvas.text(
                &row.label,
                self.left() + CELL_PADDING,
                text_y,
                label_width - CELL_PADDING * 2.0,
                size,
                true,
                palette.text,
            );
            canvas.text(
                &row.value,
                value_x + CELL_PADDING,
                text_y,
                value_width - CELL_PADDING * 2.0,
                size,
                false,
                palette.text,
            );
        }
    }

    fn draw_data_table(&self, canvas: &mut Canvas, table: &DataTable, top: f64, continuation: bool) {
        let palette = &self.palette;
        let size = self.body_size();
        let header_height = self.metrics.table_header_height as f64;
        let row_height = self.body_row();
        let widths = column_widths(table, self.content_width(), self.metrics.body_font_size);
        let offsets = column_offsets(self.left(), &widths);

        if continuation {
            canvas.text_right(
                "(continued)",
                self.right(),
                top - 3.0,
                self.content_width(),
                CONTINUED_FONT_SIZE,
                false,
                palette.muted_text,
            );
        }

        // Header row
        let header = Rect::new(self.left(), top, self.content_width(), header_height);
        let header_text = match table.theme() {
            TableTheme::Plain => {
                canvas.push(DrawCommand::horizontal(self.left(), header.bottom(), header.width, palette.rule, 0.75));
                palette.text
            }
            _ => {
                canvas.push(DrawCommand::fill(header, palette.table_header_fill));
                palette.table_header_text
            }
        };
        let header_y = baseline(top, header_height, size);
        for ((column, x), width) in table.columns().iter().zip(&offsets).zip(&widths) {
            canvas.text(column, x + CELL_PADDING, header_y, width - CELL_PADDING * 2.0, size, true, header_text);
        }

        // Body rows
        for (index, row) in table.rows().iter().enumerate() {
            let row_top = header.bottom() + index as f64 * row_height;
            match table.theme() {
                TableTheme::Striped if index % 2 == 1 => canvas.push(DrawCommand::fill(
                    Rect::new(self.left(), row_top, self.content_width(), row_height),
                    palette.stripe_fill,
                )),
                TableTheme::Grid => {
                    for (x, width) in offsets.iter().zip(&widths) {
                        canvas.push(DrawCommand::stroke(
                            Rect::new(*x, row_top, *width, row_height),
                            palette.grid_stroke,
                            0.5,
                        ));
                    }
                }
                _ => {}
            }
            let text_y = baseline(row_top, row_height, size);
            for ((cell, x), width) in row.iter().zip(&offsets).zip(&widths) {
                canvas.text(cell, x + CELL_PADDING, text_y, width - CELL_PADDING * 2.0, size, false, palette.text);
            }
        }

        if table.theme() == TableTheme::Striped {
            let bottom = header.bottom() + table.row_count() as f64 * row_height;
            canvas.push(DrawCommand::horizontal(self.left(), bottom, self.content_width(), palette.grid_stroke, 0.5));
        }
    }

    fn draw_divider(&self, canvas: &mut Canvas, top: f64) {
        let y = top + self.metrics.divider_height as f64 / 2.0;
        canvas.push(DrawCommand::horizontal(self.left(), y, self.content_width(), self.palette.rule, 0.75));
    }

    fn draw_summary_card(&self, canvas: &mut Canvas, card: &SummaryCard, top: f64) {
        if card.stats.is_empty() {
            return;
        }
        let count = card.stats.len() as f64;
        let box_width = (self.content_width() - CARD_GAP * (count - 1.0)) / count;
        let box_height = summary_card_height(&self.metrics) as f64;
        for (index, stat) in card.stats.iter().enumerate() {
            let x = self.left() + index as f64 * (box_width + CARD_GAP);
            self.draw_stat_box(canvas, stat, Rect::new(x, top, box_width, box_height));
        }
    }

    fn draw_stat_box(&self, canvas: &mut Canvas, stat: &Stat, bounds: Rect) {
        let palette = &self.palette;
        let padding = self.metrics.card_padding as f64;
        let label_size = self.metrics.card_label_font_size();
        let value_size = self.metrics.card_value_font_size();
        let label_row = self.metrics.row_height(label_size) as f64;
        let value_row = self.metrics.row_height(value_size) as f64;
        let center = bounds.x + bounds.width / 2.0;
        let inner_width = bounds.width - padding * 2.0;

        canvas.push(DrawCommand::Rectangle {
            bounds,
            fill: Some(palette.card_fill),
            stroke: Some(palette.grid_stroke),
            stroke_width: 0.5,
        });
        canvas.text_centered(
            &stat.label,
            center,
            baseline(bounds.y + padding, label_row, label_size as f64),
            inner_width,
            label_size as f64,
            false,
            palette.muted_text,
        );
        canvas.text_centered(
            &stat.count.to_string(),
            center,
            baseline(bounds.y + padding + label_row, value_row, value_size as f64),
            inner_width,
            value_size as f64,
            true,
            palette.heading_text,
        );
    }
}

/// Render one page with the default palette
pub fn render(page: &Page, total_pages: usize, metrics: &PageMetrics, ctx: &RenderContext) -> Result<PageRender> {
    PageRenderer::new(metrics.clone())?.render(page, total_pages, ctx)
}

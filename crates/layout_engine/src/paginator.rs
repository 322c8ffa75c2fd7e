//! Pagination Algorithm
//!
//! Flows the blocks of a report document onto fixed-size pages.
//!
//! Key features:
//! - Single greedy forward pass, never revisits a closed page
//! - Data tables split between whole rows; the remainder carries the same columns
//! - Dividers never start a page
//! - Headings are kept with the start of the block that follows them
//! - Oversized blocks are placed alone on a page and reported as warnings

use crate::{measure, min_height, rows_that_fit, LayoutWarning, PageMetrics};
use report_model::{BlockOrigin, ContentBlock, Document};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// A block assigned to a page at a vertical offset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    /// The block, or for a split data table the rows placed on this page
    pub block: ContentBlock,
    /// Position of the source block in the document
    pub origin: BlockOrigin,
    /// Distance from the top of the page
    pub y_offset: f32,
    /// Measured height of `block`
    pub height: f32,
    /// Whether this continues a data table started on an earlier page
    pub continuation: bool,
}

impl PlacedBlock {
    /// Lowest y reached by this block
    pub fn bottom(&self) -> f32 {
        self.y_offset + self.height
    }
}

/// One page of the plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based page number
    pub page_number: usize,
    pub placed_blocks: Vec<PlacedBlock>,
}

impl Page {
    fn new(page_number: usize) -> Self {
        Self {
            page_number,
            placed_blocks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placed_blocks.is_empty()
    }
}

/// The assignment of document blocks to pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlan {
    pub pages: Vec<Page>,
    pub total_pages: usize,
    /// Dividers removed because they would have started a page
    pub dropped_dividers: Vec<BlockOrigin>,
    pub warnings: Vec<LayoutWarning>,
}

impl PagePlan {
    /// Iterate over every placed block of every page
    pub fn placed_blocks(&self) -> impl Iterator<Item = (&Page, &PlacedBlock)> {
        self.pages
            .iter()
            .flat_map(|page| page.placed_blocks.iter().map(move |placed| (page, placed)))
    }
}

/// A block waiting to be placed, possibly the remainder of a split table
#[derive(Debug, Clone)]
struct PendingBlock {
    block: ContentBlock,
    origin: BlockOrigin,
    continuation: bool,
}

/// Page accumulation state for one planning pass
struct PlanState {
    pages: Vec<Page>,
    current: Page,
    y: f32,
    top: f32,
    spacing: f32,
}

impl PlanState {
    fn new(top: f32, spacing: f32) -> Self {
        Self {
            pages: Vec::new(),
            current: Page::new(1),
            y: top,
            top,
            spacing,
        }
    }

    fn place(&mut self, pending: PendingBlock, height: f32) {
        self.current.placed_blocks.push(PlacedBlock {
            block: pending.block,
            origin: pending.origin,
            y_offset: self.y,
            height,
            continuation: pending.continuation,
        });
        self.y += height + self.spacing;
    }

    fn break_page(&mut self) {
        let next = Page::new(self.current.page_number + 1);
        let closed = std::mem::replace(&mut self.current, next);
        debug!(
            page = closed.page_number,
            blocks = closed.placed_blocks.len(),
            "page closed"
        );
        self.pages.push(closed);
        self.y = self.top;
    }

    fn finish(mut self) -> Vec<Page> {
        // An empty document still produces one page
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Paginator that converts a document into a page plan
#[derive(Debug, Clone)]
pub struct Paginator {
    metrics: PageMetrics,
}

impl Paginator {
    /// Create a paginator for the given page metrics
    pub fn new(metrics: PageMetrics) -> Self {
        Self { metrics }
    }

    /// Get the page metrics
    pub fn metrics(&self) -> &PageMetrics {
        &self.metrics
    }

    /// Lay out a document onto pages
    ///
    /// ```text
    /// y = content_top
    /// for each block (sections in order, then trailing blocks):
    ///     if divider and page is empty: drop it
    ///     if y + h <= content_bottom:
    ///         if heading, not an exact fit, and the next block's minimum
    ///         no longer fits after it:
    ///             break page, retry
    ///         place at y; y += h + spacing
    ///     else if data table and header + >= 1 row fits:
    ///         place the rows that fit, break page, queue the rest as a continuation
    ///     else if page has content:
    ///         break page, retry
    ///     else:
    ///         place alone on the page (degenerate), warn, break page
    /// ```
    ///
    /// The plan is a pure function of the document and the metrics.
    pub fn plan(&self, document: &Document) -> PagePlan {
        let metrics = &self.metrics;
        let bottom = metrics.content_bottom();
        let usable = metrics.usable_height();

        let mut pending: VecDeque<PendingBlock> = document
            .blocks()
            .map(|(origin, block)| PendingBlock {
                block: block.clone(),
                origin,
                continuation: false,
            })
            .collect();

        let mut state = PlanState::new(metrics.content_top(), metrics.block_spacing);
        let mut dropped_dividers = Vec::new();
        let mut warnings = Vec::new();

        while let Some(item) = pending.pop_front() {
            // =================================================================
            // Orphan rule: a divider never starts a page
            // =================================================================
            if item.block.is_divider() && state.current.is_empty() {
                debug!(origin = ?item.origin, page = state.current.page_number, "divider dropped at page top");
                dropped_dividers.push(item.origin);
                continue;
            }

            let height = measure(&item.block, metrics);
            let remaining = bottom - state.y;

            // =================================================================
            // Block fits (an exact fit stays on this page)
            // =================================================================
            if height <= remaining {
                if matches!(item.block, ContentBlock::Heading(_))
                    && !state.current.is_empty()
                    && height < remaining
                    && self.strands_heading(height, remaining, pending.front())
                {
                    state.break_page();
                    pending.push_front(item);
                    continue;
                }
                state.place(item, height);
                continue;
            }

            // =================================================================
            // Data table: place the rows that fit, continue on the next page
            // =================================================================
            if let ContentBlock::DataTable(table) = &item.block {
                let fit = rows_that_fit(table, remaining, metrics);
                if fit > 0 {
                    let (head, tail) = table.split_at(fit);
                    debug!(
                        origin = ?item.origin,
                        page = state.current.page_number,
                        placed = fit,
                        remaining = tail.row_count(),
                        "data table split"
                    );
                    let head = ContentBlock::DataTable(head);
                    let head_height = measure(&head, metrics);
                    state.place(
                        PendingBlock {
                            block: head,
                            origin: item.origin,
                            continuation: item.continuation,
                        },
                        head_height,
                    );
                    state.break_page();
                    pending.push_front(PendingBlock {
                        block: ContentBlock::DataTable(tail),
                        origin: item.origin,
                        continuation: true,
                    });
                    continue;
                }
            }

            // =================================================================
            // Doesn't fit: move to a fresh page
            // =================================================================
            if !state.current.is_empty() {
                state.break_page();
                pending.push_front(item);
                continue;
            }

            // =================================================================
            // Degenerate: taller than an empty page
            // =================================================================
            let page_number = state.current.page_number;
            let (placed, rest) = match &item.block {
                ContentBlock::DataTable(table) if table.row_count() > 1 => {
                    let (head, tail) = table.split_at(1);
                    (ContentBlock::DataTable(head), Some(ContentBlock::DataTable(tail)))
                }
                _ => (item.block.clone(), None),
            };
            let placed_height = measure(&placed, metrics);
            let warning = LayoutWarning::DegeneratePage {
                page_number,
                origin: item.origin,
                height: min_height(&placed, metrics),
                usable_height: usable,
            };
            warn!(%warning, "block exceeds usable page height");
            warnings.push(warning);

            state.place(
                PendingBlock {
                    block: placed,
                    origin: item.origin,
                    continuation: item.continuation,
                },
                placed_height,
            );
            state.break_page();
            if let Some(rest) = rest {
                pending.push_front(PendingBlock {
                    block: rest,
                    origin: item.origin,
                    continuation: true,
                });
            }
        }

        let pages = state.finish();
        let total_pages = pages.len();
        info!(
            title = %document.title,
            blocks = document.block_count(),
            pages = total_pages,
            "document paginated"
        );

        PagePlan {
            pages,
            total_pages,
            dropped_dividers,
            warnings,
        }
    }

    /// Whether placing a heading now would leave it alone at the page bottom
    fn strands_heading(&self, height: f32, remaining: f32, next: Option<&PendingBlock>) -> bool {
        let Some(next) = next else {
            return false;
        };
        if next.block.is_divider() {
            return false;
        }
        let needed = height + self.metrics.block_spacing + min_height(&next.block, &self.metrics);
        needed > remaining
    }
}

/// Lay out a document with the given metrics
pub fn plan(document: &Document, metrics: &PageMetrics) -> PagePlan {
    Paginator::new(metrics.clone()).plan(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use report_model::{KeyValueRow, ReportKind, Section};

    fn doc(sections: Vec<Section>) -> Document {
        let mut document =
            Document::new(ReportKind::Site, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        document.sections = sections;
        document
    }

    fn kv(rows: usize) -> ContentBlock {
        ContentBlock::key_value(
            (0..rows)
                .map(|i| KeyValueRow::new(format!("Field {}", i), "value"))
                .collect(),
        )
    }

    fn table(rows: usize) -> ContentBlock {
        ContentBlock::data_table(
            vec!["Name".to_string(), "Status".to_string()],
            (0..rows)
                .map(|i| vec![format!("Row {}", i), "Active".to_string()])
                .collect(),
        )
    }

    /// Metrics with a round usable height: content from 100 to 500
    fn small_metrics() -> PageMetrics {
        let mut metrics = PageMetrics::for_size(crate::PageSize::Custom {
            width: 400.0,
            height: 550.0,
        });
        metrics.header_height = 90.0;
        metrics.top_padding = 10.0;
        metrics.footer_reserve = 50.0;
        metrics.block_spacing = 0.0;
        metrics
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let plan = plan(&doc(Vec::new()), &PageMetrics::default());
        assert_eq!(plan.total_pages, 1);
        assert!(plan.pages[0].is_empty());
    }

    #[test]
    fn test_single_section_single_page() {
        let document = doc(vec![Section::new(
            "North",
            vec![ContentBlock::heading("North", 2), kv(10)],
        )]);
        let plan = plan(&document, &PageMetrics::default());
        assert_eq!(plan.total_pages, 1);
        assert_eq!(plan.pages[0].placed_blocks.len(), 2);
        assert_eq!(plan.pages[0].placed_blocks[0].y_offset, 110.0);
    }

    #[test]
    fn test_exact_fit_stays_on_page() {
        let metrics = small_metrics();
        // 25 rows x 16pt = 400pt, exactly the usable height
        let document = doc(vec![Section::new("A", vec![kv(25)])]);
        let plan = plan(&document, &metrics);
        assert_eq!(plan.total_pages, 1);
        assert_eq!(plan.pages[0].placed_blocks[0].bottom(), 500.0);
    }

    #[test]
    fn test_key_value_table_moves_whole() {
        let metrics = small_metrics();
        // 5 rows = 80pt leaves 320pt; 21 rows = 336pt does not fit
        let document = doc(vec![Section::new("A", vec![kv(5), kv(21)])]);
        let plan = plan(&document, &metrics);
        assert_eq!(plan.total_pages, 2);
        assert_eq!(plan.pages[1].placed_blocks[0].y_offset, 100.0);
        assert_eq!(plan.pages[1].placed_blocks[0].block, kv(21));
    }

    #[test]
    fn test_data_table_split_keeps_columns() {
        let metrics = small_metrics();
        // 288pt used; 112pt left fits the header and 5 rows
        let document = doc(vec![Section::new("A", vec![kv(15), kv(3), table(12)])]);
        let plan = plan(&document, &metrics);
        assert_eq!(plan.total_pages, 2);

        let first = plan.pages[0].placed_blocks.last().unwrap();
        let second = &plan.pages[1].placed_blocks[0];
        let head = first.block.as_data_table().unwrap();
        let tail = second.block.as_data_table().unwrap();
        assert_eq!(head.row_count(), 5);
        assert_eq!(tail.row_count(), 7);
        assert_eq!(head.columns(), tail.columns());
        assert!(!first.continuation);
        assert!(second.continuation);
        assert_eq!(first.origin, second.origin);
        assert!(first.bottom() <= metrics.content_bottom());
    }

    #[test]
    fn test_table_breaks_before_header_when_no_row_fits() {
        let metrics = small_metrics();
        // 384pt used leaves 16pt, less than header + 1 row
        let document = doc(vec![Section::new("A", vec![kv(24), table(3)])]);
        let plan = plan(&document, &metrics);
        assert_eq!(plan.total_pages, 2);
        assert_eq!(plan.pages[0].placed_blocks.len(), 1);
        let moved = &plan.pages[1].placed_blocks[0];
        assert_eq!(moved.block.as_data_table().unwrap().row_count(), 3);
        assert!(!moved.continuation);
    }

    #[test]
    fn test_divider_dropped_at_page_top() {
        let metrics = small_metrics();
        let document = doc(vec![
            Section::new("A", vec![kv(25)]),
            Section::new("B", vec![ContentBlock::Divider, kv(2)]),
        ]);
        let plan = plan(&document, &metrics);
        assert_eq!(plan.total_pages, 2);
        assert_eq!(
            plan.dropped_dividers,
            vec![BlockOrigin::Section { section: 1, block: 0 }]
        );
        assert_eq!(plan.pages[1].placed_blocks[0].block, kv(2));
    }

    #[test]
    fn test_divider_kept_mid_page() {
        let document = doc(vec![
            Section::new("A", vec![kv(2)]),
            Section::new("B", vec![ContentBlock::Divider, kv(2)]),
        ]);
        let plan = plan(&document, &PageMetrics::default());
        assert!(plan.dropped_dividers.is_empty());
        assert!(plan.pages[0].placed_blocks[1].block.is_divider());
    }

    #[test]
    fn test_heading_kept_with_next_block() {
        let metrics = small_metrics();
        // 368pt used leaves 32pt: a level-2 heading (21pt) fits but not with its table's header and first row
        let document = doc(vec![Section::new(
            "A",
            vec![kv(23), ContentBlock::heading("Systems", 2), table(4)],
        )]);
        let plan = plan(&document, &metrics);
        assert_eq!(plan.total_pages, 2);
        assert_eq!(plan.pages[0].placed_blocks.len(), 1);
        assert_eq!(plan.pages[1].placed_blocks[0].block, ContentBlock::heading("Systems", 2));
    }

    #[test]
    fn test_heading_exact_fit_not_moved() {
        let mut metrics = small_metrics();
        // Content ends at 489: 368pt used leaves exactly the heading's 21pt
        metrics.footer_reserve = 61.0;
        let document = doc(vec![Section::new(
            "A",
            vec![kv(23), ContentBlock::heading("Systems", 2), kv(1)],
        )]);
        let plan = plan(&document, &metrics);
        assert_eq!(plan.total_pages, 2);
        assert_eq!(plan.pages[0].placed_blocks.len(), 2);
        let heading = &plan.pages[0].placed_blocks[1];
        assert_eq!(heading.block, ContentBlock::heading("Systems", 2));
        assert_eq!(heading.bottom(), metrics.content_bottom());
        assert_eq!(plan.pages[1].placed_blocks[0].block, kv(1));
    }

    #[test]
    fn test_degenerate_block_placed_alone_with_warning() {
        let metrics = small_metrics();
        let document = doc(vec![Section::new("A", vec![kv(2), kv(40), kv(2)])]);
        let plan = plan(&document, &metrics);
        assert_eq!(plan.total_pages, 3);
        assert_eq!(plan.pages[1].placed_blocks.len(), 1);
        assert_eq!(plan.pages[1].placed_blocks[0].block, kv(40));
        assert_eq!(plan.warnings.len(), 1);
        assert!(matches!(
            plan.warnings[0],
            LayoutWarning::DegeneratePage { page_number: 2, .. }
        ));
    }

    #[test]
    fn test_degenerate_table_row_progresses() {
        let mut metrics = small_metrics();
        metrics.body_font_size = 400.0; // each row taller than the page
        let document = doc(vec![Section::new("A", vec![table(3)])]);
        let plan = plan(&document, &metrics);
        assert_eq!(plan.total_pages, 3);
        assert_eq!(plan.warnings.len(), 3);
        for page in &plan.pages {
            assert_eq!(page.placed_blocks.len(), 1);
            assert_eq!(page.placed_blocks[0].block.as_data_table().unwrap().row_count(), 1);
        }
    }

    #[test]
    fn test_page_numbers_are_sequential() {
        let metrics = small_metrics();
        let sections = (0..6)
            .map(|i| Section::new(format!("S{}", i), vec![kv(10), table(8)]))
            .collect();
        let plan = plan(&doc(sections), &metrics);
        for (i, page) in plan.pages.iter().enumerate() {
            assert_eq!(page.page_number, i + 1);
        }
        assert_eq!(plan.total_pages, plan.pages.len());
    }

    #[test]
    fn test_trailing_blocks_follow_sections() {
        let mut document = doc(vec![Section::new("A", vec![kv(1)])]);
        document.trailing_blocks.push(table(2));
        let plan = plan(&document, &PageMetrics::default());
        let last = plan.pages[0].placed_blocks.last().unwrap();
        assert_eq!(last.origin, BlockOrigin::Trailing { block: 0 });
    }
}

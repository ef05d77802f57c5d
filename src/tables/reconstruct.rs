//! Table reconstruction from one raw detector descriptor.
//!
//! Rows are scanned top to bottom and columns left to right. When a cell
//! spans several grid positions, every covered position other than its own is
//! registered up front and later emitted as a [`SpannedTableCell`], so the
//! finished grid has exactly one item per position.

use super::merge;
use crate::document::Page;
use crate::elements::{RowItem, SpanDirection, SpannedTableCell, Table, TableCell, TableRow, Word};
use crate::extractor::{RawCell, RawTableDescriptor};
use crate::geometry::{box1_overlap_proportion, BoundingBox};
use std::collections::HashMap;

/// Default fraction of a word's area that must fall inside a cell for the
/// word to belong to it.
pub const DEFAULT_WORD_OVERLAP_THRESHOLD: f32 = 0.75;

/// Tunables for [`reconstruct_table`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructionOptions {
    /// A word belongs to a cell when strictly more than this fraction of its
    /// area lies inside the cell
    pub word_overlap_threshold: f32,
    /// Run content reconciliation when the descriptor carries expected text
    pub merge_content: bool,
}

impl Default for ReconstructionOptions {
    fn default() -> Self {
        Self {
            word_overlap_threshold: DEFAULT_WORD_OVERLAP_THRESHOLD,
            merge_content: true,
        }
    }
}

/// Build a table from a descriptor and the page's currently listed words.
///
/// The page is only read. The returned table is not attached.
pub fn reconstruct_table(
    descriptor: &RawTableDescriptor,
    page: &Page,
    options: &ReconstructionOptions,
) -> Table {
    let page_height = page.height();
    let bbox = BoundingBox::from_bottom_left(
        descriptor.location,
        descriptor.width,
        descriptor.height,
        page_height,
    );
    let mut table = Table::new(page.number, bbox, descriptor.flavor, descriptor.cols.len());
    let words: Vec<&Word> = page.listed_words().collect();
    let mut spanned: HashMap<(usize, usize), SpanDirection> = HashMap::new();

    for (row, row_bounds) in descriptor.rows.iter().enumerate() {
        // Slots past the end of a short row are padded with empty cells so
        // column indices stay aligned with registered spans.
        let mut items = Vec::with_capacity(descriptor.cols.len());
        for (col, col_bounds) in descriptor.cols.iter().enumerate() {
            if let Some(direction) = spanned.remove(&(col, row)) {
                let slot = BoundingBox::from_detector_spans(*col_bounds, *row_bounds, page_height);
                items.push(RowItem::Spanned(SpannedTableCell::new(
                    page.number,
                    col,
                    row,
                    slot,
                    direction,
                )));
                continue;
            }

            let cell = match descriptor.cell(col, row) {
                Some(raw) => {
                    register_spans(raw, col, row, descriptor, &mut spanned);
                    build_cell(raw, col, row, page, &words, options.word_overlap_threshold)
                },
                None => TableCell::new(page.number, col, row, None),
            };
            items.push(RowItem::Cell(cell));
        }
        table.rows.push(TableRow::new(page.number, row, items));
    }

    if let (true, Some(expected)) = (options.merge_content, descriptor.content.as_ref()) {
        let merged = merge::reconcile_table(&mut table, expected, page);
        if merged > 0 {
            log::debug!("Page {}: merged {} under-segmented cell groups", page.number, merged);
        }
    }

    table
}

fn register_spans(
    raw: &RawCell,
    col: usize,
    row: usize,
    descriptor: &RawTableDescriptor,
    spanned: &mut HashMap<(usize, usize), SpanDirection>,
) {
    for dy in 0..raw.row_span {
        for dx in 0..raw.col_span {
            if dx == 0 && dy == 0 {
                continue;
            }
            let target = (col + dx, row + dy);
            if target.0 >= descriptor.cols.len() || target.1 >= descriptor.rows.len() {
                log::debug!(
                    "Cell ({}, {}) spans past the grid edge at ({}, {})",
                    col,
                    row,
                    target.0,
                    target.1
                );
                continue;
            }
            let direction = if dx > 0 {
                SpanDirection::Left
            } else {
                SpanDirection::Top
            };
            spanned.entry(target).or_insert(direction);
        }
    }
}

fn build_cell(
    raw: &RawCell,
    col: usize,
    row: usize,
    page: &Page,
    words: &[&Word],
    threshold: f32,
) -> TableCell {
    let bbox = BoundingBox::from_bottom_left(raw.location, raw.width, raw.height, page.height());
    let content = words
        .iter()
        .filter(|w| box1_overlap_proportion(&w.bbox, &bbox) > threshold)
        .map(|w| w.id)
        .collect();
    TableCell::new(page.number, col, row, Some(bbox))
        .with_colspan(raw.col_span)
        .with_rowspan(raw.row_span)
        .with_content(content)
}

//! Table elements reconstructed from detector geometry.
//!
//! A [`Table`] is an ordered list of [`TableRow`]s. Each row holds one
//! [`RowItem`] per grid slot: either a [`TableCell`] with content, or a
//! [`SpannedTableCell`] marking a position covered by another cell's span.

use super::{Element, ElementId, Word};
use crate::document::Page;
use crate::extractor::Flavor;
use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};

/// Direction from a spanned position toward the cell that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanDirection {
    /// Owned by a cell to the left (column span)
    Left,
    /// Owned by a cell above (row span)
    Top,
    /// Owned by a cell to the right
    Right,
}

/// Table element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Stable id
    pub id: ElementId,
    /// 1-based number of the owning page
    pub page: u32,
    /// Table extent as reported by the detector
    pub bbox: BoundingBox,
    /// Detection flavor that produced this table
    pub flavor: Flavor,
    /// Number of grid columns reported by the detector
    pub columns: usize,
    /// Table rows, top to bottom
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create an empty table.
    pub fn new(page: u32, bbox: BoundingBox, flavor: Flavor, columns: usize) -> Self {
        Self {
            id: ElementId::new(),
            page,
            bbox,
            flavor,
            columns,
            rows: Vec::new(),
        }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate over every content cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.rows.iter().flat_map(|r| r.cells.iter().filter_map(RowItem::as_cell))
    }

    /// Iterate over the ids of every word referenced by a cell.
    pub fn word_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.cells().flat_map(|c| c.content.iter().copied())
    }

    /// Get the item at the given row and slot index.
    pub fn get(&self, row: usize, slot: usize) -> Option<&RowItem> {
        self.rows.get(row).and_then(|r| r.cells.get(slot))
    }

    /// Count how many items cover each grid position, `[row][col]`.
    ///
    /// A cell covers `grid_width` consecutive columns starting at its own
    /// column; spans reaching further are represented by explicit
    /// [`SpannedTableCell`]s.
    pub fn grid_coverage(&self) -> Vec<Vec<u32>> {
        let mut coverage = vec![vec![0u32; self.columns]; self.rows.len()];
        for item in self.rows.iter().flat_map(|r| r.cells.iter()) {
            let Some(row) = coverage.get_mut(item.row()) else {
                continue;
            };
            for col in item.col()..item.col() + item.grid_width() {
                if let Some(slot) = row.get_mut(col) {
                    *slot += 1;
                }
            }
        }
        coverage
    }

    /// Check that every grid position is covered by exactly one item and no
    /// item lies outside the grid.
    pub fn has_complete_grid(&self) -> bool {
        let in_bounds = self.rows.iter().flat_map(|r| r.cells.iter()).all(|item| {
            item.row() < self.rows.len() && item.col() + item.grid_width() <= self.columns
        });
        in_bounds && self.grid_coverage().iter().flatten().all(|&count| count == 1)
    }

    /// Cell texts as a row-major grid; spanned positions read as empty.
    pub fn text_grid(&self, page: &Page) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|item| match item {
                        RowItem::Cell(cell) => cell.text(page),
                        RowItem::Spanned(_) => String::new(),
                    })
                    .collect()
            })
            .collect()
    }
}

impl Element for Table {
    fn id(&self) -> ElementId {
        self.id
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn bbox(&self) -> Option<BoundingBox> {
        Some(self.bbox)
    }
}

/// A row in a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// Stable id
    pub id: ElementId,
    /// 1-based number of the owning page
    pub page: u32,
    /// Row index within the table
    pub index: usize,
    /// Bounding rectangle over the cells that have geometry
    pub bbox: Option<BoundingBox>,
    /// One item per grid slot, left to right
    pub cells: Vec<RowItem>,
}

impl TableRow {
    /// Create a row from its items; the box is derived from them.
    pub fn new(page: u32, index: usize, cells: Vec<RowItem>) -> Self {
        let mut row = Self {
            id: ElementId::new(),
            page,
            index,
            bbox: None,
            cells,
        };
        row.recompute_bbox();
        row
    }

    /// Recompute the row box from its items.
    ///
    /// Min left, min top, max right and min bottom over the items that have
    /// geometry. A cell spanning several rows therefore does not stretch the
    /// row down to the last row it covers.
    pub fn recompute_bbox(&mut self) {
        self.bbox = self
            .cells
            .iter()
            .filter_map(RowItem::bbox)
            .map(|b| (b.left, b.top, b.right(), b.bottom()))
            .reduce(|(l, t, r, b), (l2, t2, r2, b2)| (l.min(l2), t.min(t2), r.max(r2), b.min(b2)))
            .map(|(left, top, right, bottom)| BoundingBox::from_edges(left, top, right, bottom));
    }

    /// Top edge of the row, if it has geometry.
    pub fn top(&self) -> Option<f32> {
        self.bbox.map(|b| b.top)
    }

    /// Bottom edge of the row, if it has geometry.
    pub fn bottom(&self) -> Option<f32> {
        self.bbox.map(|b| b.bottom())
    }
}

impl Element for TableRow {
    fn id(&self) -> ElementId {
        self.id
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }
}

/// One grid slot of a row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowItem {
    /// A cell with content
    Cell(TableCell),
    /// A position covered by another cell's span
    Spanned(SpannedTableCell),
}

impl RowItem {
    /// Id of the item.
    pub fn id(&self) -> ElementId {
        match self {
            RowItem::Cell(c) => c.id,
            RowItem::Spanned(s) => s.id,
        }
    }

    /// Bounding box, if the item has geometry.
    pub fn bbox(&self) -> Option<BoundingBox> {
        match self {
            RowItem::Cell(c) => c.bbox,
            RowItem::Spanned(s) => Some(s.bbox),
        }
    }

    /// Grid column of the item.
    pub fn col(&self) -> usize {
        match self {
            RowItem::Cell(c) => c.col,
            RowItem::Spanned(s) => s.col,
        }
    }

    /// Grid row of the item.
    pub fn row(&self) -> usize {
        match self {
            RowItem::Cell(c) => c.row,
            RowItem::Spanned(s) => s.row,
        }
    }

    /// Number of grid columns this slot covers in its own row.
    pub fn grid_width(&self) -> usize {
        match self {
            RowItem::Cell(c) => c.grid_width,
            RowItem::Spanned(_) => 1,
        }
    }

    /// Check if this is a spanned position.
    pub fn is_spanned(&self) -> bool {
        matches!(self, RowItem::Spanned(_))
    }

    /// Get as cell if this is a content cell.
    pub fn as_cell(&self) -> Option<&TableCell> {
        match self {
            RowItem::Cell(c) => Some(c),
            _ => None,
        }
    }

    /// Get as spanned cell if this is a spanned position.
    pub fn as_spanned(&self) -> Option<&SpannedTableCell> {
        match self {
            RowItem::Spanned(s) => Some(s),
            _ => None,
        }
    }
}

/// A cell in a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    /// Stable id
    pub id: ElementId,
    /// 1-based number of the owning page
    pub page: u32,
    /// Grid column
    pub col: usize,
    /// Grid row
    pub row: usize,
    /// Cell box; `None` when the detector left the slot empty
    pub bbox: Option<BoundingBox>,
    /// Ids of the words inside the cell, in page order
    pub content: Vec<ElementId>,
    /// Number of columns this cell spans
    pub colspan: usize,
    /// Number of rows this cell spans
    pub rowspan: usize,
    /// Number of row slots this cell occupies (greater than one only after
    /// content reconciliation coalesced several slots)
    pub grid_width: usize,
}

impl TableCell {
    /// Create an empty single-slot cell.
    pub fn new(page: u32, col: usize, row: usize, bbox: Option<BoundingBox>) -> Self {
        Self {
            id: ElementId::new(),
            page,
            col,
            row,
            bbox,
            content: Vec::new(),
            colspan: 1,
            rowspan: 1,
            grid_width: 1,
        }
    }

    /// Set column span.
    pub fn with_colspan(mut self, colspan: usize) -> Self {
        self.colspan = colspan;
        self
    }

    /// Set row span.
    pub fn with_rowspan(mut self, rowspan: usize) -> Self {
        self.rowspan = rowspan;
        self
    }

    /// Set the word content.
    pub fn with_content(mut self, content: Vec<ElementId>) -> Self {
        self.content = content;
        self
    }

    /// Check if the cell references no words.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Resolve the cell's words through the page's word store.
    pub fn words<'a>(&'a self, page: &'a Page) -> impl Iterator<Item = &'a Word> + 'a {
        self.content.iter().filter_map(move |id| page.word(*id))
    }

    /// Cell text: its words joined by single spaces.
    pub fn text(&self, page: &Page) -> String {
        self.words(page)
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Element for TableCell {
    fn id(&self) -> ElementId {
        self.id
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }
}

/// A grid position covered by another cell's span. Carries no content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpannedTableCell {
    /// Stable id
    pub id: ElementId,
    /// 1-based number of the owning page
    pub page: u32,
    /// Grid column
    pub col: usize,
    /// Grid row
    pub row: usize,
    /// Box of the grid position
    pub bbox: BoundingBox,
    /// Direction toward the owning cell
    pub direction: SpanDirection,
}

impl SpannedTableCell {
    /// Create a spanned position.
    pub fn new(
        page: u32,
        col: usize,
        row: usize,
        bbox: BoundingBox,
        direction: SpanDirection,
    ) -> Self {
        Self {
            id: ElementId::new(),
            page,
            col,
            row,
            bbox,
            direction,
        }
    }
}

impl Element for SpannedTableCell {
    fn id(&self) -> ElementId {
        self.id
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn bbox(&self) -> Option<BoundingBox> {
        Some(self.bbox)
    }
}

//! Content reconciliation for under-segmented stream tables.
//!
//! Stream detection infers column boundaries from text density and often
//! splits one logical cell into several neighbours. The detector also reports
//! the text it expects in every cell; where a run of neighbouring cells
//! disagrees with that text, the cells are greedily regrouped until their
//! joined text matches the joined expected text, and each matching group is
//! coalesced into a single cell.
//!
//! Comparisons use whitespace-normalised text: words joined by single spaces,
//! trimmed.

use crate::document::Page;
use crate::elements::{RowItem, Table, TableCell};
use std::ops::Range;

/// Find the slot ranges of one row that should be coalesced.
///
/// `actual` and `expected` hold one text per slot; missing expected entries
/// read as empty. Returned ranges are disjoint, ascending and at least two
/// slots long.
///
/// # Examples
///
/// ```
/// use pdf_tablecraft::tables::merge_groups;
///
/// let actual = ["this is only one", "cell"];
/// let expected = ["this is only one cell", ""];
/// assert_eq!(merge_groups(&actual, &expected), vec![0..2]);
///
/// let matching = ["a", "b"];
/// assert!(merge_groups(&matching, &matching).is_empty());
/// ```
pub fn merge_groups<A, E>(actual: &[A], expected: &[E]) -> Vec<Range<usize>>
where
    A: AsRef<str>,
    E: AsRef<str>,
{
    let expected_at = |i: usize| expected.get(i).map(|e| e.as_ref()).unwrap_or("");
    let candidates: Vec<usize> = (0..actual.len())
        .filter(|&i| normalize(actual[i].as_ref()) != normalize(expected_at(i)))
        .collect();

    let mut groups = Vec::new();
    for run in consecutive_runs(&candidates) {
        // A lone mismatch is treated as noise, not an under-merge.
        if run.len() < 2 {
            continue;
        }

        let mut start = run.start;
        let mut end = run.start;
        while end < run.end {
            let want = joined(start..end + 1, expected_at);
            let have = joined(start..end + 1, |i| actual[i].as_ref());
            if have == want {
                if end > start {
                    groups.push(start..end + 1);
                }
                start = end + 1;
                end = start;
            } else if have.chars().count() > want.chars().count() {
                start = end + 1;
                end = start;
            } else {
                end += 1;
            }
        }
    }
    groups
}

/// Coalesce under-segmented cells of every row against the expected text
/// grid. Returns the number of groups committed.
///
/// Must run on a freshly reconstructed table, where slot index equals grid
/// column. Groups that would absorb a spanned slot are skipped.
pub fn reconcile_table(table: &mut Table, expected: &[Vec<String>], page: &Page) -> usize {
    let mut committed = 0;
    for row in &mut table.rows {
        let actual: Vec<String> = row
            .cells
            .iter()
            .map(|item| match item {
                RowItem::Cell(cell) => cell.text(page),
                RowItem::Spanned(_) => String::new(),
            })
            .collect();
        let empty = Vec::new();
        let expected_row = expected.get(row.index).unwrap_or(&empty);
        let mut groups = merge_groups(actual.as_slice(), expected_row.as_slice());
        // A slot covered by a span stays in place so the grid keeps one item
        // per position.
        groups.retain(|group| !row.cells[group.clone()].iter().any(RowItem::is_spanned));
        if groups.is_empty() {
            continue;
        }

        committed += groups.len();
        let mut slots = std::mem::take(&mut row.cells).into_iter().enumerate().peekable();
        let mut merged = Vec::new();
        for group in &groups {
            while let Some((_, item)) = slots.next_if(|(i, _)| *i < group.start) {
                merged.push(item);
            }
            let members: Vec<RowItem> =
                std::iter::from_fn(|| slots.next_if(|(i, _)| group.contains(i)))
                    .map(|(_, item)| item)
                    .collect();
            merged.push(RowItem::Cell(coalesce(&members, page.number)));
        }
        merged.extend(slots.map(|(_, item)| item));
        row.cells = merged;
        row.recompute_bbox();
    }
    committed
}

/// Merge a left-to-right group of slots into one cell.
fn coalesce(members: &[RowItem], page: u32) -> TableCell {
    let first_col = members.first().map(RowItem::col).unwrap_or(0);
    let row = members.first().map(RowItem::row).unwrap_or(0);
    let bbox = members
        .iter()
        .filter_map(RowItem::bbox)
        .reduce(|acc, b| acc.union(&b));

    let mut cell = TableCell::new(page, first_col, row, bbox);
    let mut end_col = first_col + 1;
    for member in members {
        match member {
            RowItem::Cell(c) => {
                cell.content.extend(c.content.iter().copied());
                cell.rowspan = cell.rowspan.max(c.rowspan);
                end_col = end_col.max(c.col + c.colspan.max(c.grid_width));
            },
            RowItem::Spanned(s) => end_col = end_col.max(s.col + 1),
        }
    }
    cell.grid_width = members.iter().map(RowItem::grid_width).sum();
    cell.colspan = end_col - first_col;
    cell
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn joined<'a>(range: Range<usize>, text_at: impl Fn(usize) -> &'a str) -> String {
    normalize(&range.map(text_at).collect::<Vec<_>>().join(" "))
}

/// Split sorted indices into maximal runs of consecutive values.
fn consecutive_runs(indices: &[usize]) -> Vec<Range<usize>> {
    let mut runs: Vec<Range<usize>> = Vec::new();
    for &i in indices {
        match runs.last_mut() {
            Some(run) if run.end == i => run.end = i + 1,
            _ => runs.push(i..i + 1),
        }
    }
    runs
}

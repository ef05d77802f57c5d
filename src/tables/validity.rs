//! False-table filter.
//!
//! The external detector regularly fires on ordinary body text. Those false
//! tables tend to have a single row, or rows that do not touch each other.
//! A table is accepted only if it has at least two rows and every row shares a
//! boundary with some other row.

use crate::elements::{Table, TableRow};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How row boundaries are snapped to integers before being compared, to
/// absorb sub-point detector noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjacencyRounding {
    /// Round up (default)
    #[default]
    Ceil,
    /// Round half away from zero
    Round,
    /// Round down
    Floor,
}

impl AdjacencyRounding {
    /// Snap a coordinate.
    pub fn apply(&self, value: f32) -> i64 {
        let snapped = match self {
            AdjacencyRounding::Ceil => value.ceil(),
            AdjacencyRounding::Round => value.round(),
            AdjacencyRounding::Floor => value.floor(),
        };
        snapped as i64
    }
}

/// Why a candidate table was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The table has no rows
    NoRows,
    /// The table has exactly one row
    SingleRow,
    /// A row has no geometry to compare
    MissingGeometry {
        /// Row index
        row: usize,
    },
    /// A row shares no boundary with any other row
    Disjoint {
        /// Row index
        row: usize,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoRows => write!(f, "no rows"),
            Rejection::SingleRow => write!(f, "single row"),
            Rejection::MissingGeometry { row } => write!(f, "row {} has no geometry", row),
            Rejection::Disjoint { row } => write!(f, "row {} has no adjacent row", row),
        }
    }
}

/// Check a candidate table.
///
/// Every row but the last needs another row whose snapped top equals its
/// snapped bottom; the last row needs another row whose snapped bottom
/// equals its snapped top.
pub fn check_table(table: &Table, rounding: AdjacencyRounding) -> Result<(), Rejection> {
    match table.rows.len() {
        0 => return Err(Rejection::NoRows),
        1 => return Err(Rejection::SingleRow),
        _ => {},
    }

    let edges = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            snapped_edges(row, rounding).ok_or(Rejection::MissingGeometry { row: i })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let last = edges.len() - 1;
    for (i, &(top, bottom)) in edges.iter().enumerate() {
        let mut others = edges.iter().enumerate().filter(|(j, _)| *j != i);
        let adjacent = if i < last {
            others.any(|(_, &(other_top, _))| other_top == bottom)
        } else {
            others.any(|(_, &(_, other_bottom))| other_bottom == top)
        };
        if !adjacent {
            return Err(Rejection::Disjoint { row: i });
        }
    }
    Ok(())
}

/// Convenience wrapper over [`check_table`].
pub fn is_valid_table(table: &Table, rounding: AdjacencyRounding) -> bool {
    check_table(table, rounding).is_ok()
}

fn snapped_edges(row: &TableRow, rounding: AdjacencyRounding) -> Option<(i64, i64)> {
    let bbox = row.bbox?;
    Some((rounding.apply(bbox.top), rounding.apply(bbox.bottom())))
}

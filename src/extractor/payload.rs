//! Detector payload parsing.
//!
//! The detector emits loosely typed JSON. It is parsed here exactly once into
//! strict [`RawTableDescriptor`] values; payloads missing required geometry
//! are rejected whole rather than partially repaired.
//!
//! Wire shape:
//!
//! ```text
//! [ { "page": 1,
//!     "tables": [ { "location": {"x":..,"y":..}, "size": {"width":..,"height":..},
//!                   "cols": [[x1,x2],..], "rows": [[y1,y2],..],
//!                   "cells": [[ {"location":..,"size":..,"colSpan":2,"rowSpan":1} | null, ..], ..],
//!                   "content": [["text", ..], ..],
//!                   "flavor": "lattice" | "stream" } ] } ]
//! ```
//!
//! All coordinates are in detector space (bottom-left origin).

use super::config::Flavor;
use crate::error::{Error, Result};
use crate::geometry::Point;
use serde::Deserialize;

/// Tables the detector found on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTables {
    /// 1-based page number
    pub page: u32,
    /// Detected tables in detector order
    pub tables: Vec<RawTableDescriptor>,
}

/// One detected table, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTableDescriptor {
    /// Bottom-left corner of the table
    pub location: Point,
    /// Table width
    pub width: f32,
    /// Table height
    pub height: f32,
    /// Column boundaries `[x1, x2]`, left to right
    pub cols: Vec<[f32; 2]>,
    /// Row boundaries `[y1, y2]`, top to bottom
    pub rows: Vec<[f32; 2]>,
    /// Row-major cell grid; `None` marks an empty slot. Rows may be shorter
    /// than `cols`.
    pub cells: Vec<Vec<Option<RawCell>>>,
    /// Row-major expected cell text (stream flavor only)
    pub content: Option<Vec<Vec<String>>>,
    /// Flavor that produced the table
    pub flavor: Flavor,
}

impl RawTableDescriptor {
    /// Raw cell at the given grid slot, if the detector reported one.
    pub fn cell(&self, col: usize, row: usize) -> Option<&RawCell> {
        self.cells.get(row).and_then(|r| r.get(col)).and_then(Option::as_ref)
    }

    /// Expected text at the given grid slot; empty when not reported.
    pub fn expected_text(&self, col: usize, row: usize) -> &str {
        self.content
            .as_ref()
            .and_then(|c| c.get(row))
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// One detected cell, validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCell {
    /// Bottom-left corner of the cell
    pub location: Point,
    /// Cell width
    pub width: f32,
    /// Cell height
    pub height: f32,
    /// Number of columns covered (at least 1)
    pub col_span: usize,
    /// Number of rows covered (at least 1)
    pub row_span: usize,
}

#[derive(Deserialize)]
struct WirePage {
    page: u32,
    #[serde(default)]
    tables: Vec<WireTable>,
}

#[derive(Deserialize)]
struct WirePoint {
    x: f32,
    y: f32,
}

#[derive(Deserialize)]
struct WireSize {
    width: f32,
    height: f32,
}

#[derive(Deserialize)]
struct WireTable {
    location: Option<WirePoint>,
    size: Option<WireSize>,
    cols: Option<Vec<[f32; 2]>>,
    rows: Option<Vec<[f32; 2]>>,
    cells: Option<Vec<Vec<Option<WireCell>>>>,
    content: Option<Vec<Vec<Option<String>>>>,
    flavor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCell {
    location: Option<WirePoint>,
    size: Option<WireSize>,
    col_span: Option<usize>,
    row_span: Option<usize>,
}

/// Parse a detector payload.
///
/// `default_flavor` is used for tables that do not report their own flavor.
///
/// # Errors
///
/// Returns [`Error::Json`] when the text is not a payload at all and
/// [`Error::MalformedPayload`] when a table lacks required geometry.
pub fn parse_payload(json: &str, default_flavor: Flavor) -> Result<Vec<PageTables>> {
    let pages: Vec<WirePage> = serde_json::from_str(json)?;
    pages
        .into_iter()
        .map(|page| {
            if page.page == 0 {
                return Err(Error::MalformedPayload("page numbers are 1-based".to_string()));
            }
            let tables = page
                .tables
                .into_iter()
                .enumerate()
                .map(|(index, table)| {
                    validate_table(table, default_flavor).map_err(|reason| {
                        Error::MalformedPayload(format!(
                            "page {} table {}: {}",
                            page.page, index, reason
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(PageTables {
                page: page.page,
                tables,
            })
        })
        .collect()
}

fn validate_table(
    table: WireTable,
    default_flavor: Flavor,
) -> std::result::Result<RawTableDescriptor, String> {
    let location = table.location.ok_or("missing location")?;
    let size = table.size.ok_or("missing size")?;
    let cols = table.cols.ok_or("missing cols")?;
    let rows = table.rows.ok_or("missing rows")?;
    let wire_cells = table.cells.ok_or("missing cells")?;

    if cols.is_empty() || rows.is_empty() {
        return Err("empty column or row boundaries".to_string());
    }
    if wire_cells.len() > rows.len() {
        return Err(format!(
            "{} cell rows for {} row boundaries",
            wire_cells.len(),
            rows.len()
        ));
    }

    let mut cells = Vec::with_capacity(wire_cells.len());
    for (row, wire_row) in wire_cells.into_iter().enumerate() {
        if wire_row.len() > cols.len() {
            return Err(format!(
                "row {} has {} cells for {} columns",
                row,
                wire_row.len(),
                cols.len()
            ));
        }
        let mut out = Vec::with_capacity(wire_row.len());
        for (col, slot) in wire_row.into_iter().enumerate() {
            out.push(match slot {
                Some(cell) => Some(validate_cell(cell).map_err(|r| format!("cell ({}, {}): {}", col, row, r))?),
                None => None,
            });
        }
        cells.push(out);
    }

    let content = match table.content {
        Some(grid) if grid.len() > rows.len() => {
            return Err(format!(
                "{} content rows for {} row boundaries",
                grid.len(),
                rows.len()
            ));
        },
        Some(grid) => Some(
            grid.into_iter()
                .map(|r| r.into_iter().map(Option::unwrap_or_default).collect())
                .collect(),
        ),
        None => None,
    };

    let flavor = table
        .flavor
        .as_deref()
        .map(Flavor::from_str_lossy)
        .unwrap_or(default_flavor);

    Ok(RawTableDescriptor {
        location: Point::new(location.x, location.y),
        width: size.width,
        height: size.height,
        cols,
        rows,
        cells,
        content,
        flavor,
    })
}

fn validate_cell(cell: WireCell) -> std::result::Result<RawCell, String> {
    let location = cell.location.ok_or("missing location")?;
    let size = cell.size.ok_or("missing size")?;
    let col_span = cell.col_span.unwrap_or(1);
    let row_span = cell.row_span.unwrap_or(1);
    if col_span == 0 || row_span == 0 {
        return Err("span of zero".to_string());
    }
    Ok(RawCell {
        location: Point::new(location.x, location.y),
        width: size.width,
        height: size.height,
        col_span,
        row_span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BY_TWO: &str = r#"[
        {"page": 1, "tables": [{
            "location": {"x": 50, "y": 600},
            "size": {"width": 200, "height": 40},
            "cols": [[50, 150], [150, 250]],
            "rows": [[640, 620], [620, 600]],
            "cells": [
                [{"location": {"x": 50, "y": 620}, "size": {"width": 100, "height": 20}, "colSpan": 2},
                 null],
                [{"location": {"x": 50, "y": 600}, "size": {"width": 100, "height": 20}},
                 {"location": {"x": 150, "y": 600}, "size": {"width": 100, "height": 20}}]
            ],
            "flavor": "lattice"
        }]}
    ]"#;

    #[test]
    fn test_parse_valid_payload() {
        let pages = parse_payload(TWO_BY_TWO, Flavor::Stream).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page, 1);
        let table = &pages[0].tables[0];
        assert_eq!(table.flavor, Flavor::Lattice);
        assert_eq!(table.cols.len(), 2);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, 0).unwrap().col_span, 2);
        assert_eq!(table.cell(0, 0).unwrap().row_span, 1);
        assert!(table.cell(1, 0).is_none());
        assert!(table.content.is_none());
        assert_eq!(table.expected_text(0, 0), "");
    }

    #[test]
    fn test_missing_flavor_uses_default() {
        let json = TWO_BY_TWO.replace(r#""flavor": "lattice""#, r#""content": [["a", null]]"#);
        let pages = parse_payload(&json, Flavor::Stream).unwrap();
        let table = &pages[0].tables[0];
        assert_eq!(table.flavor, Flavor::Stream);
        assert_eq!(table.expected_text(0, 0), "a");
        assert_eq!(table.expected_text(1, 0), "");
        assert_eq!(table.expected_text(0, 1), "");
    }

    #[test]
    fn test_missing_geometry_is_rejected() {
        let json = TWO_BY_TWO.replace(r#""rows": [[640, 620], [620, 600]],"#, "");
        let err = parse_payload(&json, Flavor::Lattice).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(ref m) if m.contains("missing rows")));
    }

    #[test]
    fn test_cell_without_size_is_rejected() {
        let json = TWO_BY_TWO.replace(
            r#"{"location": {"x": 150, "y": 600}, "size": {"width": 100, "height": 20}}"#,
            r#"{"location": {"x": 150, "y": 600}}"#,
        );
        let err = parse_payload(&json, Flavor::Lattice).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(ref m) if m.contains("cell (1, 1)")));
    }

    #[test]
    fn test_zero_span_is_rejected() {
        let json = TWO_BY_TWO.replace(r#""colSpan": 2"#, r#""colSpan": 0"#);
        assert!(matches!(
            parse_payload(&json, Flavor::Lattice),
            Err(Error::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_too_many_cell_rows_is_rejected() {
        let json = TWO_BY_TWO.replace(r#""rows": [[640, 620], [620, 600]]"#, r#""rows": [[640, 600]]"#);
        assert!(matches!(
            parse_payload(&json, Flavor::Lattice),
            Err(Error::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_unparseable_payload() {
        assert!(matches!(parse_payload("not json", Flavor::Lattice), Err(Error::Json(_))));
        assert!(matches!(
            parse_payload(r#"{"page": 1}"#, Flavor::Lattice),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_page_without_tables() {
        let pages = parse_payload(r#"[{"page": 3}]"#, Flavor::Lattice).unwrap();
        assert_eq!(pages, vec![PageTables { page: 3, tables: vec![] }]);
    }
}

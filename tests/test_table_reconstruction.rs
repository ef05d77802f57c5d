//! End-to-end tests for the table stage.
//!
//! Documents are built in memory and detector output is replayed from JSON
//! payloads, so no external detector is needed.

use pdf_tablecraft::document::Document;
use pdf_tablecraft::error::{Error, Result};
use pdf_tablecraft::extractor::{
    parse_payload, ExtractionConfig, Flavor, PageSelection, PageTables, RecordedExtractor,
    TableExtractor,
};
use pdf_tablecraft::geometry::BoundingBox;
use pdf_tablecraft::pipeline::{PassOutcome, StageConfig, TableStage};
use pdf_tablecraft::{RowItem, SpanDirection};
use serde_json::{json, Value};
use std::path::Path;

const PAGE_HEIGHT: f32 = 100.0;
const CELL: f32 = 10.0;

// =============================================================================
// FIXTURES
// =============================================================================

/// Detector JSON for a grid of 10pt cells anchored at the page's top-left
/// corner. `spans` lists `(col, row, colspan, rowspan)`; positions covered by
/// a span are reported as null.
fn grid_table(cols: usize, rows: usize, spans: &[(usize, usize, usize, usize)]) -> Value {
    let covered = |c: usize, r: usize| {
        spans.iter().any(|&(sc, sr, w, h)| {
            (sc..sc + w).contains(&c) && (sr..sr + h).contains(&r) && (c, r) != (sc, sr)
        })
    };
    let cells: Vec<Vec<Value>> = (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| {
                    if covered(c, r) {
                        return Value::Null;
                    }
                    let (w, h) = spans
                        .iter()
                        .find(|s| s.0 == c && s.1 == r)
                        .map(|s| (s.2, s.3))
                        .unwrap_or((1, 1));
                    json!({
                        "location": {"x": c as f32 * CELL, "y": PAGE_HEIGHT - (r + h) as f32 * CELL},
                        "size": {"width": w as f32 * CELL, "height": h as f32 * CELL},
                        "colSpan": w,
                        "rowSpan": h,
                    })
                })
                .collect()
        })
        .collect();
    let col_bounds: Vec<[f32; 2]> = (0..cols)
        .map(|c| [c as f32 * CELL, (c + 1) as f32 * CELL])
        .collect();
    let row_bounds: Vec<[f32; 2]> = (0..rows)
        .map(|r| [PAGE_HEIGHT - r as f32 * CELL, PAGE_HEIGHT - (r + 1) as f32 * CELL])
        .collect();
    json!({
        "location": {"x": 0.0, "y": PAGE_HEIGHT - rows as f32 * CELL},
        "size": {"width": cols as f32 * CELL, "height": rows as f32 * CELL},
        "cols": col_bounds,
        "rows": row_bounds,
        "cells": cells,
    })
}

fn payload(pages: Vec<(u32, Vec<Value>)>) -> String {
    let pages: Vec<Value> = pages
        .into_iter()
        .map(|(page, tables)| json!({"page": page, "tables": tables}))
        .collect();
    Value::Array(pages).to_string()
}

/// Place a small word inside grid slot `(col, row)`.
fn word_in_slot(col: usize, row: usize) -> BoundingBox {
    BoundingBox::new(col as f32 * CELL + 2.0, row as f32 * CELL + 2.0, 6.0, 6.0)
}

/// A document of `pages` pages. Each has one word per slot of a 3x3 grid,
/// named `r{row}c{col}`, plus one body word far below.
fn document(pages: usize) -> Document {
    let mut doc = Document::new("fixture.pdf");
    for _ in 0..pages {
        let page = doc.add_page(100.0, PAGE_HEIGHT);
        for row in 0..3 {
            for col in 0..3 {
                page.add_word(format!("r{}c{}", row, col), word_in_slot(col, row));
            }
        }
        page.add_word("body", BoundingBox::new(2.0, 70.0, 20.0, 8.0));
    }
    doc
}

fn stage(config: StageConfig, json: String) -> TableStage {
    TableStage::with_config(config, Box::new(RecordedExtractor::from_json(json)))
}

fn listed_texts(doc: &Document, page: u32) -> Vec<String> {
    doc.page(page)
        .map(|p| p.listed_words().map(|w| w.text.clone()).collect())
        .unwrap_or_default()
}

// =============================================================================
// LATTICE TABLES
// =============================================================================

mod lattice_tests {
    use super::*;

    #[test]
    fn test_plain_grid_binds_words_to_cells() {
        let json = payload(vec![(1, vec![grid_table(3, 3, &[])])]);
        let mut doc = document(1);
        let report = stage(StageConfig::default(), json).run(&mut doc);

        assert_eq!(report.tables_attached(), 1);
        assert_eq!(report.words_removed, 9);
        let page = doc.page(1).unwrap();
        let table = page.tables().next().unwrap();
        assert_eq!(table.flavor, Flavor::Lattice);
        assert_eq!(table.bbox, BoundingBox::new(0.0, 0.0, 30.0, 30.0));
        assert_eq!(
            table.text_grid(page),
            vec![
                vec!["r0c0", "r0c1", "r0c2"],
                vec!["r1c0", "r1c1", "r1c2"],
                vec!["r2c0", "r2c1", "r2c2"],
            ]
        );
        assert!(table.has_complete_grid());
        assert_eq!(listed_texts(&doc, 1), vec!["body"]);
    }

    #[test]
    fn test_spans_fill_every_grid_position_once() {
        // (0,0) spans two rows, (1,0) spans two columns.
        let json = payload(vec![(1, vec![grid_table(3, 3, &[(0, 0, 1, 2), (1, 0, 2, 1)])])]);
        let mut doc = document(1);
        stage(StageConfig::default(), json).run(&mut doc);

        let page = doc.page(1).unwrap();
        let table = page.tables().next().unwrap();
        assert!(table.has_complete_grid());
        assert_eq!(table.rows.iter().map(|r| r.cells.len()).collect::<Vec<_>>(), [3, 3, 3]);

        let tall = table.get(0, 0).and_then(RowItem::as_cell).unwrap();
        assert_eq!(tall.rowspan, 2);
        assert_eq!(tall.text(page), "r0c0 r1c0");

        let wide = table.get(0, 1).and_then(RowItem::as_cell).unwrap();
        assert_eq!(wide.colspan, 2);
        assert_eq!(wide.text(page), "r0c1 r0c2");

        let right = table.get(0, 2).and_then(RowItem::as_spanned).unwrap();
        assert_eq!(right.direction, SpanDirection::Left);
        let below = table.get(1, 0).and_then(RowItem::as_spanned).unwrap();
        assert_eq!(below.direction, SpanDirection::Top);
        assert_eq!(below.bbox, BoundingBox::new(0.0, 10.0, 10.0, 10.0));
    }

    #[test]
    fn test_two_row_table_with_row_span_is_attached() {
        let json = payload(vec![(1, vec![grid_table(2, 2, &[(0, 0, 1, 2)])])]);
        let mut doc = document(1);
        let report = stage(StageConfig::default(), json).run(&mut doc);

        assert_eq!(report.tables_attached(), 1);
        let page = doc.page(1).unwrap();
        let table = page.tables().next().unwrap();
        assert!(table.has_complete_grid());
        // The tall cell does not stretch its row past the neighbouring cell.
        assert_eq!(table.rows[0].bbox.map(|b| b.bottom()), Some(10.0));
        assert_eq!(table.rows[1].bbox.map(|b| b.top), Some(10.0));
        assert_eq!(
            table.text_grid(page),
            vec![vec!["r0c0 r1c0", "r0c1"], vec!["", "r1c1"]]
        );
    }

    #[test]
    fn test_row_span_in_middle_row_is_attached() {
        let json = payload(vec![(1, vec![grid_table(2, 3, &[(0, 1, 1, 2)])])]);
        let mut doc = document(1);
        let report = stage(StageConfig::default(), json).run(&mut doc);

        assert_eq!(report.tables_attached(), 1);
        let page = doc.page(1).unwrap();
        let table = page.tables().next().unwrap();
        assert!(table.has_complete_grid());
        let bottoms: Vec<_> = table.rows.iter().map(|r| r.bbox.map(|b| b.bottom())).collect();
        assert_eq!(bottoms, vec![Some(10.0), Some(20.0), Some(30.0)]);
        let tall = table.get(1, 0).and_then(RowItem::as_cell).unwrap();
        assert_eq!(tall.text(page), "r1c0 r2c0");
        assert_eq!(listed_texts(&doc, 1), vec!["r0c2", "r1c2", "r2c2", "body"]);
    }

    #[test]
    fn test_single_row_table_is_rejected() {
        let json = payload(vec![(1, vec![grid_table(3, 1, &[])])]);
        let mut doc = document(1);
        let report = stage(StageConfig::default(), json).run(&mut doc);

        assert_eq!(
            report.passes,
            vec![PassOutcome::Applied {
                attached: 0,
                rejected: 1,
                skipped_pages: 0
            }]
        );
        assert!(!doc.has_table());
        assert_eq!(listed_texts(&doc, 1).len(), 10);
    }

    #[test]
    fn test_words_shared_by_two_tables_are_removed_once() {
        let json = payload(vec![(1, vec![grid_table(3, 3, &[]), grid_table(2, 2, &[])])]);
        let mut doc = document(1);
        let report = stage(StageConfig::default(), json).run(&mut doc);

        assert_eq!(report.tables_attached(), 2);
        assert_eq!(report.words_removed, 9);
        assert_eq!(listed_texts(&doc, 1), vec!["body"]);
    }

    #[test]
    fn test_element_order_keeps_tables_after_words() {
        let json = payload(vec![(1, vec![grid_table(3, 3, &[])])]);
        let mut doc = document(1);
        stage(StageConfig::default(), json).run(&mut doc);

        let elements = &doc.page(1).unwrap().elements;
        assert_eq!(elements.len(), 2);
        assert!(elements[0].is_word());
        assert!(elements[1].is_table());
    }
}

// =============================================================================
// STREAM TABLES
// =============================================================================

mod stream_tests {
    use super::*;

    fn stream_table(content: Value) -> Value {
        let mut table = grid_table(3, 2, &[]);
        table["flavor"] = json!("stream");
        table["content"] = content;
        table
    }

    #[test]
    fn test_split_cells_are_reconciled() {
        let mut doc = Document::new("stream.pdf");
        let page = doc.add_page(100.0, PAGE_HEIGHT);
        page.add_word("Total", word_in_slot(0, 0));
        page.add_word("amount", word_in_slot(1, 0));
        page.add_word("12", word_in_slot(2, 0));
        page.add_word("a", word_in_slot(0, 1));
        page.add_word("b", word_in_slot(1, 1));
        page.add_word("c", word_in_slot(2, 1));

        let content = json!([["Total amount", "", "12"], ["a", "b", "c"]]);
        let json = payload(vec![(1, vec![stream_table(content)])]);
        stage(StageConfig::default(), json).run(&mut doc);

        let page = doc.page(1).unwrap();
        let table = page.tables().next().unwrap();
        assert_eq!(table.flavor, Flavor::Stream);
        assert_eq!(table.text_grid(page), vec![vec!["Total amount", "12"], vec!["a", "b", "c"]]);

        let merged = table.get(0, 0).and_then(RowItem::as_cell).unwrap();
        assert_eq!(merged.colspan, 2);
        assert_eq!(merged.bbox, Some(BoundingBox::new(0.0, 0.0, 20.0, 10.0)));
        assert!(table.has_complete_grid());
    }

    #[test]
    fn test_reconciliation_can_be_disabled() {
        let mut doc = Document::new("stream.pdf");
        let page = doc.add_page(100.0, PAGE_HEIGHT);
        page.add_word("Total", word_in_slot(0, 0));
        page.add_word("amount", word_in_slot(1, 0));

        let content = json!([["Total amount", "", ""], ["", "", ""]]);
        let json = payload(vec![(1, vec![stream_table(content)])]);
        let config = StageConfig::default().with_merge_stream_content(false);
        stage(config, json).run(&mut doc);

        let table = doc.tables().next().unwrap();
        assert_eq!(table.rows[0].cells.len(), 3);
    }
}

// =============================================================================
// STAGE BEHAVIOUR
// =============================================================================

mod stage_tests {
    use super::*;

    /// Fails every stream pass and replays a payload for everything else.
    struct LatticeOnly(RecordedExtractor);

    impl TableExtractor for LatticeOnly {
        fn detect(&self, file: &Path, config: &ExtractionConfig) -> Result<Vec<PageTables>> {
            match config.flavor {
                Flavor::Stream => Err(Error::ExtractorFailed {
                    program: "detector".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "stream detection unavailable".to_string(),
                }),
                Flavor::Lattice => self.0.detect(file, config),
            }
        }

        fn name(&self) -> &'static str {
            "lattice-only"
        }
    }

    #[test]
    fn test_second_invocation_is_a_no_op() {
        let json = payload(vec![(1, vec![grid_table(3, 3, &[])])]);
        let stage = stage(StageConfig::default(), json);
        let mut doc = stage.process(document(1));
        let before = serde_json::to_value(&doc).unwrap();

        let report = stage.run(&mut doc);
        assert!(report.skipped_by_guard);
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_passes_cover_different_pages() {
        let json = payload(vec![
            (1, vec![grid_table(3, 3, &[])]),
            (2, vec![grid_table(2, 2, &[])]),
        ]);
        let config = StageConfig::new().with_passes(vec![
            ExtractionConfig::new().with_pages(PageSelection::pages([1])),
            ExtractionConfig::new()
                .with_pages(PageSelection::pages([2]))
                .with_flavor(Flavor::Stream),
        ]);
        let mut doc = document(2);
        let report = stage(config, json).run(&mut doc);

        assert_eq!(report.tables_attached(), 2);
        let flavors: Vec<Flavor> = doc.tables().map(|t| t.flavor).collect();
        assert_eq!(flavors, [Flavor::Lattice, Flavor::Stream]);
        assert_eq!(listed_texts(&doc, 1), vec!["body"]);
        assert_eq!(listed_texts(&doc, 2).len(), 6);
    }

    #[test]
    fn test_failed_pass_does_not_stop_other_passes() {
        let json = payload(vec![(1, vec![grid_table(3, 3, &[])])]);
        let config = StageConfig::new().with_passes(vec![
            ExtractionConfig::new().with_flavor(Flavor::Stream),
            ExtractionConfig::new(),
        ]);
        let extractor = LatticeOnly(RecordedExtractor::from_json(json));
        let stage = TableStage::with_config(config, Box::new(extractor));
        let mut doc = document(1);
        let report = stage.run(&mut doc);

        assert!(report.passes[0].is_failed());
        assert_eq!(report.passes[1].attached(), 1);
        assert_eq!(doc.tables().count(), 1);
    }

    #[test]
    fn test_malformed_payload_fails_the_pass() {
        let mut table = grid_table(3, 3, &[]);
        table.as_object_mut().unwrap().remove("cols");
        let json = payload(vec![(1, vec![table])]);

        match parse_payload(&json, Flavor::Lattice) {
            Err(Error::MalformedPayload(msg)) => {
                assert!(msg.contains("page 1 table 0"), "unexpected message: {}", msg)
            },
            other => panic!("expected malformed payload, got {:?}", other),
        }

        let mut doc = document(1);
        let report = stage(StageConfig::default(), json).run(&mut doc);
        assert!(report.passes[0].is_failed());
        assert!(!doc.has_table());
        assert_eq!(listed_texts(&doc, 1).len(), 10);
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let json = payload(vec![(1, vec![grid_table(3, 3, &[(0, 0, 2, 1)])])]);
        let doc = stage(StageConfig::default(), json).process(document(1));

        let text = serde_json::to_string(&doc).unwrap();
        let restored: Document = serde_json::from_str(&text).unwrap();
        let page = restored.page(1).unwrap();
        let table = page.tables().next().unwrap();
        assert_eq!(table.text_grid(page)[0], vec!["r0c0 r0c1", "", "r0c2"]);
        assert_eq!(listed_texts(&restored, 1), vec!["body"]);
    }
}

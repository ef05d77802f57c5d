//! Table stage: orchestrates detection passes over a document.
//!
//! ```text
//! Document (pages of words)
//!     ↓
//! [guard] (document already has a table → stage is a no-op)
//!     ↓
//! for each pass in StageConfig.passes:
//!     [TableExtractor::detect]  (failure → pass yields nothing)
//!         ↓
//!     [reconstruct_table] → [check_table] → Page.attach_table
//!     ↓
//! [deduplicate_words]
//!     ↓
//! Document (words + tables)
//! ```
//!
//! A page that receives a table in one pass is left alone by later passes of
//! the same run.

pub mod config;

pub use config::StageConfig;

use crate::document::Document;
use crate::elements::Table;
use crate::extractor::{ExtractionConfig, PageTables, TableExtractor};
use crate::tables::{check_table, deduplicate_words, reconstruct_table};
use std::collections::HashSet;

/// Result of one detection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The detector answered and its tables were processed
    Applied {
        /// Tables attached to pages
        attached: usize,
        /// Candidate tables dropped by the false-table filter
        rejected: usize,
        /// Pages ignored because they were unknown or already claimed
        skipped_pages: usize,
    },
    /// The detector failed; nothing was attached
    Failed(String),
}

impl PassOutcome {
    /// Number of tables attached by this pass.
    pub fn attached(&self) -> usize {
        match self {
            PassOutcome::Applied { attached, .. } => *attached,
            PassOutcome::Failed(_) => 0,
        }
    }

    /// Check if the detector failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, PassOutcome::Failed(_))
    }
}

/// Summary of one stage run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// One outcome per configured pass, in order
    pub passes: Vec<PassOutcome>,
    /// The document already held a table, so nothing ran
    pub skipped_by_guard: bool,
    /// Word references removed from flat page lists
    pub words_removed: usize,
}

impl StageReport {
    /// Total tables attached across passes.
    pub fn tables_attached(&self) -> usize {
        self.passes.iter().map(PassOutcome::attached).sum()
    }
}

/// The table reconstruction stage.
///
/// Owns its configuration and the detector used for every pass.
pub struct TableStage {
    config: StageConfig,
    extractor: Box<dyn TableExtractor>,
}

impl TableStage {
    /// Create a stage with the default configuration.
    pub fn new(extractor: Box<dyn TableExtractor>) -> Self {
        Self::with_config(StageConfig::default(), extractor)
    }

    /// Create a stage with a custom configuration.
    pub fn with_config(config: StageConfig, extractor: Box<dyn TableExtractor>) -> Self {
        Self { config, extractor }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Run every pass over `document` in place.
    ///
    /// Detector failures never abort the run; they are logged and recorded in
    /// the report.
    pub fn run(&self, document: &mut Document) -> StageReport {
        let mut report = StageReport::default();
        if self.config.skip_if_tables_present && document.has_table() {
            log::info!(
                "{} already contains tables, skipping table stage",
                document.path().display()
            );
            report.skipped_by_guard = true;
            return report;
        }

        let mut claimed: HashSet<u32> = HashSet::new();
        for (index, pass) in self.config.passes.iter().enumerate() {
            let outcome = self.run_pass(document, pass, &mut claimed);
            if let PassOutcome::Applied {
                attached, rejected, ..
            } = &outcome
            {
                log::debug!(
                    "pass {} ({}): {} tables attached, {} rejected",
                    index,
                    pass.flavor,
                    attached,
                    rejected
                );
            }
            report.passes.push(outcome);
        }

        report.words_removed = deduplicate_words(document);
        report
    }

    /// Consume a document and return it with tables attached.
    pub fn process(&self, mut document: Document) -> Document {
        self.run(&mut document);
        document
    }

    fn run_pass(
        &self,
        document: &mut Document,
        pass: &ExtractionConfig,
        claimed: &mut HashSet<u32>,
    ) -> PassOutcome {
        let detected = match self.extractor.detect(document.path(), pass) {
            Ok(pages) => pages,
            Err(e) => {
                log::warn!(
                    "{} detector failed on {} ({} pass): {}",
                    self.extractor.name(),
                    document.path().display(),
                    pass.flavor,
                    e
                );
                return PassOutcome::Failed(e.to_string());
            },
        };

        let options = self.config.reconstruction_options();
        let mut rejected = 0;
        let mut skipped_pages = 0;
        let mut accepted: Vec<(u32, Vec<Table>)> = Vec::new();

        for PageTables { page, tables } in detected {
            if claimed.contains(&page) {
                log::debug!("page {} already has tables from an earlier pass", page);
                skipped_pages += 1;
                continue;
            }
            let Some(target) = document.page(page) else {
                log::warn!(
                    "detector reported page {} but {} has {} pages",
                    page,
                    document.path().display(),
                    document.page_count()
                );
                skipped_pages += 1;
                continue;
            };

            let mut kept = Vec::new();
            for (i, descriptor) in tables.iter().enumerate() {
                let table = reconstruct_table(descriptor, target, &options);
                match check_table(&table, self.config.adjacency_rounding) {
                    Ok(()) => kept.push(table),
                    Err(reason) => {
                        log::debug!("page {} table {} rejected: {}", page, i, reason);
                        rejected += 1;
                    },
                }
            }
            if !kept.is_empty() {
                accepted.push((page, kept));
            }
        }

        // Attach only after every descriptor of the pass has been built, so
        // all tables of a pass see the same word list.
        let mut attached = 0;
        for (page, tables) in accepted {
            let Ok(target) = document.page_mut(page) else {
                continue;
            };
            for table in tables {
                target.attach_table(table);
                attached += 1;
            }
            claimed.insert(page);
        }

        PassOutcome::Applied {
            attached,
            rejected,
            skipped_pages,
        }
    }
}

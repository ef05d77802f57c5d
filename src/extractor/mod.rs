//! Boundary to the external table-geometry detector.
//!
//! The detector is a black box: given a file and an [`ExtractionConfig`] it
//! either returns raw geometry for the requested pages or fails. Callers
//! treat a failure as "no tables from this pass" and move on.
//!
//! # Available Extractors
//!
//! - [`CommandExtractor`]: runs the detector as an external process and reads
//!   its JSON payload from stdout
//! - [`RecordedExtractor`]: serves a payload captured earlier

mod command;
mod config;
mod payload;
mod recorded;

pub use command::CommandExtractor;
pub use config::{ExtractionConfig, Flavor, PageSelection, TableArea};
pub use payload::{parse_payload, PageTables, RawCell, RawTableDescriptor};
pub use recorded::RecordedExtractor;

use crate::error::Result;
use std::path::Path;

/// Capability to detect raw table geometry in a document.
pub trait TableExtractor: Send + Sync {
    /// Detect tables in `file` for the pages and flavor in `config`.
    ///
    /// # Returns
    ///
    /// Raw descriptors grouped per page. Pages without tables may be omitted.
    fn detect(&self, file: &Path, config: &ExtractionConfig) -> Result<Vec<PageTables>>;

    /// Return the name of this extractor for debugging.
    fn name(&self) -> &'static str;
}

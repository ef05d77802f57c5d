//! Detector that replays a captured payload.

use super::config::ExtractionConfig;
use super::payload::{parse_payload, PageTables};
use super::TableExtractor;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Serves a detector payload captured earlier, filtered to the requested
/// pages. Useful for replaying a detector run offline.
#[derive(Debug, Clone)]
pub struct RecordedExtractor {
    payload: String,
}

impl RecordedExtractor {
    /// Create an extractor from payload JSON.
    pub fn from_json(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Load the payload from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_json(fs::read_to_string(path)?))
    }
}

impl TableExtractor for RecordedExtractor {
    fn detect(&self, _file: &Path, config: &ExtractionConfig) -> Result<Vec<PageTables>> {
        config.validate()?;
        let pages = parse_payload(&self.payload, config.flavor)?;
        Ok(pages
            .into_iter()
            .filter(|p| config.pages.contains(p.page))
            .collect())
    }

    fn name(&self) -> &'static str {
        "recorded"
    }
}

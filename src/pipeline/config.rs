//! Configuration for the table stage.

use crate::error::{Error, Result};
use crate::extractor::ExtractionConfig;
use crate::tables::{AdjacencyRounding, ReconstructionOptions, DEFAULT_WORD_OVERLAP_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Table stage configuration.
///
/// Deserializable from JSON; missing fields take their defaults:
///
/// ```json
/// {
///   "passes": [{"pages": "all", "flavor": "lattice"}, {"pages": [3], "flavor": "stream"}],
///   "word_overlap_threshold": 0.75,
///   "merge_stream_content": true,
///   "adjacency_rounding": "ceil",
///   "skip_if_tables_present": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Detection passes, run in order
    pub passes: Vec<ExtractionConfig>,
    /// A word belongs to a cell when strictly more than this fraction of its
    /// area lies inside the cell
    pub word_overlap_threshold: f32,
    /// Heal under-segmented stream cells using the detector's expected text
    pub merge_stream_content: bool,
    /// Row boundary snapping used by the false-table filter
    pub adjacency_rounding: AdjacencyRounding,
    /// Skip the whole stage when the document already holds a table.
    /// Evaluated once per run, before the first pass.
    pub skip_if_tables_present: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StageConfig {
    /// Create a configuration with a single default pass.
    pub fn new() -> Self {
        Self {
            passes: vec![ExtractionConfig::default()],
            word_overlap_threshold: DEFAULT_WORD_OVERLAP_THRESHOLD,
            merge_stream_content: true,
            adjacency_rounding: AdjacencyRounding::default(),
            skip_if_tables_present: true,
        }
    }

    /// Replace the detection passes.
    pub fn with_passes(mut self, passes: Vec<ExtractionConfig>) -> Self {
        self.passes = passes;
        self
    }

    /// Append a detection pass.
    pub fn with_pass(mut self, pass: ExtractionConfig) -> Self {
        self.passes.push(pass);
        self
    }

    /// Set the word overlap threshold.
    pub fn with_word_overlap_threshold(mut self, threshold: f32) -> Self {
        self.word_overlap_threshold = threshold;
        self
    }

    /// Enable or disable content reconciliation for stream tables.
    pub fn with_merge_stream_content(mut self, enable: bool) -> Self {
        self.merge_stream_content = enable;
        self
    }

    /// Set the adjacency rounding mode.
    pub fn with_adjacency_rounding(mut self, rounding: AdjacencyRounding) -> Self {
        self.adjacency_rounding = rounding;
        self
    }

    /// Enable or disable the whole-document guard.
    pub fn with_skip_if_tables_present(mut self, enable: bool) -> Self {
        self.skip_if_tables_present = enable;
        self
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: StageConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and every pass.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.word_overlap_threshold) {
            return Err(Error::InvalidConfig(format!(
                "word_overlap_threshold must be in [0, 1), got {}",
                self.word_overlap_threshold
            )));
        }
        self.passes.iter().try_for_each(ExtractionConfig::validate)
    }

    /// Reconstruction tunables derived from this configuration.
    pub fn reconstruction_options(&self) -> ReconstructionOptions {
        ReconstructionOptions {
            word_overlap_threshold: self.word_overlap_threshold,
            merge_content: self.merge_stream_content,
        }
    }
}

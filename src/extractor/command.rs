//! Detector backed by an external process.

use super::config::ExtractionConfig;
use super::payload::{parse_payload, PageTables};
use super::TableExtractor;
use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;

/// Runs an external detector program and parses the payload it prints.
///
/// The program is invoked as
///
/// ```text
/// <program> [base args..] <file> --pages <all|1,2> --flavor <lattice|stream> [--table-areas x1,y1,x2,y2;..]
/// ```
///
/// and must print the JSON payload described in
/// [`parse_payload`](super::parse_payload) on stdout and exit with status 0.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    base_args: Vec<String>,
}

impl CommandExtractor {
    /// Create an extractor for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Arguments placed before the generated ones (e.g. a script path).
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Program that will be run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for one invocation.
    pub fn arguments(&self, file: &Path, config: &ExtractionConfig) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.push(file.display().to_string());
        args.push("--pages".to_string());
        args.push(config.pages.to_arg());
        args.push("--flavor".to_string());
        args.push(config.flavor.as_str().to_string());
        if let Some(areas) = config.table_areas.as_ref().filter(|a| !a.is_empty()) {
            args.push("--table-areas".to_string());
            args.push(areas.iter().map(|a| a.to_arg()).collect::<Vec<_>>().join(";"));
        }
        args
    }
}

impl TableExtractor for CommandExtractor {
    fn detect(&self, file: &Path, config: &ExtractionConfig) -> Result<Vec<PageTables>> {
        config.validate()?;
        let args = self.arguments(file, config);
        log::debug!("Running table detector: {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program).args(&args).output().map_err(|e| {
            Error::ExtractorFailed {
                program: self.program.clone(),
                status: "not started".to_string(),
                stderr: e.to_string(),
            }
        })?;

        if !output.status.success() {
            return Err(Error::ExtractorFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let pages = parse_payload(&stdout, config.flavor)?;
        log::debug!(
            "Table detector returned {} tables on {} pages",
            pages.iter().map(|p| p.tables.len()).sum::<usize>(),
            pages.len()
        );
        Ok(pages)
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

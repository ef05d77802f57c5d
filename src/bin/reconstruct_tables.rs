//! Run the table stage over a serialized document.
//!
//! Reads a document (pages of words) as JSON, runs every configured detection
//! pass and prints the document with tables attached.
//!
//! Usage:
//!   cargo run --release --bin reconstruct_tables -- --document doc.json --payload tables.json
//!   cargo run --release --bin reconstruct_tables -- --document doc.json --detector table-detector \
//!       --flavor stream --pages 1,3
//!   cargo run --release --bin reconstruct_tables -- --document doc.json --detector table-detector \
//!       --config stage.json --output out.json
//!
//! Set `RUST_LOG=debug` to see per-pass and per-table decisions.

use pdf_tablecraft::document::Document;
use pdf_tablecraft::extractor::{
    CommandExtractor, ExtractionConfig, Flavor, PageSelection, RecordedExtractor, TableExtractor,
};
use pdf_tablecraft::pipeline::{PassOutcome, StageConfig, TableStage};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

enum Source {
    Payload(PathBuf),
    Detector(String),
}

struct CliConfig {
    document: Option<PathBuf>,
    source: Option<Source>,
    config: Option<PathBuf>,
    flavor: Option<Flavor>,
    pages: Option<PageSelection>,
    output: Option<PathBuf>,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut cli = Self {
            document: None,
            source: None,
            config: None,
            flavor: None,
            pages: None,
            output: None,
        };

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = || {
                args.get(i + 1)
                    .cloned()
                    .ok_or_else(|| format!("{} needs a value", flag))
            };
            match flag {
                "--document" => cli.document = Some(PathBuf::from(value()?)),
                "--payload" => cli.source = Some(Source::Payload(PathBuf::from(value()?))),
                "--detector" => cli.source = Some(Source::Detector(value()?)),
                "--config" => cli.config = Some(PathBuf::from(value()?)),
                "--flavor" => cli.flavor = Some(Flavor::from_str_lossy(&value()?)),
                "--pages" => cli.pages = Some(parse_pages(&value()?)?),
                "--output" | "-o" => cli.output = Some(PathBuf::from(value()?)),
                other => return Err(format!("unknown argument '{}'", other)),
            }
            i += 2;
        }
        Ok(cli)
    }

    fn stage_config(&self) -> Result<StageConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => StageConfig::from_file(path)?,
            None => StageConfig::default(),
        };
        if self.flavor.is_some() || self.pages.is_some() {
            let mut pass = ExtractionConfig::new();
            if let Some(flavor) = self.flavor {
                pass = pass.with_flavor(flavor);
            }
            if let Some(pages) = &self.pages {
                pass = pass.with_pages(pages.clone());
            }
            config = config.with_passes(vec![pass]);
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_pages(value: &str) -> Result<PageSelection, String> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(PageSelection::All);
    }
    let pages = value
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<u32>()
                .map_err(|e| format!("bad page number '{}': {}", p, e))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PageSelection::pages(pages))
}

fn run(cli: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let document_path = cli.document.clone().ok_or("--document is required")?;
    let extractor: Box<dyn TableExtractor> = match &cli.source {
        Some(Source::Payload(path)) => Box::new(RecordedExtractor::from_file(path)?),
        Some(Source::Detector(program)) => Box::new(CommandExtractor::new(program.clone())),
        None => return Err("one of --payload or --detector is required".into()),
    };
    let config = cli.stage_config()?;

    let mut document: Document = serde_json::from_str(&fs::read_to_string(&document_path)?)?;
    let stage = TableStage::with_config(config, extractor);
    let report = stage.run(&mut document);

    if report.skipped_by_guard {
        log::info!("document already has tables; nothing to do");
    }
    for (i, pass) in report.passes.iter().enumerate() {
        match pass {
            PassOutcome::Applied {
                attached,
                rejected,
                skipped_pages,
            } => log::info!(
                "pass {}: {} attached, {} rejected, {} pages skipped",
                i,
                attached,
                rejected,
                skipped_pages
            ),
            PassOutcome::Failed(reason) => log::info!("pass {}: failed ({})", i, reason),
        }
    }
    log::info!(
        "{} tables attached, {} words moved into cells",
        report.tables_attached(),
        report.words_removed
    );

    let json = serde_json::to_string_pretty(&document)?;
    match &cli.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match CliConfig::from_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        },
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

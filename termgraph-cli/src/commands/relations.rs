//! Relations command implementation

use super::load_config;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{JsonWriter, ReportWriter, TextWriter};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use termgraph_engine::context::DEFAULT_MIN_COUNT;
use termgraph_engine::{run_batch, ContextTables, DocumentProcessor};

/// Arguments for the relations command
#[derive(Debug, Args)]
pub struct RelationsArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "TERMGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of worker threads (default: all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Also write the twelve co-occurrence context tables to this directory
    #[arg(long, value_name = "DIR")]
    pub context: Option<PathBuf>,

    /// Leave elements with fewer pairs out of the context tables
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MIN_COUNT)]
    pub min_count: usize,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// FNAME, pair, TOKENS and DEP lines per sentence
    Text,
    /// JSON array of documents
    Json,
}

impl RelationsArgs {
    /// Execute the relations command
    pub fn execute(&self, quiet: bool) -> Result<()> {
        log::info!("Starting relation mining");

        let files = resolve_patterns(&self.input)?;
        let mut config = load_config(self.config.as_deref())?;
        if let Some(threads) = self.threads {
            config.performance.threads = threads;
        }
        let settings = config.performance.clone();
        let pretty = config.output.pretty;
        let processor = DocumentProcessor::new(config)
            .map_err(|e| CliError::ConfigError(e.to_string()))?
            .without_classifier();

        let mut progress = ProgressReporter::new(quiet || self.output.is_none());
        progress.init_documents(files.len() as u64);
        let outcome = run_batch(&files, &settings, |path| {
            let relations = processor.mine_relations_file(path);
            progress.document_finished(&FileReader::document_name(path), relations.is_ok());
            relations
        })?;
        progress.finish();

        if outcome.succeeded() == 0 {
            return Err(CliError::BatchFailed { total: files.len() }.into());
        }

        let sink: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            )),
            None => Box::new(io::stdout().lock()),
        };
        let mut writer: Box<dyn ReportWriter> = match self.format {
            OutputFormat::Text => Box::new(TextWriter::new(sink)),
            OutputFormat::Json => Box::new(JsonWriter::new(sink, pretty)),
        };
        for (_, relations) in &outcome.results {
            writer.write_document(relations)?;
        }
        writer.finish()?;

        if let Some(dir) = &self.context {
            let tables: ContextTables = outcome.results.iter().map(|(_, r)| r).collect();
            let written = tables
                .write_dir(dir, self.min_count)
                .with_context(|| format!("Failed to write context tables to {}", dir.display()))?;
            log::info!("{} context tables written to {}", written.len(), dir.display());
        }

        let sentences: usize = outcome.results.iter().map(|(_, r)| r.sentences.len()).sum();
        log::info!(
            "{sentences} sentences with relations in {} documents ({} failed)",
            outcome.succeeded(),
            outcome.failed()
        );

        Ok(())
    }
}

//! Terms command implementation

use super::load_config;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use termgraph_engine::{run_batch, DocumentProcessor};

/// Arguments for the terms command
#[derive(Debug, Args)]
pub struct TermsArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output directory (default: rewrite the input files)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "TERMGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not classify terms, even when the configuration enables it
    #[arg(long)]
    pub no_classifier: bool,

    /// Number of worker threads (default: all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,
}

impl TermsArgs {
    /// Execute the terms command
    pub fn execute(&self, quiet: bool) -> Result<()> {
        log::info!("Starting term extraction");

        let files = resolve_patterns(&self.input)?;
        let mut config = load_config(self.config.as_deref())?;
        if let Some(threads) = self.threads {
            config.performance.threads = threads;
        }
        let settings = config.performance.clone();

        let mut processor = DocumentProcessor::new(config)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        if self.no_classifier {
            processor = processor.without_classifier();
        }

        if let Some(dir) = &self.output {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        }

        let mut progress = ProgressReporter::new(quiet);
        progress.init_documents(files.len() as u64);
        let outcome = run_batch(&files, &settings, |path| {
            let target = self.target(path);
            let summary = processor.process_terms_file(path, &target);
            progress.document_finished(&FileReader::document_name(path), summary.is_ok());
            summary
        })?;
        progress.finish();

        if outcome.succeeded() == 0 {
            return Err(CliError::BatchFailed { total: files.len() }.into());
        }

        let (terms, technologies) = outcome
            .results
            .iter()
            .fold((0, 0), |(terms, techs), (_, summary)| {
                (terms + summary.terms, techs + summary.technologies)
            });
        println!(
            "Processed {} documents: {terms} terms, {technologies} technologies ({} failed)",
            outcome.succeeded(),
            outcome.failed()
        );

        Ok(())
    }

    /// Where the processed version of `path` is written
    fn target(&self, path: &Path) -> PathBuf {
        match (&self.output, path.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => path.to_path_buf(),
        }
    }
}

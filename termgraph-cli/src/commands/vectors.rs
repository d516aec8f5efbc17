//! Vectors command implementation

use super::load_config;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use anyhow::{Context, Result};
use clap::Args;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use termgraph_engine::vectors::labelled_examples;
use termgraph_engine::{ListClassifier, TermCounts, VectorLine};

/// Arguments for the vectors command
#[derive(Debug, Args)]
pub struct VectorsArgs {
    /// Processed input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file for the vector lines
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "TERMGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only write terms found on the classifier lists, prefixed with their label
    #[arg(short, long)]
    pub labelled: bool,

    /// Also write terms-az.txt and terms-nr.txt term counts to this directory
    #[arg(long, value_name = "DIR")]
    pub counts: Option<PathBuf>,
}

impl VectorsArgs {
    /// Execute the vectors command
    pub fn execute(&self) -> Result<()> {
        let files = resolve_patterns(&self.input)?;
        let config = load_config(self.config.as_deref())?;

        let mut lines = Vec::new();
        for path in &files {
            let lif = FileReader::read_lif(path)?;
            let name = FileReader::document_name(path);
            let found = VectorLine::from_lif(&lif, &name, &config.views.terms)
                .map_err(|e| CliError::ProcessingError(format!("{}: {e}", path.display())))?;
            log::debug!("{name}: {} vectors", found.len());
            lines.extend(found);
        }

        let mut out = BufWriter::new(
            File::create(&self.output)
                .with_context(|| format!("Failed to create {}", self.output.display()))?,
        );
        if self.labelled {
            let resolve = |paths: &[PathBuf]| -> Vec<PathBuf> {
                paths.iter().map(|p| config.resolve(p)).collect()
            };
            let classifier = ListClassifier::from_files(
                &resolve(&config.classifier.technologies),
                &resolve(&config.classifier.labels),
            )
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
            let examples = labelled_examples(&lines, &classifier);
            for example in &examples {
                writeln!(out, "{example}")?;
            }
            println!("Wrote {} labelled vectors", examples.len());
        } else {
            for line in &lines {
                writeln!(out, "{line}")?;
            }
            println!("Wrote {} vectors", lines.len());
        }
        out.flush()?;

        if let Some(dir) = &self.counts {
            let counts: TermCounts = lines.iter().map(|line| line.term.as_str()).collect();
            write_counts(dir, &counts)?;
        }

        Ok(())
    }
}

/// Write alphabetical and by-frequency term counts
fn write_counts(dir: &Path, counts: &TermCounts) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut az = BufWriter::new(File::create(dir.join("terms-az.txt"))?);
    counts.write_alphabetical(&mut az)?;
    az.flush()?;

    let mut nr = BufWriter::new(File::create(dir.join("terms-nr.txt"))?);
    counts.write_by_frequency(&mut nr)?;
    nr.flush()?;

    log::info!("{} distinct terms written to {}", counts.len(), dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_counts() {
        let dir = TempDir::new().unwrap();
        let counts: TermCounts = ["laser", "prism", "laser"].into_iter().collect();
        write_counts(dir.path(), &counts).unwrap();

        let nr = fs::read_to_string(dir.path().join("terms-nr.txt")).unwrap();
        assert_eq!(nr, "2   \tlaser\n1   \tprism\n");
        let az = fs::read_to_string(dir.path().join("terms-az.txt")).unwrap();
        assert!(az.starts_with("2   \tlaser\n"));
    }
}

//! Validate command implementation

use crate::error::CliError;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use termgraph_engine::{DocumentProcessor, EngineConfig};

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    ///
    /// Besides parsing the file, this loads the term pattern, lexicons and
    /// classifier lists it names.
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        let loaded = EngineConfig::from_file(&self.config).and_then(DocumentProcessor::new);
        match loaded {
            Ok(processor) => {
                let config = processor.config();
                println!("✓ Configuration is valid!");
                println!(
                    "  Views: tokens={} chunks={} terms={}",
                    config.views.tokens, config.views.chunks, config.views.terms
                );
                println!(
                    "  Term pattern: {}",
                    config
                        .matcher
                        .pattern
                        .as_ref()
                        .map_or_else(|| "built-in".to_string(), |p| p.display().to_string())
                );
                println!(
                    "  Classifier: {}",
                    if config.classifier.enabled { "enabled" } else { "disabled" }
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e}");
                Err(CliError::ConfigError(e.to_string()).into())
            }
        }
    }
}

//! CLI command implementations

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use termgraph_engine::EngineConfig;

pub mod generate_config;
pub mod relations;
pub mod terms;
pub mod validate;
pub mod vectors;

/// Technical term extraction over LIF documents
#[derive(Debug, Parser)]
#[command(name = "termgraph", version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add terms, feature vectors and technologies to LIF documents
    Terms(terms::TermsArgs),

    /// Mine relation triples from documents with terms
    Relations(relations::RelationsArgs),

    /// Dump feature-vector lines from processed documents
    Vectors(vectors::VectorsArgs),

    /// Check a configuration file and the files it names
    Validate(validate::ValidateArgs),

    /// Write a commented configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),
}

impl Cli {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        self.init_logging();
        log::debug!("Arguments: {:?}", self);

        match &self.command {
            Commands::Terms(args) => args.execute(self.quiet),
            Commands::Relations(args) => args.execute(self.quiet),
            Commands::Vectors(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        // a second init, e.g. from tests, keeps the first logger
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(log_level),
        )
        .try_init();
    }
}

/// Load the configuration file, or the defaults when none is given
pub(crate) fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use termgraph_core::TermPattern;

/// Configuration template, every value at its default
const TEMPLATE: &str = r#"# termgraph configuration
#
# Relative paths are resolved against the directory of this file.

# View ids read and written in LIF documents
[views]
tokens = "tokens"
chunks = "chunks"
dependencies = "dependencies"
terms = "terms"
technologies = "technologies"

# Term pattern; the built-in pattern is used when unset.
# Write the built-in pattern with `termgraph generate-config --pattern FILE`.
[matcher]
# pattern = "term_pattern.toml"

# Path length limits for relation pairs
[relations]
max_relation_distance = 2
min_term_state_distance = 1
max_term_state_distance = 5

# Lexicon files, all optional
[lexicons]
# states = "lexicons/states.txt"
# verbnet = "lexicons/verbnet-cos.txt"
# wordnet = "lexicons/wordnet-triggers.txt"
# stoplist = "lexicons/stoplist.txt"

# Technology classification from term lists
[classifier]
enabled = false
technologies = []
labels = []

[output]
pretty = true
vectors = true

# Batch execution; threads = 0 uses every core
[performance]
threads = 0
sequential = false
"#;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Also write the built-in term pattern to this file
    #[arg(short, long, value_name = "FILE")]
    pub pattern: Option<PathBuf>,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, TEMPLATE)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        if let Some(path) = &self.pattern {
            let pattern = TermPattern::builtin()?.to_toml_string()?;
            fs::write(path, pattern)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("  Term pattern: {}", path.display());
        }

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the configuration file to point at your lexicons");
        println!("2. Validate your configuration:");
        println!("   termgraph validate --config {}", self.output.display());
        println!("3. Use it for processing:");
        println!(
            "   termgraph terms -i 'corpus/*.lif.json' --config {}",
            self.output.display()
        );

        Ok(())
    }
}

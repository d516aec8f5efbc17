//! termgraph command-line entry point

use clap::Parser;
use termgraph_cli::commands::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().execute()
}

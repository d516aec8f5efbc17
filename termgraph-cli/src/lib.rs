//! termgraph CLI library
//!
//! This library provides the command-line interface for extracting
//! technical terms, feature vectors and relation triples from LIF
//! documents.

pub mod commands;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};

//! Output formatting module

use anyhow::Result;
use termgraph_engine::DocumentRelations;

/// Trait for relation report writers
pub trait ReportWriter {
    /// Format and output the relations of one document
    fn write_document(&mut self, relations: &DocumentRelations) -> Result<()>;

    /// Finalize output (e.g., write the JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonWriter;
pub use text::TextWriter;

//! Plain text report writer

use super::ReportWriter;
use anyhow::Result;
use std::io::{self, Write};
use termgraph_engine::report::write_text;
use termgraph_engine::DocumentRelations;

/// Text writer - one block per sentence with relations
pub struct TextWriter<W: Write> {
    writer: W,
}

impl<W: Write> TextWriter<W> {
    /// Create a new text writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl TextWriter<io::Stdout> {
    /// Create a writer that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ReportWriter for TextWriter<W> {
    fn write_document(&mut self, relations: &DocumentRelations) -> Result<()> {
        write_text(&mut self.writer, relations)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

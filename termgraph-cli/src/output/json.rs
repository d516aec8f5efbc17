//! JSON report writer

use super::ReportWriter;
use anyhow::Result;
use std::io::Write;
use termgraph_engine::report::write_json;
use termgraph_engine::DocumentRelations;

/// JSON writer - collects documents and writes them as one array
pub struct JsonWriter<W: Write> {
    writer: W,
    documents: Vec<DocumentRelations>,
    pretty: bool,
}

impl<W: Write> JsonWriter<W> {
    /// Create a new JSON writer
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            documents: Vec::new(),
            pretty,
        }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_document(&mut self, relations: &DocumentRelations) -> Result<()> {
        self.documents.push(relations.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        write_json(&mut self.writer, &self.documents, self.pretty)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_an_empty_array() {
        let mut out = Vec::new();
        let mut writer = JsonWriter::new(&mut out, false);
        writer.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[test]
    fn test_documents_in_order() {
        let mut out = Vec::new();
        let mut writer = JsonWriter::new(&mut out, true);
        for name in ["a.lif", "b.lif"] {
            writer
                .write_document(&DocumentRelations {
                    name: name.to_string(),
                    sentences: Vec::new(),
                })
                .unwrap();
        }
        writer.finish().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["name"], "a.lif");
        assert_eq!(value[1]["name"], "b.lif");
    }
}

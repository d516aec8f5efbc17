//! Reading LIF documents

use anyhow::{Context, Result};
use std::path::Path;
use termgraph_engine::Lif;

/// Reads input documents
pub struct FileReader;

impl FileReader {
    /// Read and parse a LIF document, gzipped or plain
    pub fn read_lif(path: &Path) -> Result<Lif> {
        Lif::from_file(path)
            .with_context(|| format!("Failed to read LIF document: {}", path.display()))
    }

    /// Document name used in reports: the file name without directories
    pub fn document_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_lif() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("doc.lif.json");
        fs::write(&file_path, r#"{"text": {"@value": "Beam splitter."}, "views": []}"#).unwrap();

        let lif = FileReader::read_lif(&file_path).unwrap();
        assert_eq!(lif.text.value, "Beam splitter.");
        assert!(lif.views.is_empty());
    }

    #[test]
    fn test_read_lif_nonexistent_file() {
        let result = FileReader::read_lif(Path::new("/nonexistent/file.lif"));
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Failed to read LIF document: /nonexistent/file.lif"));
    }

    #[test]
    fn test_read_lif_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("broken.lif.json");
        fs::write(&file_path, "{ not json").unwrap();

        let err_msg = FileReader::read_lif(&file_path).unwrap_err().to_string();
        assert!(err_msg.contains("Failed to read LIF document"));
    }

    #[test]
    fn test_document_name() {
        assert_eq!(
            FileReader::document_name(Path::new("/data/corpus/doc-1.lif.json")),
            "doc-1.lif.json"
        );
    }
}

//! Resolution of document arguments to LIF files

use crate::error::CliError;
use anyhow::{Context, Result};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};

/// File name endings of LIF documents, plain or gzipped
const LIF_SUFFIXES: [&str; 4] = [".lif", ".json", ".lif.gz", ".json.gz"];

/// Whether a file name looks like a LIF document
fn is_lif_document(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .is_some_and(|name| LIF_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

/// Resolve document arguments to file paths
///
/// Each argument is a glob pattern. A matched directory contributes the LIF
/// documents directly inside it, other files are taken as given. Paths are
/// sorted and deduplicated. Matching no file at all is an error.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob(pattern).map_err(|e| CliError::InvalidPattern(format!("{pattern}: {e}")))?;

        for path_result in paths {
            let path = path_result.with_context(|| format!("Error resolving pattern: {pattern}"))?;

            if path.is_dir() {
                files.extend(documents_in(&path)?);
            } else if path.is_file() {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!("No files found matching the provided patterns");
    }

    files.sort();
    files.dedup();
    log::debug!("resolved {} documents", files.len());

    Ok(files)
}

fn documents_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    let mut documents = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .path();
        if path.is_file() && is_lif_document(&path) {
            documents.push(path);
        }
    }
    Ok(documents)
}

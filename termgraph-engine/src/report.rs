//! Relation report writers

use crate::error::{EngineError, Result};
use crate::processor::DocumentRelations;
use std::io::Write;
use std::str::FromStr;

/// Output format of relation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Line-oriented text
    #[default]
    Text,
    /// JSON array of documents
    Json,
}

impl FromStr for ReportFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(EngineError::ConfigError(format!(
                "unknown report format '{other}'"
            ))),
        }
    }
}

/// Write one document's relations as text
///
/// Every sentence is written as a block:
///
/// ```text
/// FNAME<TAB>doc.lif
/// REL-TRM t4-t3<TAB>divides<TAB>beam splitter<TAB>divides --nsubj--> splitter
/// TOKENS<TAB>The/DT beam/NN ...
/// DEP<TAB>divides_4 nsubj splitter_3
/// The beam splitter divides polarized light.
/// ```
///
/// followed by an empty line.
pub fn write_text<W: Write>(out: &mut W, relations: &DocumentRelations) -> Result<()> {
    for sentence in &relations.sentences {
        writeln!(out, "FNAME\t{}", relations.name)?;
        for pair in &sentence.pairs {
            writeln!(
                out,
                "{} {}-{}\t{}\t{}\t{}",
                pair.kind,
                pair.source_id,
                pair.target_id,
                pair.source_text,
                pair.target_text,
                pair.path
            )?;
        }
        write!(out, "TOKENS\t")?;
        for token in &sentence.tokens {
            let text = token.text.replace('\n', "\\n").replace(' ', "");
            write!(out, "{text}/{} ", token.pos)?;
        }
        writeln!(out)?;
        for dep in &sentence.dependencies {
            writeln!(out, "DEP\t{} {} {}", dep.governor, dep.label, dep.dependent)?;
        }
        writeln!(out, "{}\n", sentence.text)?;
    }
    Ok(())
}

/// Write documents' relations as a JSON array
pub fn write_json<W: Write>(out: &mut W, documents: &[DocumentRelations], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, documents)?;
    } else {
        serde_json::to_writer(&mut *out, documents)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Write documents in the given format
pub fn write_report<W: Write>(
    out: &mut W,
    documents: &[DocumentRelations],
    format: ReportFormat,
    pretty: bool,
) -> Result<()> {
    match format {
        ReportFormat::Text => documents.iter().try_for_each(|doc| write_text(out, doc)),
        ReportFormat::Json => write_json(out, documents, pretty),
    }
}

//! Feature-vector lines and term counts
//!
//! A vector line describes one term occurrence:
//!
//! ```text
//! doc-17.lif<TAB>9:17<TAB>beam splitter<TAB>sentence_loc=0 prev_n1=the ...
//! ```
//!
//! A labelled line puts `y`, `n` or `?` and a tab in front of it.

use crate::classify::{Label, ListClassifier};
use crate::error::{EngineError, Result};
use crate::lif::Lif;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use termgraph_core::FeatureVector;

/// One term occurrence with its rendered feature vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorLine {
    /// Name of the source document
    pub file: String,
    /// Start offset of the term
    pub start: usize,
    /// End offset of the term
    pub end: usize,
    /// Term text
    pub term: String,
    /// Rendered feature vector
    pub vector: String,
}

impl VectorLine {
    /// Features of the rendered vector
    pub fn features(&self) -> BTreeMap<String, String> {
        FeatureVector::parse_rendered(&self.vector)
    }

    /// Vector lines of every term carrying a `vector` feature
    pub fn from_lif(lif: &Lif, file: &str, terms_view: &str) -> Result<Vec<VectorLine>> {
        let lines = lif
            .annotations(terms_view)?
            .into_iter()
            .filter_map(|term| {
                let vector = term.vector()?.to_string();
                Some(VectorLine {
                    file: file.to_string(),
                    start: term.start,
                    end: term.end,
                    term: term.surface().to_string(),
                    vector,
                })
            })
            .collect();
        Ok(lines)
    }
}

impl fmt::Display for VectorLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}:{}\t{}\t{}",
            self.file, self.start, self.end, self.term, self.vector
        )
    }
}

fn malformed(reason: impl Into<String>) -> EngineError {
    EngineError::MalformedLine {
        line: 0,
        reason: reason.into(),
    }
}

impl FromStr for VectorLine {
    type Err = EngineError;

    fn from_str(line: &str) -> Result<Self> {
        let mut fields = line.trim_end_matches(['\r', '\n']).splitn(4, '\t');
        let (Some(file), Some(offsets), Some(term), Some(vector)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed("expected four tab-separated fields"));
        };
        let (start, end) = offsets
            .split_once(':')
            .ok_or_else(|| malformed(format!("bad offsets '{offsets}'")))?;
        let parse = |n: &str| {
            n.parse::<usize>()
                .map_err(|_| malformed(format!("bad offsets '{offsets}'")))
        };
        Ok(VectorLine {
            file: file.to_string(),
            start: parse(start)?,
            end: parse(end)?,
            term: term.to_string(),
            vector: vector.to_string(),
        })
    }
}

/// A vector line with its label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledLine {
    /// Label of the term
    pub label: Label,
    /// The vector line
    pub line: VectorLine,
}

impl fmt::Display for LabelledLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.label, self.line)
    }
}

impl FromStr for LabelledLine {
    type Err = EngineError;

    fn from_str(line: &str) -> Result<Self> {
        let (label, rest) = line
            .split_once('\t')
            .ok_or_else(|| malformed("missing label"))?;
        Ok(LabelledLine {
            label: label.parse()?,
            line: rest.parse()?,
        })
    }
}

/// Labelled examples for the lines whose term is on a list
pub fn labelled_examples(lines: &[VectorLine], classifier: &ListClassifier) -> Vec<LabelledLine> {
    lines
        .iter()
        .filter_map(|line| {
            Some(LabelledLine {
                label: classifier.label(&line.term)?,
                line: line.clone(),
            })
        })
        .collect()
}

/// Parse vector lines, numbering errors by line
pub fn parse_vector_lines(text: &str) -> Result<Vec<VectorLine>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.parse().map_err(|e| match e {
                EngineError::MalformedLine { reason, .. } => EngineError::MalformedLine {
                    line: i + 1,
                    reason,
                },
                other => other,
            })
        })
        .collect()
}

/// Frequencies of term texts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermCounts {
    counts: HashMap<String, usize>,
}

impl TermCounts {
    /// Create empty counts
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence
    pub fn add(&mut self, term: &str) {
        *self.counts.entry(term.to_string()).or_insert(0) += 1;
    }

    /// Merge other counts into these
    pub fn merge(&mut self, other: TermCounts) {
        for (term, count) in other.counts {
            *self.counts.entry(term).or_insert(0) += count;
        }
    }

    /// Count of a term
    pub fn get(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was counted
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Terms sorted alphabetically
    pub fn alphabetical(&self) -> Vec<(&str, usize)> {
        let mut terms: Vec<_> = self.counts.iter().map(|(t, &c)| (t.as_str(), c)).collect();
        terms.sort_unstable();
        terms
    }

    /// Terms by descending count, ties alphabetical
    pub fn by_frequency(&self) -> Vec<(&str, usize)> {
        let mut terms = self.alphabetical();
        terms.sort_by(|a, b| b.1.cmp(&a.1));
        terms
    }

    /// Write `count<TAB>term` lines alphabetically
    pub fn write_alphabetical<W: Write>(&self, out: &mut W) -> Result<()> {
        for (term, count) in self.alphabetical() {
            writeln!(out, "{count:<4}\t{term}")?;
        }
        Ok(())
    }

    /// Write `count<TAB>term` lines by frequency
    pub fn write_by_frequency<W: Write>(&self, out: &mut W) -> Result<()> {
        for (term, count) in self.by_frequency() {
            writeln!(out, "{count:<4}\t{term}")?;
        }
        Ok(())
    }
}

impl<'a> FromIterator<&'a str> for TermCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counts = TermCounts::new();
        for term in iter {
            counts.add(term);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn line() -> VectorLine {
        VectorLine {
            file: "doc.lif".to_string(),
            start: 4,
            end: 17,
            term: "beam splitter".to_string(),
            vector: "sentence_loc=1 prev_n1=the plen=2".to_string(),
        }
    }

    #[test]
    fn test_vector_line_format() {
        let rendered = line().to_string();
        assert_eq!(
            rendered,
            "doc.lif\t4:17\tbeam splitter\tsentence_loc=1 prev_n1=the plen=2"
        );
        assert_eq!(rendered.parse::<VectorLine>().unwrap(), line());
        assert_eq!(line().features()["prev_n1"], "the");
    }

    #[test]
    fn test_malformed_lines() {
        assert!("doc.lif\t4-17\tterm\tv".parse::<VectorLine>().is_err());
        assert!("doc.lif\t4:17".parse::<VectorLine>().is_err());
        let err = parse_vector_lines("doc\t1:2\tt\tv\n\ndoc\tx:2\tt\tv\n").unwrap_err();
        assert!(matches!(err, EngineError::MalformedLine { line: 3, .. }));
    }

    #[test]
    fn test_labelled_examples() {
        let classifier = ListClassifier::new(
            HashSet::from(["beam splitter".to_string()]),
            HashSet::new(),
        );
        let mut other = line();
        other.term = "device".to_string();
        let examples = labelled_examples(&[line(), other], &classifier);
        assert_eq!(examples.len(), 1);
        let rendered = examples[0].to_string();
        assert!(rendered.starts_with("y\tdoc.lif\t4:17\t"));
        assert_eq!(rendered.parse::<LabelledLine>().unwrap(), examples[0]);
    }

    #[test]
    fn test_term_counts() {
        let mut counts: TermCounts = ["laser", "prism", "laser", "beam"].into_iter().collect();
        counts.merge(["prism", "laser"].into_iter().collect());
        assert_eq!(counts.get("laser"), 3);
        assert_eq!(counts.len(), 3);
        assert_eq!(
            counts.by_frequency(),
            vec![("laser", 3), ("prism", 2), ("beam", 1)]
        );

        let mut out = Vec::new();
        counts.write_alphabetical(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1   \tbeam\n3   \tlaser\n2   \tprism\n"
        );
    }
}

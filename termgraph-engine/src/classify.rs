//! Technology classification of terms
//!
//! Classification sits behind [`TermClassifier`] so a statistical model can
//! replace the list lookup. [`ListClassifier`] labels terms from lists of
//! known technologies and labelled term files.

use crate::error::{EngineError, Result};
use crate::lexicons::read_text;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use termgraph_core::FeatureVector;
use tracing::debug;

/// Outcome of classifying a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// The term names a technology
    Technology,
    /// The term does not name a technology
    NotTechnology,
    /// The lists disagree on the term
    Ambiguous,
}

impl Label {
    /// One-letter code used in labelled files
    pub fn code(&self) -> &'static str {
        match self {
            Label::Technology => "y",
            Label::NotTechnology => "n",
            Label::Ambiguous => "?",
        }
    }

    /// Parse a one-letter code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "y" => Some(Label::Technology),
            "n" => Some(Label::NotTechnology),
            "?" => Some(Label::Ambiguous),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Label {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s).ok_or_else(|| EngineError::MalformedLine {
            line: 0,
            reason: format!("unknown label '{s}'"),
        })
    }
}

/// Decides whether a term is a technology
pub trait TermClassifier: Send + Sync {
    /// Classify a term given its text and feature vector
    fn classify(&self, term: &str, features: &FeatureVector) -> Label;
}

/// Technology terms: one per line, lower-cased
pub fn parse_technology_list(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

/// Labelled terms: `label<TAB>frequency<TAB>term` with `y` or `n` labels
///
/// Returns the `y` terms and the `n` terms, lower-cased. Other labels,
/// comments and malformed lines are skipped.
pub fn parse_label_list(text: &str) -> (HashSet<String>, HashSet<String>) {
    let mut positive = HashSet::new();
    let mut negative = HashSet::new();
    for line in text.lines().map(str::trim_end) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let [label, _, term] = fields[..] else {
            continue;
        };
        match Label::from_code(label) {
            Some(Label::Technology) => positive.insert(term.to_lowercase()),
            Some(Label::NotTechnology) => negative.insert(term.to_lowercase()),
            _ => continue,
        };
    }
    (positive, negative)
}

/// Classifier backed by term lists
#[derive(Debug, Clone, Default)]
pub struct ListClassifier {
    technologies: HashSet<String>,
    non_technologies: HashSet<String>,
}

impl ListClassifier {
    /// Create a classifier from lower-cased term sets
    pub fn new(technologies: HashSet<String>, non_technologies: HashSet<String>) -> Self {
        Self {
            technologies,
            non_technologies,
        }
    }

    /// Load technology lists and labelled lists
    pub fn from_files<P: AsRef<Path>>(technologies: &[P], labels: &[P]) -> Result<Self> {
        let mut classifier = Self::default();
        for path in technologies {
            let terms = parse_technology_list(&read_text(path.as_ref())?);
            classifier.technologies.extend(terms);
        }
        for path in labels {
            let (positive, negative) = parse_label_list(&read_text(path.as_ref())?);
            classifier.technologies.extend(positive);
            classifier.non_technologies.extend(negative);
        }
        debug!(
            "classifier lists: {} technologies, {} non-technologies",
            classifier.technologies.len(),
            classifier.non_technologies.len()
        );
        Ok(classifier)
    }

    /// Label from the lists, `None` when the term is in neither
    pub fn label(&self, term: &str) -> Option<Label> {
        let term = term.to_lowercase();
        match (
            self.technologies.contains(&term),
            self.non_technologies.contains(&term),
        ) {
            (true, true) => Some(Label::Ambiguous),
            (true, false) => Some(Label::Technology),
            (false, true) => Some(Label::NotTechnology),
            (false, false) => None,
        }
    }
}

impl TermClassifier for ListClassifier {
    fn classify(&self, term: &str, _features: &FeatureVector) -> Label {
        self.label(term).unwrap_or(Label::NotTechnology)
    }
}

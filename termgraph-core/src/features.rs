//! Per-term feature vectors derived from the document graph
//!
//! Features, in output order:
//!
//! | name            | value                                                  |
//! |-----------------|--------------------------------------------------------|
//! | `sentence_loc`  | sentence positions of the term tokens (first kept)     |
//! | `prev_n1..3`    | up to 1/2/3 nominals before the term                   |
//! | `next_n2`       | up to 2 nominals after the term                        |
//! | `first_word`    | first token text                                       |
//! | `last_word`     | head token text                                        |
//! | `suffix3..5`    | last 3/4/5 characters of the head                      |
//! | `plen`          | token count                                            |
//! | `tag_list`      | tags of the term tokens                                |
//! | `prev_J`        | adjective before the term, or the last one inside it   |
//! | `prev_Npr`      | always absent                                          |
//! | `prev_Jpr`      | always absent                                          |
//! | `dep_<label>`   | governor text of the head, omitted for root heads      |

use crate::graph::{DocumentGraph, SpanIdx, TokenIdx};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag of personal pronouns; chunks headed by one get no vector
pub const PRONOUN_TAG: &str = "PRP";

/// Rendering of an absent value
pub const ABSENT: &str = "None";

/// Value of one feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// No value
    Absent,
    /// A count or position
    Number(usize),
    /// A single string
    Text(String),
    /// Ordered strings
    List(Vec<String>),
    /// Ordered positions
    Positions(Vec<usize>),
}

impl FeatureValue {
    /// Flatten to a scalar: lists are joined with `_`
    pub fn atomize(&self) -> FeatureValue {
        match self {
            FeatureValue::List(items) => FeatureValue::Text(items.join("_")),
            FeatureValue::Positions(items) => FeatureValue::Text(
                items
                    .iter()
                    .map(usize::to_string)
                    .collect::<Vec<_>>()
                    .join("_"),
            ),
            other => other.clone(),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.atomize() {
            FeatureValue::Absent => f.write_str(ABSENT),
            FeatureValue::Number(n) => write!(f, "{n}"),
            FeatureValue::Text(text) => f.write_str(&text),
            FeatureValue::List(_) | FeatureValue::Positions(_) => Ok(()),
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(text: &str) -> Self {
        FeatureValue::Text(text.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(text: String) -> Self {
        FeatureValue::Text(text)
    }
}

impl From<usize> for FeatureValue {
    fn from(n: usize) -> Self {
        FeatureValue::Number(n)
    }
}

impl From<Option<String>> for FeatureValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FeatureValue::Absent, FeatureValue::Text)
    }
}

/// Ordered name to value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureVector {
    /// Create an empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature, keeping the position of an existing entry
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a feature
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no features
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy with scalar values only
    ///
    /// `sentence_loc` keeps its first position, other lists are joined
    /// with `_`.
    pub fn atomized(&self) -> FeatureVector {
        let entries = self
            .entries
            .iter()
            .map(|(name, value)| {
                let value = match (name.as_str(), value) {
                    ("sentence_loc", FeatureValue::Positions(positions)) => positions
                        .first()
                        .copied()
                        .map_or(FeatureValue::Absent, FeatureValue::Number),
                    (_, value) => value.atomize(),
                };
                (name.clone(), value)
            })
            .collect();
        FeatureVector { entries }
    }

    /// Space separated `name=value` line
    pub fn render(&self) -> String {
        self.atomized()
            .entries
            .iter()
            .map(|(name, value)| {
                let value = value.to_string();
                format!("{name}={}", value.replace(char::is_whitespace, "_"))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Recover the string map from a rendered line
    ///
    /// Items without `=` are ignored; values may themselves contain `=`.
    pub fn parse_rendered(line: &str) -> BTreeMap<String, String> {
        line.split_whitespace()
            .filter_map(|item| item.split_once('='))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Walks a document graph to build feature vectors for its spans
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor<'g> {
    graph: &'g DocumentGraph,
}

impl<'g> FeatureExtractor<'g> {
    /// Create an extractor over a built graph
    pub fn new(graph: &'g DocumentGraph) -> Self {
        Self { graph }
    }

    /// Features of one chunk or term, `None` when skipped
    pub fn extract(&self, span: SpanIdx) -> Option<FeatureVector> {
        self.extract_tokens(&self.graph[span].tokens)
    }

    /// Features of every span of the graph that is not skipped
    pub fn extract_all(&self) -> Vec<(SpanIdx, FeatureVector)> {
        (0..self.graph.spans().len())
            .map(SpanIdx)
            .filter_map(|span| self.extract(span).map(|features| (span, features)))
            .collect()
    }

    /// Features of a contiguous token run
    ///
    /// Returns `None` for an empty run or when the head is a pronoun.
    pub fn extract_tokens(&self, tokens: &[TokenIdx]) -> Option<FeatureVector> {
        let (&first, &head) = (tokens.first()?, tokens.last()?);
        if self.tag(head) == PRONOUN_TAG {
            return None;
        }
        let head_text = self.text(head);

        let mut features = FeatureVector::new();
        features.insert(
            "sentence_loc",
            FeatureValue::Positions(
                tokens
                    .iter()
                    .filter_map(|&t| self.graph[t].sentence_position)
                    .collect(),
            ),
        );
        features.insert("prev_n1", FeatureValue::List(self.previous_nominals(first, 1)));
        features.insert("prev_n2", FeatureValue::List(self.previous_nominals(first, 2)));
        features.insert("prev_n3", FeatureValue::List(self.previous_nominals(first, 3)));
        features.insert("next_n2", FeatureValue::List(self.next_nominals(head, 2)));
        features.insert("first_word", self.text(first));
        features.insert("last_word", head_text);
        features.insert("suffix3", suffix(head_text, 3));
        features.insert("suffix4", suffix(head_text, 4));
        features.insert("suffix5", suffix(head_text, 5));
        features.insert("plen", tokens.len());
        features.insert(
            "tag_list",
            FeatureValue::List(tokens.iter().map(|&t| self.tag(t).to_string()).collect()),
        );
        features.insert("prev_J", self.previous_adjective(tokens));
        features.insert("prev_Npr", FeatureValue::Absent);
        features.insert("prev_Jpr", FeatureValue::Absent);

        if let Some((label, governor)) = self.graph[head].governor.edge() {
            features.insert(format!("dep_{label}"), self.text(governor));
        }
        Some(features)
    }

    fn text(&self, token: TokenIdx) -> &'g str {
        self.graph[token].text()
    }

    fn tag(&self, token: TokenIdx) -> &'g str {
        self.graph[token].tag()
    }

    fn is_nominal(&self, token: TokenIdx) -> bool {
        self.tag(token).starts_with('N')
    }

    fn previous_nominals(&self, first: TokenIdx, limit: usize) -> Vec<String> {
        let mut found = Vec::new();
        let mut cursor = self.graph[first].previous;
        while let Some(token) = cursor {
            if found.len() >= limit {
                break;
            }
            if self.is_nominal(token) {
                found.push(self.text(token).to_string());
            }
            cursor = self.graph[token].previous;
        }
        found.reverse();
        found
    }

    fn next_nominals(&self, last: TokenIdx, limit: usize) -> Vec<String> {
        let mut found = Vec::new();
        let mut cursor = self.graph[last].next;
        while let Some(token) = cursor {
            if found.len() >= limit {
                break;
            }
            if self.is_nominal(token) {
                found.push(self.text(token).to_string());
            }
            cursor = self.graph[token].next;
        }
        found
    }

    fn previous_adjective(&self, tokens: &[TokenIdx]) -> Option<String> {
        let is_adjective = |t: TokenIdx| self.tag(t).starts_with('J');
        let before = tokens.first().and_then(|&t| self.graph[t].previous);
        before
            .filter(|&t| is_adjective(t))
            .or_else(|| tokens.iter().rev().copied().find(|&t| is_adjective(t)))
            .map(|t| self.text(t).to_string())
    }
}

/// Last `n` characters of `text`, or all of it when shorter
fn suffix(text: &str, n: usize) -> String {
    let skip = text.chars().count().saturating_sub(n);
    text.chars().skip(skip).collect()
}

//! Anchored backward tag-pattern matching of term boundaries
//!
//! A pattern has an END set, tested against the last token of a chunk, and a
//! BODY set, tested right to left against the tokens before it. The term is
//! the longest contiguous suffix of the chunk where the last token matches END
//! and every other token matches BODY.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;
use tracing::trace;

const BUILTIN_PATTERN: &str = include_str!("../configs/term_pattern.toml");

static BUILTIN: OnceLock<std::result::Result<TermPattern, String>> = OnceLock::new();

/// One disjunct of a pattern set: a tag with an optional word exception list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternElement {
    /// Part-of-speech tag that must match exactly
    pub tag: String,
    /// Words that never match, even with the right tag
    #[serde(default, rename = "except", skip_serializing_if = "BTreeSet::is_empty")]
    pub exceptions: BTreeSet<String>,
}

impl PatternElement {
    /// Element matching a bare tag
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            exceptions: BTreeSet::new(),
        }
    }

    /// Element matching a tag unless the word is listed
    pub fn with_exceptions<I, S>(tag: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tag: tag.into(),
            exceptions: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a `(word, tag)` pair satisfies this element
    pub fn matches(&self, word: &str, tag: &str) -> bool {
        self.tag == tag && !self.exceptions.contains(word)
    }
}

/// Pattern deciding the term inside a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPattern {
    /// Elements the last token must match
    pub end: Vec<PatternElement>,
    /// Elements every earlier token of the term must match
    #[serde(default)]
    pub body: Vec<PatternElement>,
}

impl TermPattern {
    /// Create a pattern from its two sets
    pub fn new(end: Vec<PatternElement>, body: Vec<PatternElement>) -> Self {
        Self { end, body }
    }

    /// The pattern shipped with the crate, parsed once
    pub fn builtin() -> Result<&'static TermPattern> {
        BUILTIN
            .get_or_init(|| Self::parse(BUILTIN_PATTERN))
            .as_ref()
            .map_err(|e| CoreError::InvalidPattern(e.clone()))
    }

    /// Parse a pattern from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text).map_err(CoreError::InvalidPattern)
    }

    /// Read a pattern from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::InvalidPattern(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Render the pattern as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CoreError::InvalidPattern(e.to_string()))
    }

    fn parse(text: &str) -> std::result::Result<Self, String> {
        let pattern: TermPattern = toml::from_str(text).map_err(|e| e.to_string())?;
        if pattern.end.is_empty() {
            return Err("pattern needs at least one [[end]] element".to_string());
        }
        Ok(pattern)
    }

    fn matches_end(&self, word: &str, tag: &str) -> bool {
        self.end.iter().any(|e| e.matches(word, tag))
    }

    fn matches_body(&self, word: &str, tag: &str) -> bool {
        self.body.iter().any(|e| e.matches(word, tag))
    }

    /// Indices of the matched suffix of `tokens`, left to right
    ///
    /// `tokens` are `(word, tag)` pairs of one chunk. Returns an empty list
    /// when the last token does not match the END set or the input is empty.
    pub fn match_tokens<W, T>(&self, tokens: &[(W, T)]) -> Vec<usize>
    where
        W: AsRef<str>,
        T: AsRef<str>,
    {
        self.match_range(tokens)
            .map(|range| range.collect())
            .unwrap_or_default()
    }

    /// Matched suffix of `tokens` as an index range
    pub fn match_range<W, T>(&self, tokens: &[(W, T)]) -> Option<Range<usize>>
    where
        W: AsRef<str>,
        T: AsRef<str>,
    {
        let (last_word, last_tag) = tokens.last()?;
        if !self.matches_end(last_word.as_ref(), last_tag.as_ref()) {
            trace!("no term: {} fails the end set", last_tag.as_ref());
            return None;
        }
        let last = tokens.len() - 1;
        let first = tokens[..last]
            .iter()
            .rposition(|(word, tag)| !self.matches_body(word.as_ref(), tag.as_ref()))
            .map_or(0, |failed| failed + 1);
        Some(first..tokens.len())
    }

    /// Character offsets `(start, end)` of the term inside a chunk
    ///
    /// `tokens` are `(word, tag, start, end)` tuples of the chunk's tokens.
    pub fn match_span<W, T>(&self, tokens: &[(W, T, usize, usize)]) -> Option<(usize, usize)>
    where
        W: AsRef<str>,
        T: AsRef<str>,
    {
        let pairs: Vec<(&str, &str)> = tokens
            .iter()
            .map(|(word, tag, _, _)| (word.as_ref(), tag.as_ref()))
            .collect();
        let range = self.match_range(&pairs)?;
        Some((tokens[range.start].2, tokens[range.end - 1].3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_pattern() -> TermPattern {
        TermPattern::new(
            vec![PatternElement::tag("NN")],
            vec![PatternElement::tag("NN"), PatternElement::tag("DT")],
        )
    }

    #[test]
    fn test_whole_chunk_matches() {
        let tokens = [("the", "DT"), ("beam", "NN"), ("splitter", "NN")];
        assert_eq!(small_pattern().match_tokens(&tokens), vec![0, 1, 2]);
    }

    #[test]
    fn test_end_must_match() {
        let tokens = [("beam", "NN"), ("splits", "VBZ")];
        assert!(small_pattern().match_tokens(&tokens).is_empty());
    }

    #[test]
    fn test_scan_stops_at_first_failure() {
        let tokens = [("the", "DT"), ("fast", "JJ"), ("beam", "NN"), ("splitter", "NN")];
        assert_eq!(small_pattern().match_tokens(&tokens), vec![2, 3]);
    }

    #[test]
    fn test_empty_input() {
        let tokens: [(&str, &str); 0] = [];
        assert!(small_pattern().match_tokens(&tokens).is_empty());
    }

    #[test]
    fn test_builtin_exceptions() {
        let pattern = TermPattern::builtin().unwrap();
        let tokens = [("figure", "NN"), ("optical", "JJ"), ("fibers", "NNS")];
        assert_eq!(pattern.match_tokens(&tokens), vec![1, 2]);

        let tokens = [("the", "DT"), ("various", "JJ"), ("lenses", "NNS")];
        assert_eq!(pattern.match_tokens(&tokens), vec![2]);

        let tokens = [("most", "JJS"), ("lasers", "NNS")];
        assert_eq!(pattern.match_tokens(&tokens), vec![1]);
    }

    #[test]
    fn test_builtin_end_set() {
        let pattern = TermPattern::builtin().unwrap();
        assert_eq!(pattern.end.len(), 4);
        // exceptions only apply to the body set
        assert_eq!(pattern.match_tokens(&[("figure", "NN")]), vec![0]);
    }

    #[test]
    fn test_match_span_offsets() {
        let pattern = small_pattern();
        let tokens = [
            ("a", "IN", 0, 1),
            ("beam", "NN", 2, 6),
            ("splitter", "NN", 7, 15),
        ];
        assert_eq!(pattern.match_span(&tokens), Some((2, 15)));
    }

    #[test]
    fn test_from_toml_requires_end() {
        let err = TermPattern::from_toml_str("[[body]]\ntag = \"NN\"\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidPattern(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let pattern = TermPattern::new(
            vec![PatternElement::tag("NN")],
            vec![PatternElement::with_exceptions("JJ", ["other"])],
        );
        let text = pattern.to_toml_string().unwrap();
        assert_eq!(TermPattern::from_toml_str(&text).unwrap(), pattern);
    }
}

//! Annotation records produced by the upstream annotator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Vocabulary prefix used for annotation type URIs
pub const VOCAB_PREFIX: &str = "http://vocab.lappsgrid.org/";

/// Feature holding the part-of-speech tag of a token
pub const POS_FEATURE: &str = "pos";
/// Feature holding the surface form of a token
pub const WORD_FEATURE: &str = "word";
/// Feature holding the lemma of a token
pub const LEMMA_FEATURE: &str = "lemma";
/// The one feature that may be written after the graph is built
pub const VECTOR_FEATURE: &str = "vector";

/// Type of an annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// A single token with `word`, `pos` and optional `lemma` features
    Token,
    /// A sentence span
    Sentence,
    /// A noun chunk proposed by the annotator
    NounChunk,
    /// A candidate technical term
    Term,
    /// A labelled dependency edge between two tokens
    Dependency,
    /// Groups the dependency edges of one sentence
    DependencyStructure,
    /// A token matched against the state lexicon
    State,
    /// A change-of-state verb token
    Relation,
    /// A term classified as a technology
    Technology,
    /// Anything else, keyed by its short type name
    Other(String),
}

impl AnnotationKind {
    /// Parse a type name, either short (`Token`) or a full vocabulary URI
    pub fn from_type(type_name: &str) -> Self {
        let short = type_name.rsplit('/').next().unwrap_or(type_name);
        match short {
            "Token" => Self::Token,
            "Sentence" => Self::Sentence,
            "NounChunk" | "Chunk" => Self::NounChunk,
            "Term" => Self::Term,
            "Dependency" => Self::Dependency,
            "DependencyStructure" => Self::DependencyStructure,
            "State" => Self::State,
            "Relation" => Self::Relation,
            "Technology" => Self::Technology,
            other => Self::Other(other.to_string()),
        }
    }

    /// Short type name
    pub fn short_name(&self) -> &str {
        match self {
            Self::Token => "Token",
            Self::Sentence => "Sentence",
            Self::NounChunk => "NounChunk",
            Self::Term => "Term",
            Self::Dependency => "Dependency",
            Self::DependencyStructure => "DependencyStructure",
            Self::State => "State",
            Self::Relation => "Relation",
            Self::Technology => "Technology",
            Self::Other(name) => name,
        }
    }

    /// Full vocabulary URI for this type
    pub fn vocab_uri(&self) -> String {
        format!("{VOCAB_PREFIX}{}", self.short_name())
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// An annotated span of the document text
///
/// Offsets are character offsets into the document text. Annotations are
/// treated as immutable once handed to a graph, except for the
/// [`VECTOR_FEATURE`] written back onto terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Identifier, unique within its collection
    pub id: String,
    /// Annotation type
    pub kind: AnnotationKind,
    /// Start character offset
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// Covered text, may be empty when the producer did not supply it
    pub text: String,
    /// String features
    pub features: BTreeMap<String, String>,
}

impl Annotation {
    /// Create an annotation without text or features
    pub fn new(id: impl Into<String>, kind: AnnotationKind, start: usize, end: usize) -> Self {
        Self {
            id: id.into(),
            kind,
            start,
            end,
            text: String::new(),
            features: BTreeMap::new(),
        }
    }

    /// Create a token annotation with its word and tag
    pub fn token(
        id: impl Into<String>,
        start: usize,
        end: usize,
        word: impl Into<String>,
        pos: impl Into<String>,
    ) -> Self {
        let word = word.into();
        Self::new(id, AnnotationKind::Token, start, end)
            .with_feature(WORD_FEATURE, word.clone())
            .with_feature(POS_FEATURE, pos)
            .with_text(word)
    }

    /// Set the covered text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add a feature
    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }

    /// Look up a feature value
    pub fn feature(&self, name: &str) -> Option<&str> {
        self.features.get(name).map(String::as_str)
    }

    /// Part-of-speech tag, empty if the annotation has none
    pub fn pos(&self) -> &str {
        self.feature(POS_FEATURE).unwrap_or("")
    }

    /// Lemma, if the annotator supplied one
    pub fn lemma(&self) -> Option<&str> {
        self.feature(LEMMA_FEATURE)
    }

    /// Covered text, falling back to the `word` and `text` features
    pub fn surface(&self) -> &str {
        if !self.text.is_empty() {
            return &self.text;
        }
        self.feature(WORD_FEATURE)
            .or_else(|| self.feature("text"))
            .unwrap_or("")
    }

    /// Store a rendered feature vector on this annotation
    pub fn set_vector(&mut self, vector: impl Into<String>) {
        self.features.insert(VECTOR_FEATURE.to_string(), vector.into());
    }

    /// The rendered feature vector, if one was stored
    pub fn vector(&self) -> Option<&str> {
        self.feature(VECTOR_FEATURE)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} {} {}-{} '{}'>",
            self.kind,
            self.id,
            self.start,
            self.end,
            self.surface().replace('\n', "\\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_uri() {
        assert_eq!(
            AnnotationKind::from_type("http://vocab.lappsgrid.org/Token"),
            AnnotationKind::Token
        );
        assert_eq!(
            AnnotationKind::from_type("DependencyStructure"),
            AnnotationKind::DependencyStructure
        );
        assert_eq!(
            AnnotationKind::from_type("http://vocab.lappsgrid.org/Markable"),
            AnnotationKind::Other("Markable".to_string())
        );
    }

    #[test]
    fn test_vocab_uri_roundtrip() {
        let kind = AnnotationKind::Technology;
        assert_eq!(AnnotationKind::from_type(&kind.vocab_uri()), kind);
    }

    #[test]
    fn test_token_constructor() {
        let token = Annotation::token("t1", 0, 4, "beam", "NN");
        assert_eq!(token.pos(), "NN");
        assert_eq!(token.surface(), "beam");
        assert_eq!(token.lemma(), None);
        assert_eq!(token.to_string(), "<Token t1 0-4 'beam'>");
    }

    #[test]
    fn test_surface_fallback() {
        let term = Annotation::new("term1", AnnotationKind::Term, 0, 13)
            .with_feature("text", "beam splitter");
        assert_eq!(term.surface(), "beam splitter");
    }

    #[test]
    fn test_vector_feature() {
        let mut term = Annotation::new("term1", AnnotationKind::Term, 0, 4);
        assert!(term.vector().is_none());
        term.set_vector("plen=1");
        assert_eq!(term.vector(), Some("plen=1"));
    }
}

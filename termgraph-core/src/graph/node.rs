//! Node types stored in the graph arenas

use crate::annotation::Annotation;
use crate::range::Spanned;
use smallvec::SmallVec;
use std::fmt;

/// Label marking the root of a sentence's dependency tree
pub const ROOT_LABEL: &str = "ROOT";

/// Position of a token in the graph's token arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenIdx(pub usize);

/// Position of a sentence in the graph's sentence arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SentenceIdx(pub usize);

/// Position of a chunk or term in the graph's span arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanIdx(pub usize);

/// Reference to any node, as stored in the node index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// A token node
    Token(TokenIdx),
    /// A sentence node
    Sentence(SentenceIdx),
    /// A chunk or term node
    Span(SpanIdx),
}

/// What a span node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpanKind {
    /// Noun chunk from the annotator
    #[default]
    Chunk,
    /// Candidate technical term
    Term,
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanKind::Chunk => f.write_str("chunk"),
            SpanKind::Term => f.write_str("term"),
        }
    }
}

/// Incoming dependency edge of a token
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Governor {
    /// No dependency record mentioned this token
    #[default]
    Unattached,
    /// The token heads its sentence
    Root,
    /// Governed by another token
    Edge {
        /// Dependency label
        label: String,
        /// Governing token
        token: TokenIdx,
    },
}

impl Governor {
    /// Whether this is the ROOT sentinel
    pub fn is_root(&self) -> bool {
        matches!(self, Governor::Root)
    }

    /// The governing token and label, if any
    pub fn edge(&self) -> Option<(&str, TokenIdx)> {
        match self {
            Governor::Edge { label, token } => Some((label.as_str(), *token)),
            _ => None,
        }
    }
}

/// Outgoing dependency edge of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependent {
    /// Dependency label
    pub label: String,
    /// Dependent token
    pub token: TokenIdx,
}

/// A token and its links
#[derive(Debug, Clone)]
pub struct TokenNode {
    /// Global node id, `collection:annotation`
    pub id: String,
    /// The wrapped token annotation
    pub annotation: Annotation,
    /// Previous token in document order
    pub previous: Option<TokenIdx>,
    /// Next token in document order
    pub next: Option<TokenIdx>,
    /// Containing sentence
    pub sentence: Option<SentenceIdx>,
    /// 0-based position inside the sentence
    pub sentence_position: Option<usize>,
    /// Containing chunk or term
    pub span: Option<SpanIdx>,
    /// 0-based position inside the span
    pub span_position: Option<usize>,
    /// Incoming dependency edge
    pub governor: Governor,
    /// Outgoing dependency edges, in record order
    pub dependents: SmallVec<[Dependent; 4]>,
}

impl TokenNode {
    pub(crate) fn new(id: String, annotation: Annotation) -> Self {
        Self {
            id,
            annotation,
            previous: None,
            next: None,
            sentence: None,
            sentence_position: None,
            span: None,
            span_position: None,
            governor: Governor::Unattached,
            dependents: SmallVec::new(),
        }
    }

    /// Surface text of the token
    pub fn text(&self) -> &str {
        self.annotation.surface()
    }

    /// Part-of-speech tag
    pub fn tag(&self) -> &str {
        self.annotation.pos()
    }
}

/// A sentence with the tokens and spans it contains
#[derive(Debug, Clone)]
pub struct SentenceNode {
    /// Global node id
    pub id: String,
    /// The wrapped sentence annotation
    pub annotation: Annotation,
    /// Contained tokens, in document order
    pub tokens: Vec<TokenIdx>,
    /// Contained chunks or terms, in document order
    pub spans: Vec<SpanIdx>,
}

/// A noun chunk or term with the tokens it contains
#[derive(Debug, Clone)]
pub struct SpanNode {
    /// Global node id
    pub id: String,
    /// Chunk or term
    pub kind: SpanKind,
    /// The wrapped annotation
    pub annotation: Annotation,
    /// Containing sentence
    pub sentence: Option<SentenceIdx>,
    /// Contained tokens, in document order
    pub tokens: Vec<TokenIdx>,
}

impl SpanNode {
    /// Rightmost contained token, used as the span's head
    pub fn head(&self) -> Option<TokenIdx> {
        self.tokens.last().copied()
    }
}

macro_rules! spanned_node {
    ($($node:ty),*) => {
        $(
            impl Spanned for $node {
                fn start(&self) -> usize {
                    self.annotation.start
                }

                fn end(&self) -> usize {
                    self.annotation.end
                }
            }
        )*
    };
}

spanned_node!(TokenNode, SentenceNode, SpanNode);

impl fmt::Display for TokenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NODE {} :: {}", self.id, self.annotation)
    }
}

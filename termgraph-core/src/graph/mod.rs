//! Document graph over tokens, sentences and chunks or terms
//!
//! The graph is built once per document from finalized annotations and is
//! read-only afterwards. Nodes live in three arenas addressed by
//! [`TokenIdx`], [`SentenceIdx`] and [`SpanIdx`]; every node is also reachable
//! through its global id (`collection:annotation`).
//!
//! Links kept per token:
//! - `previous` / `next` in document order
//! - the containing sentence and, if any, the containing span
//! - the governor edge and the dependent edges of the dependency parse

mod builder;
mod node;

pub use builder::{DependencyRecord, GraphInput};
pub use node::{
    Dependent, Governor, NodeRef, SentenceIdx, SentenceNode, SpanIdx, SpanKind, SpanNode,
    TokenIdx, TokenNode, ROOT_LABEL,
};

use crate::range::{indices_in_range, Spanned};
use std::collections::HashMap;
use std::ops::Index;

/// Counts describing a built graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    /// Number of token nodes
    pub tokens: usize,
    /// Number of sentence nodes
    pub sentences: usize,
    /// Number of chunk or term nodes
    pub spans: usize,
    /// Number of non-root dependency edges
    pub edges: usize,
    /// Number of tokens marked as sentence roots
    pub roots: usize,
}

/// Index over one document's annotations
#[derive(Debug, Clone)]
pub struct DocumentGraph {
    token_view: String,
    span_view: String,
    span_kind: SpanKind,
    tokens: Vec<TokenNode>,
    sentences: Vec<SentenceNode>,
    spans: Vec<SpanNode>,
    index: HashMap<String, NodeRef>,
    edge_count: usize,
}

impl DocumentGraph {
    /// Collection id of tokens and sentences
    pub fn token_view(&self) -> &str {
        &self.token_view
    }

    /// Collection id of the spans
    pub fn span_view(&self) -> &str {
        &self.span_view
    }

    /// Whether the spans are chunks or terms
    pub fn span_kind(&self) -> SpanKind {
        self.span_kind
    }

    /// All tokens in document order
    pub fn tokens(&self) -> &[TokenNode] {
        &self.tokens
    }

    /// All sentences in document order
    pub fn sentences(&self) -> &[SentenceNode] {
        &self.sentences
    }

    /// All chunks or terms in document order
    pub fn spans(&self) -> &[SpanNode] {
        &self.spans
    }

    /// Token by arena position
    pub fn token(&self, idx: TokenIdx) -> &TokenNode {
        &self.tokens[idx.0]
    }

    /// Sentence by arena position
    pub fn sentence(&self, idx: SentenceIdx) -> &SentenceNode {
        &self.sentences[idx.0]
    }

    /// Span by arena position
    pub fn span(&self, idx: SpanIdx) -> &SpanNode {
        &self.spans[idx.0]
    }

    /// Look up a node by its global id
    pub fn get_node(&self, id: &str) -> Option<NodeRef> {
        self.index.get(id).copied()
    }

    /// Look up a token by global id or by bare token annotation id
    pub fn find_token(&self, id: &str) -> Option<TokenIdx> {
        let node = match self.get_node(id) {
            Some(node) => Some(node),
            None => self.get_node(&crate::ids::node_id(&self.token_view, id)),
        };
        match node {
            Some(NodeRef::Token(idx)) => Some(idx),
            _ => None,
        }
    }

    /// Tokens with `start >= p1` and `end <= p2`, in document order
    pub fn tokens_in_range(&self, p1: usize, p2: usize) -> Vec<TokenIdx> {
        indices_in_range(&self.tokens, p1, p2)
            .into_iter()
            .map(TokenIdx)
            .collect()
    }

    /// Spans with `start >= p1` and `end <= p2`, in document order
    pub fn spans_in_range(&self, p1: usize, p2: usize) -> Vec<SpanIdx> {
        indices_in_range(&self.spans, p1, p2)
            .into_iter()
            .map(SpanIdx)
            .collect()
    }

    /// The last token fully inside `span`, if any
    ///
    /// This rightmost-token rule approximates the syntactic head.
    pub fn get_head_token(&self, span: &impl Spanned) -> Option<TokenIdx> {
        self.tokens_in_range(span.start(), span.end()).last().copied()
    }

    /// Sentence whose range contains `span`
    pub fn sentence_containing(&self, span: &impl Spanned) -> Option<SentenceIdx> {
        let candidates = self
            .sentences
            .partition_point(|s| s.annotation.start <= span.start());
        self.sentences[..candidates]
            .iter()
            .rposition(|s| s.annotation.end >= span.end())
            .map(SentenceIdx)
    }

    /// Dependency edges `(governor, dependent, label)` whose dependent lies
    /// in the given sentence, in token order
    pub fn sentence_edges(&self, sentence: SentenceIdx) -> Vec<(TokenIdx, TokenIdx, &str)> {
        self.sentences[sentence.0]
            .tokens
            .iter()
            .filter_map(|&dependent| {
                self.tokens[dependent.0]
                    .governor
                    .edge()
                    .map(|(label, governor)| (governor, dependent, label))
            })
            .collect()
    }

    /// Construction statistics
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            tokens: self.tokens.len(),
            sentences: self.sentences.len(),
            spans: self.spans.len(),
            edges: self.edge_count,
            roots: self.tokens.iter().filter(|t| t.governor.is_root()).count(),
        }
    }
}

impl Index<TokenIdx> for DocumentGraph {
    type Output = TokenNode;

    fn index(&self, idx: TokenIdx) -> &TokenNode {
        &self.tokens[idx.0]
    }
}

impl Index<SentenceIdx> for DocumentGraph {
    type Output = SentenceNode;

    fn index(&self, idx: SentenceIdx) -> &SentenceNode {
        &self.sentences[idx.0]
    }
}

impl Index<SpanIdx> for DocumentGraph {
    type Output = SpanNode;

    fn index(&self, idx: SpanIdx) -> &SpanNode {
        &self.spans[idx.0]
    }
}

//! Graph construction: node creation, dependency wiring, containment

use super::node::{
    Dependent, Governor, NodeRef, SentenceIdx, SentenceNode, SpanIdx, SpanKind, SpanNode,
    TokenIdx, TokenNode, ROOT_LABEL,
};
use super::DocumentGraph;
use crate::annotation::{Annotation, AnnotationKind};
use crate::error::{CoreError, Result};
use crate::ids::node_id;
use crate::range::{check_sorted, indices_in_range};
use std::collections::HashMap;
use tracing::debug;

/// One labelled dependency edge as delivered by the annotator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    /// Id of the dependency annotation
    pub id: String,
    /// Governor node id, qualified (`tokens:t3`) or bare (`t3`)
    pub governor: String,
    /// Dependent node id, qualified or bare
    pub dependent: String,
    /// Dependency label, `ROOT` for sentence roots
    pub label: String,
}

impl DependencyRecord {
    /// Create a record
    pub fn new(
        id: impl Into<String>,
        governor: impl Into<String>,
        dependent: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            governor: governor.into(),
            dependent: dependent.into(),
            label: label.into(),
        }
    }

    /// Read a record from a Dependency annotation
    ///
    /// DependencyStructure annotations and dependencies missing one of the
    /// `governor`, `dependent` or `label` features yield `None`.
    pub fn from_annotation(annotation: &Annotation) -> Option<Self> {
        if annotation.kind != AnnotationKind::Dependency {
            return None;
        }
        Some(Self::new(
            annotation.id.clone(),
            annotation.feature("governor")?,
            annotation.feature("dependent")?,
            annotation.feature("label")?,
        ))
    }

    /// Whether this record marks a sentence root
    pub fn is_root(&self) -> bool {
        self.label == ROOT_LABEL
    }
}

/// Everything needed to build one document graph
#[derive(Debug, Clone, Default)]
pub struct GraphInput {
    /// Collection id of tokens and sentences
    pub token_view: String,
    /// Token annotations, sorted by start
    pub tokens: Vec<Annotation>,
    /// Sentence annotations, sorted by start
    pub sentences: Vec<Annotation>,
    /// Collection id of the chunks or terms
    pub span_view: String,
    /// Whether the spans are chunks or terms
    pub span_kind: SpanKind,
    /// Chunk or term annotations, sorted by start
    pub spans: Vec<Annotation>,
    /// Dependency edges
    pub dependencies: Vec<DependencyRecord>,
}

impl GraphInput {
    /// Start an input whose tokens and sentences live in `token_view`
    pub fn new(token_view: impl Into<String>) -> Self {
        Self {
            token_view: token_view.into(),
            ..Default::default()
        }
    }

    /// Set the token annotations
    pub fn with_tokens(mut self, tokens: Vec<Annotation>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Set the sentence annotations
    pub fn with_sentences(mut self, sentences: Vec<Annotation>) -> Self {
        self.sentences = sentences;
        self
    }

    /// Set the chunk or term annotations and their collection
    pub fn with_spans(
        mut self,
        span_view: impl Into<String>,
        kind: SpanKind,
        spans: Vec<Annotation>,
    ) -> Self {
        self.span_view = span_view.into();
        self.span_kind = kind;
        self.spans = spans;
        self
    }

    /// Set the dependency records
    pub fn with_dependencies(mut self, dependencies: Vec<DependencyRecord>) -> Self {
        self.dependencies = dependencies;
        self
    }

    fn validate(&self) -> Result<()> {
        for (collection, annotations) in [
            ("tokens", &self.tokens),
            ("sentences", &self.sentences),
            ("spans", &self.spans),
        ] {
            if let Some(bad) = annotations.iter().find(|a| a.end < a.start) {
                return Err(CoreError::InvalidSpan {
                    id: bad.id.clone(),
                    start: bad.start,
                    end: bad.end,
                });
            }
            check_sorted(annotations)
                .map_err(|position| CoreError::UnsortedSpans { collection, position })?;
        }
        Ok(())
    }
}

impl DocumentGraph {
    /// Build a graph in three ordered phases
    pub fn build(input: GraphInput) -> Result<Self> {
        input.validate()?;

        let GraphInput {
            token_view,
            tokens,
            sentences,
            span_view,
            span_kind,
            spans,
            dependencies,
        } = input;

        let mut graph = DocumentGraph {
            token_view,
            span_view,
            span_kind,
            tokens: Vec::with_capacity(tokens.len()),
            sentences: Vec::with_capacity(sentences.len()),
            spans: Vec::with_capacity(spans.len()),
            index: HashMap::with_capacity(tokens.len() + sentences.len() + spans.len()),
            edge_count: 0,
        };

        graph.add_markables(tokens, sentences, spans)?;
        graph.add_dependencies(&dependencies)?;
        graph.connect();

        debug!(
            "Built {} graph: {} tokens, {} sentences, {} spans, {} edges",
            graph.span_kind,
            graph.tokens.len(),
            graph.sentences.len(),
            graph.spans.len(),
            graph.edge_count
        );
        Ok(graph)
    }

    fn add_markables(
        &mut self,
        tokens: Vec<Annotation>,
        sentences: Vec<Annotation>,
        spans: Vec<Annotation>,
    ) -> Result<()> {
        for annotation in tokens {
            let idx = TokenIdx(self.tokens.len());
            let id = node_id(&self.token_view, &annotation.id);
            self.register(&id, NodeRef::Token(idx))?;
            let mut node = TokenNode::new(id, annotation);
            if let Some(last) = idx.0.checked_sub(1).map(TokenIdx) {
                self.tokens[last.0].next = Some(idx);
                node.previous = Some(last);
            }
            self.tokens.push(node);
        }

        for annotation in sentences {
            let idx = SentenceIdx(self.sentences.len());
            let id = node_id(&self.token_view, &annotation.id);
            self.register(&id, NodeRef::Sentence(idx))?;
            self.sentences.push(SentenceNode {
                id,
                annotation,
                tokens: Vec::new(),
                spans: Vec::new(),
            });
        }

        for annotation in spans {
            let idx = SpanIdx(self.spans.len());
            let id = node_id(&self.span_view, &annotation.id);
            self.register(&id, NodeRef::Span(idx))?;
            self.spans.push(SpanNode {
                id,
                kind: self.span_kind,
                annotation,
                sentence: None,
                tokens: Vec::new(),
            });
        }
        Ok(())
    }

    fn register(&mut self, id: &str, node: NodeRef) -> Result<()> {
        if self.index.insert(id.to_string(), node).is_some() {
            return Err(CoreError::DuplicateNode { id: id.to_string() });
        }
        Ok(())
    }

    fn add_dependencies(&mut self, dependencies: &[DependencyRecord]) -> Result<()> {
        for record in dependencies {
            let dependent = self.resolve_token(&record.dependent, record)?;
            if record.is_root() {
                self.tokens[dependent.0].governor = Governor::Root;
                continue;
            }
            let governor = self.resolve_token(&record.governor, record)?;
            self.tokens[dependent.0].governor = Governor::Edge {
                label: record.label.clone(),
                token: governor,
            };
            self.tokens[governor.0].dependents.push(Dependent {
                label: record.label.clone(),
                token: dependent,
            });
            self.edge_count += 1;
        }
        Ok(())
    }

    fn resolve_token(&self, reference: &str, record: &DependencyRecord) -> Result<TokenIdx> {
        let id = if reference.contains(':') {
            reference.to_string()
        } else {
            node_id(&self.token_view, reference)
        };
        match self.index.get(&id) {
            Some(NodeRef::Token(idx)) => Ok(*idx),
            Some(_) => Err(CoreError::NotAToken {
                id,
                dependency: record.id.clone(),
            }),
            None => Err(CoreError::UnresolvedNode {
                id,
                dependency: record.id.clone(),
            }),
        }
    }

    fn connect(&mut self) {
        self.connect_sentences_and_tokens();
        self.connect_sentences_and_spans();
        self.connect_spans_and_tokens();
    }

    fn connect_sentences_and_tokens(&mut self) {
        for s in 0..self.sentences.len() {
            let (start, end) = {
                let a = &self.sentences[s].annotation;
                (a.start, a.end)
            };
            let contained = indices_in_range(&self.tokens, start, end);
            for (position, &t) in contained.iter().enumerate() {
                let token = &mut self.tokens[t];
                token.sentence = Some(SentenceIdx(s));
                token.sentence_position = Some(position);
            }
            self.sentences[s].tokens = contained.into_iter().map(TokenIdx).collect();
        }
    }

    fn connect_sentences_and_spans(&mut self) {
        for s in 0..self.sentences.len() {
            let (start, end) = {
                let a = &self.sentences[s].annotation;
                (a.start, a.end)
            };
            let contained = indices_in_range(&self.spans, start, end);
            for &i in &contained {
                self.spans[i].sentence = Some(SentenceIdx(s));
            }
            self.sentences[s].spans = contained.into_iter().map(SpanIdx).collect();
        }
    }

    fn connect_spans_and_tokens(&mut self) {
        for i in 0..self.spans.len() {
            let (start, end) = {
                let a = &self.spans[i].annotation;
                (a.start, a.end)
            };
            let contained = indices_in_range(&self.tokens, start, end);
            for (position, &t) in contained.iter().enumerate() {
                let token = &mut self.tokens[t];
                token.span = Some(SpanIdx(i));
                token.span_position = Some(position);
            }
            self.spans[i].tokens = contained.into_iter().map(TokenIdx).collect();
        }
    }
}

//! Pairing of relation verbs, terms and states through dependency paths

use crate::annotation::Annotation;
use crate::graph::{DocumentGraph, SentenceIdx, SpanKind, TokenIdx};
use crate::paths::{path_labels, PathStep, SentenceGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, trace};

/// What kinds of participants a triple connects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairKind {
    /// Relation verb to term
    #[serde(rename = "REL-TRM")]
    RelationTerm,
    /// Relation verb to state
    #[serde(rename = "REL-STA")]
    RelationState,
    /// Term to state
    #[serde(rename = "TRM-STA")]
    TermState,
}

impl PairKind {
    /// Tag used in reports
    pub fn tag(&self) -> &'static str {
        match self {
            PairKind::RelationTerm => "REL-TRM",
            PairKind::RelationState => "REL-STA",
            PairKind::TermState => "TRM-STA",
        }
    }
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Path length limits for accepting a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationPolicy {
    /// Longest accepted relation to term or state path
    pub max_relation_distance: usize,
    /// Shortest accepted term to state path
    pub min_term_state_distance: usize,
    /// Longest accepted term to state path
    pub max_term_state_distance: usize,
}

impl Default for RelationPolicy {
    fn default() -> Self {
        Self {
            max_relation_distance: 2,
            min_term_state_distance: 1,
            max_term_state_distance: 5,
        }
    }
}

impl RelationPolicy {
    fn accepts(&self, kind: PairKind, length: usize) -> bool {
        match kind {
            PairKind::RelationTerm | PairKind::RelationState => {
                length <= self.max_relation_distance
            }
            PairKind::TermState => {
                length >= self.min_term_state_distance && length <= self.max_term_state_distance
            }
        }
    }
}

/// Two participants joined by a dependency path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationTriple {
    /// Pair type
    pub kind: PairKind,
    /// Annotation id of the source head token
    pub source_id: String,
    /// Annotation id of the target head token
    pub target_id: String,
    /// Labels along the path
    pub path_labels: Vec<String>,
    /// Text of the source participant
    pub source_text: String,
    /// Text of the target participant
    pub target_text: String,
    /// Full path from the source head
    #[serde(skip)]
    pub path: Vec<PathStep<TokenIdx>>,
    /// Source head token
    #[serde(skip)]
    pub source_token: TokenIdx,
    /// Target head token
    #[serde(skip)]
    pub target_token: TokenIdx,
}

impl RelationTriple {
    /// Path rendered as `source --label--> token ...`
    pub fn describe_path(&self, graph: &DocumentGraph) -> String {
        let mut parts = vec![self.source_text.clone()];
        for step in &self.path {
            parts.push(format!("{} {}", step.arrow(), graph[step.node].text()));
        }
        parts.join(" ")
    }
}

/// Relation triples found in one sentence
#[derive(Debug, Clone)]
pub struct SentenceRelations {
    /// The sentence
    pub sentence: SentenceIdx,
    /// Accepted pairs, relation pairs first
    pub triples: Vec<RelationTriple>,
    /// Dependency graph of the sentence
    pub graph: SentenceGraph<TokenIdx>,
}

#[derive(Debug, Clone, Copy)]
struct Participant<'a> {
    annotation: &'a Annotation,
    head: TokenIdx,
}

impl Participant<'_> {
    fn text(&self) -> &str {
        self.annotation.surface()
    }
}

/// Finds relation triples over a term graph
#[derive(Debug, Clone)]
pub struct RelationFinder<'g> {
    graph: &'g DocumentGraph,
    policy: RelationPolicy,
    stoplist: HashSet<String>,
}

impl<'g> RelationFinder<'g> {
    /// Create a finder over a graph whose spans are terms
    pub fn new(graph: &'g DocumentGraph) -> Self {
        if graph.span_kind() != SpanKind::Term {
            debug!("relation finder built over a {} graph", graph.span_kind());
        }
        Self {
            graph,
            policy: RelationPolicy::default(),
            stoplist: HashSet::new(),
        }
    }

    /// Use the given distance limits
    pub fn with_policy(mut self, policy: RelationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ignore terms whose lower-cased text is listed
    pub fn with_stoplist(mut self, stoplist: HashSet<String>) -> Self {
        self.stoplist = stoplist;
        self
    }

    /// Triples of every sentence holding a relation, a term and a state
    ///
    /// Sentences without any accepted pair are left out.
    pub fn find_all(
        &self,
        relations: &[Annotation],
        states: &[Annotation],
    ) -> Vec<SentenceRelations> {
        let sentence_count = self.graph.sentences().len();
        let mut by_sentence: Vec<[Vec<Participant<'_>>; 3]> =
            (0..sentence_count).map(|_| Default::default()).collect();

        let terms = self
            .graph
            .spans()
            .iter()
            .map(|span| &span.annotation)
            .filter(|term| !self.stoplist.contains(&term.surface().to_lowercase()));

        for (slot, annotations) in [
            (0, relations.iter().collect::<Vec<_>>()),
            (1, terms.collect()),
            (2, states.iter().collect()),
        ] {
            for annotation in annotations {
                let (Some(sentence), Some(head)) = (
                    self.graph.sentence_containing(annotation),
                    self.graph.get_head_token(annotation),
                ) else {
                    trace!("no sentence or head for {annotation}");
                    continue;
                };
                by_sentence[sentence.0][slot].push(Participant { annotation, head });
            }
        }

        let mut found = Vec::new();
        for (s, [rels, terms, states]) in by_sentence.iter().enumerate() {
            if rels.is_empty() || terms.is_empty() || states.is_empty() {
                continue;
            }
            let sentence = SentenceIdx(s);
            let graph = SentenceGraph::for_sentence(self.graph, sentence);
            let triples = self.collect_pairs(&graph, rels, terms, states);
            if triples.is_empty() {
                continue;
            }
            debug!("sentence {s}: {} relation triples", triples.len());
            found.push(SentenceRelations {
                sentence,
                triples,
                graph,
            });
        }
        found
    }

    fn collect_pairs(
        &self,
        graph: &SentenceGraph<TokenIdx>,
        rels: &[Participant<'_>],
        terms: &[Participant<'_>],
        states: &[Participant<'_>],
    ) -> Vec<RelationTriple> {
        let mut triples = Vec::new();
        for rel in rels {
            for term in terms {
                self.try_pair(graph, PairKind::RelationTerm, rel, term, &mut triples);
            }
            for state in states {
                self.try_pair(graph, PairKind::RelationState, rel, state, &mut triples);
            }
        }
        for term in terms {
            for state in states {
                self.try_pair(graph, PairKind::TermState, term, state, &mut triples);
            }
        }
        triples
    }

    fn try_pair(
        &self,
        graph: &SentenceGraph<TokenIdx>,
        kind: PairKind,
        source: &Participant<'_>,
        target: &Participant<'_>,
        triples: &mut Vec<RelationTriple>,
    ) {
        let Some(path) = graph.find_path(source.head, target.head) else {
            return;
        };
        if !self.policy.accepts(kind, path.len()) {
            return;
        }
        triples.push(RelationTriple {
            kind,
            source_id: self.graph[source.head].annotation.id.clone(),
            target_id: self.graph[target.head].annotation.id.clone(),
            path_labels: path_labels(&path),
            source_text: source.text().to_string(),
            target_text: target.text().to_string(),
            path,
            source_token: source.head,
            target_token: target.head,
        });
    }
}

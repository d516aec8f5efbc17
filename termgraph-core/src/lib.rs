//! Annotation graph and relation-path engine for technical term extraction
//!
//! The crate indexes already-annotated text (tokens, sentences, noun chunks
//! or terms, dependency edges) in a [`DocumentGraph`] and answers the
//! questions term extraction needs:
//! - which tokens and spans lie inside a character range ([`range`])
//! - which suffix of a chunk forms a term ([`TermPattern`])
//! - what the context of a term looks like ([`FeatureExtractor`])
//! - how relation verbs, terms and states connect through the dependency
//!   parse ([`SentenceGraph`], [`RelationFinder`])
//!
//! # Example
//!
//! ```rust
//! use termgraph_core::{
//!     Annotation, AnnotationKind, DocumentGraph, FeatureExtractor, GraphInput, SpanIdx,
//!     SpanKind,
//! };
//!
//! let tokens = vec![
//!     Annotation::token("t1", 0, 3, "the", "DT"),
//!     Annotation::token("t2", 4, 8, "beam", "NN"),
//!     Annotation::token("t3", 9, 17, "splitter", "NN"),
//! ];
//! let input = GraphInput::new("tokens")
//!     .with_tokens(tokens)
//!     .with_sentences(vec![Annotation::new("s1", AnnotationKind::Sentence, 0, 17)])
//!     .with_spans(
//!         "terms",
//!         SpanKind::Term,
//!         vec![Annotation::new("term1", AnnotationKind::Term, 9, 17)],
//!     );
//! let graph = DocumentGraph::build(input).unwrap();
//!
//! let features = FeatureExtractor::new(&graph).extract(SpanIdx(0)).unwrap();
//! assert!(features.render().starts_with("sentence_loc=2 prev_n1=beam"));
//! ```

pub mod annotation;
pub mod error;
pub mod features;
pub mod graph;
pub mod ids;
pub mod lexicon;
pub mod matcher;
pub mod paths;
pub mod range;
pub mod relations;

pub use annotation::{Annotation, AnnotationKind};
pub use error::{CoreError, Result};
pub use features::{FeatureExtractor, FeatureValue, FeatureVector};
pub use graph::{
    DependencyRecord, DocumentGraph, Governor, GraphInput, GraphStats, NodeRef, SentenceIdx,
    SpanIdx, SpanKind, TokenIdx,
};
pub use ids::IdentifierAllocator;
pub use lexicon::{Lexicon, TaggedTokens};
pub use matcher::{PatternElement, TermPattern};
pub use paths::{Direction, PathStep, SentenceGraph};
pub use range::{RangeIndex, Spanned};
pub use relations::{PairKind, RelationFinder, RelationPolicy, RelationTriple, SentenceRelations};

//! Document orchestration for technical term extraction
//!
//! This crate reads LIF documents, runs the `termgraph-core` graph over
//! them and writes terms, feature vectors, technologies, relation reports
//! and their co-occurrence tables back out, one document at a time or in
//! parallel batches.

#![warn(missing_docs)]

pub mod batch;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod lexicons;
pub mod lif;
pub mod processor;
pub mod report;
pub mod vectors;

// Re-export key types
pub use batch::{run_batch, BatchOutcome};
pub use classify::{Label, ListClassifier, TermClassifier};
pub use config::EngineConfig;
pub use context::{ContextKind, ContextOrder, ContextTables};
pub use error::{EngineError, Result};
pub use lexicons::load_lexicon;
pub use lif::{Lif, LifAnnotation, View};
pub use processor::{DocumentProcessor, DocumentRelations, SentenceReport, TermSummary};
pub use report::ReportFormat;
pub use vectors::{LabelledLine, TermCounts, VectorLine};

// Re-export from core for convenience
pub use termgraph_core::{FeatureVector, Lexicon, PairKind, RelationPolicy, TermPattern};

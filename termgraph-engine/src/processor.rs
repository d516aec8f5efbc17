//! Per-document processing: term extraction and relation mining

use crate::classify::{Label, ListClassifier, TermClassifier};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::lexicons::load_lexicon;
use crate::lif::{graph_input, CharIndex, Lif, View};
use serde::Serialize;
use std::path::Path;
use termgraph_core::{
    Annotation, AnnotationKind, DocumentGraph, FeatureExtractor, GraphStats,
    IdentifierAllocator, Lexicon, PairKind, RelationFinder, SentenceRelations, SpanKind,
    TermPattern, TokenIdx,
};
use tracing::{debug, info};

/// Producer name written into view metadata
pub const PRODUCER: &str = concat!("termgraph ", env!("CARGO_PKG_VERSION"));

/// What term extraction did to one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermSummary {
    /// Chunks examined
    pub chunks: usize,
    /// Terms added
    pub terms: usize,
    /// Technologies added
    pub technologies: usize,
    /// Statistics of the term graph
    #[serde(skip)]
    pub stats: GraphStats,
}

/// One accepted pair in a relation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairReport {
    /// Pair type
    pub kind: PairKind,
    /// Id of the source head token
    pub source_id: String,
    /// Id of the target head token
    pub target_id: String,
    /// Source participant text
    pub source_text: String,
    /// Target participant text
    pub target_text: String,
    /// Dependency labels along the path
    pub labels: Vec<String>,
    /// Path rendered with token texts
    pub path: String,
}

/// A token of a reported sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenReport {
    /// Token text
    pub text: String,
    /// Part-of-speech tag
    pub pos: String,
}

/// A forward dependency edge of a reported sentence
///
/// Tokens are written as lower-cased text joined to their 1-based position
/// in the sentence, e.g. `splitter_3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    /// Governor token
    pub governor: String,
    /// Dependency label
    pub label: String,
    /// Dependent token
    pub dependent: String,
}

/// Relations found in one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceReport {
    /// Sentence text, trimmed
    pub text: String,
    /// Accepted pairs, relation pairs first
    pub pairs: Vec<PairReport>,
    /// Tokens of the sentence
    pub tokens: Vec<TokenReport>,
    /// Forward dependency edges of the sentence
    pub dependencies: Vec<DependencyReport>,
}

/// Relations found in one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRelations {
    /// Document name
    pub name: String,
    /// Sentences with at least one accepted pair
    pub sentences: Vec<SentenceReport>,
}

/// Runs term extraction and relation mining over LIF documents
///
/// A processor is shared by the batch workers; per-document state such as
/// the identifier allocator lives inside each call.
pub struct DocumentProcessor {
    config: EngineConfig,
    pattern: TermPattern,
    lexicon: Lexicon,
    classifier: Option<Box<dyn TermClassifier>>,
}

impl std::fmt::Debug for DocumentProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentProcessor")
            .field("config", &self.config)
            .field("classifier", &self.classifier.is_some())
            .finish_non_exhaustive()
    }
}

impl DocumentProcessor {
    /// Create a processor, loading the configured pattern, lexicons and lists
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let pattern = config.term_pattern()?;
        let lexicon = load_lexicon(&config)?;
        let classifier: Option<Box<dyn TermClassifier>> = if config.classifier.enabled {
            let resolve = |paths: &[std::path::PathBuf]| -> Vec<std::path::PathBuf> {
                paths.iter().map(|p| config.resolve(p)).collect()
            };
            Some(Box::new(ListClassifier::from_files(
                &resolve(&config.classifier.technologies),
                &resolve(&config.classifier.labels),
            )?))
        } else {
            None
        };
        Ok(Self {
            config,
            pattern,
            lexicon,
            classifier,
        })
    }

    /// Create a processor with the default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    /// Use a custom classifier
    pub fn with_classifier(mut self, classifier: Box<dyn TermClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Skip classification
    pub fn without_classifier(mut self) -> Self {
        self.classifier = None;
        self
    }

    /// Replace the lexicon
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// The configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Add terms, feature vectors and technologies to a document
    ///
    /// Terms are the matched suffixes of the noun chunks. Any existing terms
    /// and technologies views are replaced.
    pub fn process_terms(&self, lif: &mut Lif) -> Result<TermSummary> {
        let views = &self.config.views;
        let mut ids = IdentifierAllocator::new();
        let input = graph_input(lif, views, &views.chunks, SpanKind::Chunk)?;
        let chunk_graph = DocumentGraph::build(input.clone())?;
        let index = lif.char_index();

        let mut terms = Vec::new();
        for chunk in chunk_graph.spans() {
            let tokens: Vec<(&str, &str, usize, usize)> = chunk
                .tokens
                .iter()
                .map(|&t| {
                    let node = &chunk_graph[t];
                    (node.text(), node.tag(), node.annotation.start, node.annotation.end)
                })
                .collect();
            let Some((start, end)) = self.pattern.match_span(&tokens) else {
                continue;
            };
            let text = slice(&index, &chunk.id, start, end)?;
            terms.push(
                Annotation::new(ids.next_id("term"), AnnotationKind::Term, start, end)
                    .with_text(text)
                    .with_feature("text", text)
                    .with_feature("chunk_id", chunk.annotation.id.clone()),
            );
        }

        let term_graph = DocumentGraph::build(input.with_spans(
            views.terms.clone(),
            SpanKind::Term,
            terms.clone(),
        ))?;
        let extractor = FeatureExtractor::new(&term_graph);

        let mut technologies = Vec::new();
        for (span, features) in extractor.extract_all() {
            let term = &mut terms[span.0];
            if self.config.output.vectors {
                term.set_vector(features.render());
            }
            let Some(classifier) = &self.classifier else {
                continue;
            };
            if classifier.classify(&term.text, &features) == Label::Technology {
                technologies.push(
                    Annotation::new(
                        ids.next_id("tech"),
                        AnnotationKind::Technology,
                        term.start,
                        term.end,
                    )
                    .with_text(term.text.clone())
                    .with_feature("text", term.text.clone()),
                );
            }
        }

        let mut view = View::new(views.terms.clone());
        view.declare(&AnnotationKind::Term, PRODUCER);
        terms.iter().for_each(|term| view.push(term));
        lif.set_view(view);

        if self.classifier.is_some() {
            let mut view = View::new(views.technologies.clone());
            view.declare(&AnnotationKind::Technology, PRODUCER);
            technologies.iter().for_each(|tech| view.push(tech));
            lif.set_view(view);
        }

        let summary = TermSummary {
            chunks: chunk_graph.spans().len(),
            terms: terms.len(),
            technologies: technologies.len(),
            stats: term_graph.stats(),
        };
        debug!(
            "{} chunks, {} terms, {} technologies",
            summary.chunks, summary.terms, summary.technologies
        );
        Ok(summary)
    }

    /// Relation triples of a document that already has a terms view
    pub fn mine_relations(&self, lif: &Lif, name: &str) -> Result<DocumentRelations> {
        let views = &self.config.views;
        let mut ids = IdentifierAllocator::new();
        let graph = DocumentGraph::build(graph_input(lif, views, &views.terms, SpanKind::Term)?)?;
        let tokens: Vec<Annotation> = graph.tokens().iter().map(|t| t.annotation.clone()).collect();
        let tagged = self.lexicon.tag_tokens(&tokens, &mut ids);
        debug!(
            "{name}: {} states, {} relation verbs",
            tagged.states.len(),
            tagged.relations.len()
        );

        let finder = RelationFinder::new(&graph)
            .with_policy(self.config.relations)
            .with_stoplist(self.lexicon.stoplist.clone());
        let index = lif.char_index();
        let sentences = finder
            .find_all(&tagged.relations, &tagged.states)
            .iter()
            .map(|found| sentence_report(&graph, &index, found))
            .collect::<Result<Vec<_>>>()?;
        info!("{name}: {} sentences with relations", sentences.len());

        Ok(DocumentRelations {
            name: name.to_string(),
            sentences,
        })
    }

    /// Extract terms from a file, writing the result to `output`
    pub fn process_terms_file(&self, input: &Path, output: &Path) -> Result<TermSummary> {
        let mut lif = Lif::from_file(input)?;
        let summary = self.process_terms(&mut lif)?;
        lif.write_file(output, self.config.output.pretty)?;
        debug!("{} -> {}", input.display(), output.display());
        Ok(summary)
    }

    /// Mine relations from a file, naming the report after the path
    pub fn mine_relations_file(&self, input: &Path) -> Result<DocumentRelations> {
        let lif = Lif::from_file(input)?;
        self.mine_relations(&lif, &input.display().to_string())
    }
}

fn slice<'t>(index: &CharIndex<'t>, id: &str, start: usize, end: usize) -> Result<&'t str> {
    index
        .slice(start, end)
        .ok_or_else(|| EngineError::InvalidOffsets {
            id: id.to_string(),
            start,
            end,
            length: index.len(),
        })
}

fn sentence_report(
    graph: &DocumentGraph,
    index: &CharIndex<'_>,
    found: &SentenceRelations,
) -> Result<SentenceReport> {
    let sentence = &graph[found.sentence];
    let text = slice(
        index,
        &sentence.id,
        sentence.annotation.start,
        sentence.annotation.end,
    )?;

    let pairs = found
        .triples
        .iter()
        .map(|triple| PairReport {
            kind: triple.kind,
            source_id: triple.source_id.clone(),
            target_id: triple.target_id.clone(),
            source_text: triple.source_text.clone(),
            target_text: triple.target_text.clone(),
            labels: triple.path_labels.clone(),
            path: triple.describe_path(graph),
        })
        .collect();

    let tokens = sentence
        .tokens
        .iter()
        .map(|&t| TokenReport {
            text: graph[t].text().to_string(),
            pos: graph[t].tag().to_string(),
        })
        .collect();

    let numbered = |t: TokenIdx| {
        let node = &graph[t];
        let position = node.sentence_position.map_or(0, |p| p + 1);
        format!("{}_{position}", node.text().to_lowercase())
    };
    let dependencies = found
        .graph
        .forward_edges()
        .iter()
        .map(|(governor, dependent, label)| DependencyReport {
            governor: numbered(*governor),
            label: label.clone(),
            dependent: numbered(*dependent),
        })
        .collect();

    Ok(SentenceReport {
        text: text.trim().to_string(),
        pairs,
        tokens,
        dependencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lif::LifAnnotation;
    use serde_json::json;
    use std::collections::HashSet;
    use termgraph_core::FeatureVector;

    /// "The beam splitter divides polarized light."
    fn sample_lif() -> Lif {
        let text = "The beam splitter divides polarized light.";
        let mut lif = Lif::new(text);
        let words = [
            ("The", "DT", "the", 0, 3),
            ("beam", "NN", "beam", 4, 8),
            ("splitter", "NN", "splitter", 9, 17),
            ("divides", "VBZ", "divide", 18, 25),
            ("polarized", "JJ", "polarized", 26, 35),
            ("light", "NN", "light", 36, 41),
            (".", ".", ".", 41, 42),
        ];
        let mut tokens = View::new("tokens");
        for (i, (word, pos, lemma, start, end)) in words.into_iter().enumerate() {
            tokens.push(
                &Annotation::token(format!("t{}", i + 1), start, end, word, pos)
                    .with_feature("lemma", lemma),
            );
        }
        tokens.push(&Annotation::new("s1", AnnotationKind::Sentence, 0, 42));

        let mut chunks = View::new("chunks");
        chunks.push(&Annotation::new("nc1", AnnotationKind::NounChunk, 0, 17));
        chunks.push(&Annotation::new("nc2", AnnotationKind::NounChunk, 26, 41));

        let mut deps = View::new("dependencies");
        for (i, (gov, dep, label)) in [
            ("t4", "t4", "ROOT"),
            ("t3", "t1", "det"),
            ("t3", "t2", "compound"),
            ("t4", "t3", "nsubj"),
            ("t6", "t5", "amod"),
            ("t4", "t6", "dobj"),
            ("t4", "t7", "punct"),
        ]
        .into_iter()
        .enumerate()
        {
            deps.annotations.push(LifAnnotation {
                id: format!("dep{}", i + 1),
                type_uri: AnnotationKind::Dependency.vocab_uri(),
                start: None,
                end: None,
                target: None,
                features: json!({
                    "governor": format!("tokens:{gov}"),
                    "dependent": format!("tokens:{dep}"),
                    "label": label,
                })
                .as_object()
                .cloned()
                .unwrap_or_default(),
            });
        }

        lif.set_view(tokens);
        lif.set_view(chunks);
        lif.set_view(deps);
        lif
    }

    struct EverythingIsTech;

    impl TermClassifier for EverythingIsTech {
        fn classify(&self, _term: &str, _features: &FeatureVector) -> Label {
            Label::Technology
        }
    }

    #[test]
    fn test_process_terms() {
        let processor = DocumentProcessor::with_defaults().unwrap();
        let mut lif = sample_lif();
        let summary = processor.process_terms(&mut lif).unwrap();
        assert_eq!(summary.chunks, 2);
        assert_eq!(summary.terms, 2);
        assert_eq!(summary.technologies, 0);
        assert!(lif.view("technologies").is_none());

        let terms = lif.annotations("terms").unwrap();
        assert_eq!(terms[0].id, "term1");
        assert_eq!(terms[0].text, "beam splitter");
        assert_eq!(terms[0].feature("chunk_id"), Some("nc1"));
        assert_eq!(terms[1].text, "polarized light");
        let vector = terms[0].vector().unwrap();
        assert!(vector.starts_with("sentence_loc=1 "));
        assert!(vector.contains(" first_word=beam last_word=splitter suffix3=ter "));
        assert!(vector.ends_with("dep_nsubj=divides"));
    }

    #[test]
    fn test_process_terms_is_repeatable() {
        let processor = DocumentProcessor::with_defaults().unwrap();
        let mut lif = sample_lif();
        processor.process_terms(&mut lif).unwrap();
        let first = lif.clone();
        processor.process_terms(&mut lif).unwrap();
        assert_eq!(lif, first);
    }

    #[test]
    fn test_technologies_view() {
        let processor = DocumentProcessor::with_defaults()
            .unwrap()
            .with_classifier(Box::new(EverythingIsTech));
        let mut lif = sample_lif();
        let summary = processor.process_terms(&mut lif).unwrap();
        assert_eq!(summary.technologies, 2);
        let techs = lif.annotations("technologies").unwrap();
        assert_eq!(techs[0].id, "tech1");
        assert_eq!(techs[0].kind, AnnotationKind::Technology);
        assert_eq!((techs[1].start, techs[1].end), (26, 41));
    }

    #[test]
    fn test_missing_chunks_view() {
        let processor = DocumentProcessor::with_defaults().unwrap();
        let mut lif = sample_lif();
        lif.views.retain(|v| v.id != "chunks");
        assert!(matches!(
            processor.process_terms(&mut lif),
            Err(EngineError::MissingView { .. })
        ));
    }

    #[test]
    fn test_mine_relations() {
        let lexicon = Lexicon::new()
            .with_states(HashSet::from(["polarized".to_string()]))
            .with_verbs(HashSet::from(["divide".to_string()]));
        let processor = DocumentProcessor::with_defaults()
            .unwrap()
            .with_lexicon(lexicon);
        let mut lif = sample_lif();
        processor.process_terms(&mut lif).unwrap();

        let relations = processor.mine_relations(&lif, "sample").unwrap();
        assert_eq!(relations.sentences.len(), 1);
        let report = &relations.sentences[0];
        assert_eq!(report.text, "The beam splitter divides polarized light.");
        assert_eq!(report.tokens[1].text, "beam");

        let first = &report.pairs[0];
        assert_eq!(first.kind, PairKind::RelationTerm);
        assert_eq!(first.source_id, "t4");
        assert_eq!(first.target_id, "t3");
        assert_eq!(first.labels, vec!["nsubj"]);
        assert_eq!(first.path, "divides --nsubj--> splitter");
        assert!(report
            .dependencies
            .iter()
            .any(|d| d.governor == "divides_4" && d.label == "nsubj" && d.dependent == "splitter_3"));
    }

    #[test]
    fn test_no_relations_without_lexicon() {
        let processor = DocumentProcessor::with_defaults().unwrap();
        let mut lif = sample_lif();
        processor.process_terms(&mut lif).unwrap();
        let relations = processor.mine_relations(&lif, "sample").unwrap();
        assert!(relations.sentences.is_empty());
    }
}

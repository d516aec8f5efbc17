//! Structural invariants of built document graphs

use std::collections::HashSet;
use termgraph_core::*;

const SENTENCE: [(&str, &str, usize, &str); 7] = [
    // word, tag, governor position in sentence, label
    ("the", "DT", 2, "det"),
    ("beam", "NN", 2, "compound"),
    ("splitter", "NN", 3, "nsubj"),
    ("divides", "VBZ", 3, "ROOT"),
    ("polarized", "JJ", 5, "amod"),
    ("light", "NN", 3, "dobj"),
    (".", ".", 3, "punct"),
];

/// A document repeating one parsed sentence `n` times
fn document(n: usize, kind: SpanKind) -> GraphInput {
    let mut tokens = Vec::new();
    let mut sentences = Vec::new();
    let mut spans = Vec::new();
    let mut deps = Vec::new();
    let mut offset = 0;

    for s in 0..n {
        let sentence_start = offset;
        let first = tokens.len();
        for (word, tag, _, _) in SENTENCE {
            let id = format!("t{}", tokens.len() + 1);
            tokens.push(Annotation::token(id, offset, offset + word.len(), word, tag));
            offset += word.len() + 1;
        }
        for (i, (_, _, governor, label)) in SENTENCE.iter().enumerate() {
            deps.push(DependencyRecord::new(
                format!("dep{}", deps.len() + 1),
                format!("tokens:t{}", first + governor + 1),
                format!("tokens:t{}", first + i + 1),
                *label,
            ));
        }
        sentences.push(Annotation::new(
            format!("s{}", s + 1),
            AnnotationKind::Sentence,
            sentence_start,
            offset - 1,
        ));
        let chunk_kind = match kind {
            SpanKind::Chunk => AnnotationKind::NounChunk,
            SpanKind::Term => AnnotationKind::Term,
        };
        spans.push(Annotation::new(
            format!("c{}", spans.len() + 1),
            chunk_kind.clone(),
            tokens[first].start,
            tokens[first + 2].end,
        ));
        spans.push(Annotation::new(
            format!("c{}", spans.len() + 1),
            chunk_kind,
            tokens[first + 4].start,
            tokens[first + 5].end,
        ));
    }

    GraphInput::new("tokens")
        .with_tokens(tokens)
        .with_sentences(sentences)
        .with_spans("chunks", kind, spans)
        .with_dependencies(deps)
}

#[test]
fn test_linked_list_follows_document_order() {
    let graph = DocumentGraph::build(document(3, SpanKind::Chunk)).unwrap();
    let tokens = graph.tokens();
    assert_eq!(tokens[0].previous, None);
    assert_eq!(tokens[tokens.len() - 1].next, None);
    for i in 0..tokens.len() - 1 {
        assert_eq!(tokens[i].next, Some(TokenIdx(i + 1)));
        assert_eq!(tokens[i + 1].previous, Some(TokenIdx(i)));
        assert!(tokens[i].annotation.start < tokens[i + 1].annotation.start);
    }
}

#[test]
fn test_every_token_in_one_sentence() {
    let graph = DocumentGraph::build(document(4, SpanKind::Chunk)).unwrap();
    let mut seen = HashSet::new();
    for (s, sentence) in graph.sentences().iter().enumerate() {
        for (position, &token) in sentence.tokens.iter().enumerate() {
            assert!(seen.insert(token), "token in two sentences");
            assert_eq!(graph[token].sentence, Some(SentenceIdx(s)));
            assert_eq!(graph[token].sentence_position, Some(position));
        }
    }
    assert_eq!(seen.len(), graph.tokens().len());
}

#[test]
fn test_span_membership() {
    let graph = DocumentGraph::build(document(2, SpanKind::Term)).unwrap();
    for (i, span) in graph.spans().iter().enumerate() {
        assert_eq!(span.kind, SpanKind::Term);
        for (position, &token) in span.tokens.iter().enumerate() {
            assert_eq!(graph[token].span, Some(SpanIdx(i)));
            assert_eq!(graph[token].span_position, Some(position));
        }
    }
    let unspanned = graph.tokens().iter().filter(|t| t.span.is_none()).count();
    // "divides" and "." in each sentence
    assert_eq!(unspanned, 4);
}

#[test]
fn test_one_root_per_sentence_and_no_cycles() {
    let graph = DocumentGraph::build(document(3, SpanKind::Chunk)).unwrap();
    for sentence in graph.sentences() {
        let roots = sentence
            .tokens
            .iter()
            .filter(|&&t| graph[t].governor.is_root())
            .count();
        assert_eq!(roots, 1);
    }
    for start in 0..graph.tokens().len() {
        let mut visited = HashSet::new();
        let mut cursor = TokenIdx(start);
        while let Some((_, governor)) = graph[cursor].governor.edge() {
            assert!(visited.insert(cursor), "cycle through governor links");
            cursor = governor;
        }
        assert!(graph[cursor].governor.is_root());
    }
}

#[test]
fn test_dependents_mirror_governors() {
    let graph = DocumentGraph::build(document(2, SpanKind::Chunk)).unwrap();
    for (i, token) in graph.tokens().iter().enumerate() {
        for dependent in &token.dependents {
            assert_eq!(
                graph[dependent.token].governor.edge(),
                Some((dependent.label.as_str(), TokenIdx(i)))
            );
        }
    }
}

#[test]
fn test_rebuild_is_deterministic() {
    let first = DocumentGraph::build(document(5, SpanKind::Term)).unwrap();
    let second = DocumentGraph::build(document(5, SpanKind::Term)).unwrap();
    assert_eq!(first.stats(), second.stats());

    let render = |graph: &DocumentGraph| -> Vec<String> {
        FeatureExtractor::new(graph)
            .extract_all()
            .into_iter()
            .map(|(_, features)| features.render())
            .collect()
    };
    assert_eq!(render(&first), render(&second));
}

#[test]
fn test_feature_vector_of_adjective_chunk() {
    let graph = DocumentGraph::build(document(2, SpanKind::Term)).unwrap();
    let features = FeatureExtractor::new(&graph).extract(SpanIdx(1)).unwrap();
    let map = FeatureVector::parse_rendered(&features.render());
    assert_eq!(map["sentence_loc"], "4");
    assert_eq!(map["prev_n2"], "beam_splitter");
    assert_eq!(map["next_n2"], "beam_splitter");
    assert_eq!(map["prev_J"], "polarized");
    assert_eq!(map["dep_dobj"], "divides");
    assert_eq!(map["prev_Npr"], "None");
}

#[test]
fn test_matcher_derives_terms_from_chunks() {
    let graph = DocumentGraph::build(document(1, SpanKind::Chunk)).unwrap();
    let pattern = TermPattern::builtin().unwrap();
    let terms: Vec<(usize, usize)> = graph
        .spans()
        .iter()
        .filter_map(|chunk| {
            let tokens: Vec<(&str, &str, usize, usize)> = chunk
                .tokens
                .iter()
                .map(|&t| {
                    let token = &graph[t];
                    (token.text(), token.tag(), token.annotation.start, token.annotation.end)
                })
                .collect();
            pattern.match_span(&tokens)
        })
        .collect();
    // "the beam splitter" loses its determiner
    assert_eq!(terms, vec![(4, 17), (26, 41)]);
}

#[test]
fn test_relation_paths_across_sentences_stay_local() {
    let graph = DocumentGraph::build(document(2, SpanKind::Term)).unwrap();
    let first = SentenceGraph::for_sentence(&graph, SentenceIdx(0));
    let second = SentenceGraph::for_sentence(&graph, SentenceIdx(1));
    assert_eq!(first.dependency_count(), 6);
    assert!(first.find_path(TokenIdx(2), TokenIdx(9)).is_none());
    let path = second.find_path(TokenIdx(9), TokenIdx(12)).unwrap();
    let labels: Vec<&str> = path.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["nsubj", "dobj"]);
    assert_eq!(path[0].direction, Direction::Reverse);
}

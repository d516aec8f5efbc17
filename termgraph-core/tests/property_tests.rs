//! Property tests for range queries, the matcher and path search

use proptest::prelude::*;
use termgraph_core::range::{indices_in_range, scan_in_range};
use termgraph_core::*;

fn sorted_annotations() -> impl Strategy<Value = Vec<Annotation>> {
    prop::collection::vec((0usize..500, 0usize..40), 0..80).prop_map(|raw| {
        let mut spans: Vec<(usize, usize)> = raw.into_iter().map(|(s, l)| (s, s + l)).collect();
        spans.sort_by_key(|span| span.0);
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| {
                Annotation::new(format!("c{i}"), AnnotationKind::NounChunk, start, end)
            })
            .collect()
    })
}

fn tagged_chunk() -> impl Strategy<Value = Vec<(String, String)>> {
    let tag = prop::sample::select(vec!["NN", "NNS", "JJ", "DT", "IN", "VBZ"]);
    let word = prop::sample::select(vec!["beam", "figure", "more", "the", "light"]);
    prop::collection::vec((word, tag), 0..8).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(w, t)| (w.to_string(), t.to_string()))
            .collect()
    })
}

/// Hop distance by repeated relaxation over the undirected edge list
fn hop_distance(edges: &[(u8, u8)], source: u8, target: u8) -> Option<usize> {
    let mut dist: [Option<usize>; 12] = [None; 12];
    dist[source as usize] = Some(0);
    for _ in 0..12 {
        for &(a, b) in edges {
            for (from, to) in [(a, b), (b, a)] {
                if let Some(d) = dist[from as usize] {
                    if dist[to as usize].map_or(true, |current| d + 1 < current) {
                        dist[to as usize] = Some(d + 1);
                    }
                }
            }
        }
    }
    dist[target as usize]
}

proptest! {
    #[test]
    fn prop_range_query_agrees_with_scan(
        nodes in sorted_annotations(),
        p1 in 0usize..540,
        width in 0usize..200,
    ) {
        let p2 = p1 + width;
        let fast = indices_in_range(&nodes, p1, p2);
        prop_assert_eq!(&fast, &scan_in_range(&nodes, p1, p2));
        for (i, node) in nodes.iter().enumerate() {
            let inside = node.start >= p1 && node.end <= p2;
            prop_assert_eq!(inside, fast.contains(&i));
        }
        prop_assert!(fast.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_matcher_returns_contiguous_suffix(tokens in tagged_chunk()) {
        let pattern = TermPattern::builtin().unwrap();
        let matched = pattern.match_tokens(&tokens);
        if let Some(&first) = matched.first() {
            prop_assert_eq!(matched.clone(), (first..tokens.len()).collect::<Vec<_>>());
        }
        // pure: same input, same output
        prop_assert_eq!(matched, pattern.match_tokens(&tokens));
    }

    #[test]
    fn prop_path_is_shortest_and_follows_edges(
        edges in prop::collection::vec((0u8..12, 0u8..12), 0..30),
        source in 0u8..12,
        target in 0u8..12,
    ) {
        let graph = SentenceGraph::from_edges(edges.iter().map(|&(g, d)| (g, d, "dep")));
        let found = graph.find_path(source, target);
        prop_assert_eq!(
            found.as_ref().map(Vec::len),
            hop_distance(&edges, source, target)
        );
        if let Some(path) = found {
            let mut current = source;
            for step in &path {
                prop_assert!(graph.edges(current).iter().any(|e| e.target == step.node));
                current = step.node;
            }
            prop_assert_eq!(current, target);
            let back = graph.find_path(target, source).map(|p| p.len());
            prop_assert_eq!(back, Some(path.len()));
        }
    }
}

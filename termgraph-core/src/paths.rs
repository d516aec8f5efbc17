//! Per-sentence dependency graphs and shortest paths
//!
//! Every dependency edge `gov --label--> dep` is stored twice: forward from
//! the governor and reversed from the dependent, so paths may climb and
//! descend the tree. Reverse steps carry [`Direction::Reverse`].

use crate::graph::{DocumentGraph, SentenceIdx, TokenIdx};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

/// Orientation of a traversed edge relative to the dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Governor to dependent
    Forward,
    /// Dependent to governor
    Reverse,
}

/// Outgoing adjacency entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<N> {
    /// Dependency label
    pub label: String,
    /// Orientation
    pub direction: Direction,
    /// Node reached
    pub target: N,
}

/// One step of a path: the edge taken and the node reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep<N> {
    /// Dependency label
    pub label: String,
    /// Orientation
    pub direction: Direction,
    /// Node reached
    pub node: N,
}

impl<N> PathStep<N> {
    /// Render the edge part, `--label-->` or `<--label--`
    pub fn arrow(&self) -> String {
        match self.direction {
            Direction::Forward => format!("--{}-->", self.label),
            Direction::Reverse => format!("<--{}--", self.label),
        }
    }
}

/// Bidirectional labelled graph over the tokens of one sentence
#[derive(Debug, Clone)]
pub struct SentenceGraph<N = TokenIdx> {
    adjacency: HashMap<N, Vec<Edge<N>>>,
    forward: Vec<(N, N, String)>,
}

impl<N> Default for SentenceGraph<N> {
    fn default() -> Self {
        Self {
            adjacency: HashMap::new(),
            forward: Vec::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> SentenceGraph<N> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(governor, dependent, label)` triples
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N, S)>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for (governor, dependent, label) in edges {
            graph.add_dependency(governor, dependent, label);
        }
        graph
    }

    /// Insert a dependency as a forward and a reverse edge
    pub fn add_dependency(&mut self, governor: N, dependent: N, label: impl Into<String>) {
        let label = label.into();
        self.adjacency.entry(governor).or_default().push(Edge {
            label: label.clone(),
            direction: Direction::Forward,
            target: dependent,
        });
        self.adjacency.entry(dependent).or_default().push(Edge {
            label: label.clone(),
            direction: Direction::Reverse,
            target: governor,
        });
        self.forward.push((governor, dependent, label));
    }

    /// Outgoing edges of a node, in insertion order
    pub fn edges(&self, node: N) -> &[Edge<N>] {
        self.adjacency
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The dependencies as inserted, without their reverse twins
    pub fn forward_edges(&self) -> &[(N, N, String)] {
        &self.forward
    }

    /// Number of dependencies
    pub fn dependency_count(&self) -> usize {
        self.forward.len()
    }

    /// Shortest path from `source` to `target` by breadth-first search
    ///
    /// Returns `Some(vec![])` when both are the same node and `None` when
    /// `target` cannot be reached.
    pub fn find_path(&self, source: N, target: N) -> Option<Vec<PathStep<N>>> {
        if source == target {
            return Some(Vec::new());
        }

        let mut visited = HashSet::from([source]);
        let mut parents: HashMap<N, (N, &Edge<N>)> = HashMap::new();
        let mut queue = VecDeque::from([source]);

        while let Some(node) = queue.pop_front() {
            for edge in self.edges(node) {
                if !visited.insert(edge.target) {
                    continue;
                }
                parents.insert(edge.target, (node, edge));
                if edge.target == target {
                    return Some(Self::unwind(&parents, source, target));
                }
                queue.push_back(edge.target);
            }
        }
        None
    }

    fn unwind(parents: &HashMap<N, (N, &Edge<N>)>, source: N, target: N) -> Vec<PathStep<N>> {
        let mut steps = Vec::new();
        let mut node = target;
        while node != source {
            let Some(&(parent, edge)) = parents.get(&node) else {
                break;
            };
            steps.push(PathStep {
                label: edge.label.clone(),
                direction: edge.direction,
                node,
            });
            node = parent;
        }
        steps.reverse();
        steps
    }
}

impl SentenceGraph<TokenIdx> {
    /// Graph of the dependency edges inside one sentence of a document graph
    pub fn for_sentence(graph: &DocumentGraph, sentence: SentenceIdx) -> Self {
        Self::from_edges(graph.sentence_edges(sentence))
    }
}

/// Labels along a path, in order
pub fn path_labels<N>(path: &[PathStep<N>]) -> Vec<String> {
    path.iter().map(|step| step.label.clone()).collect()
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Reverse => f.write_str("reverse"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_step_path() {
        let graph = SentenceGraph::from_edges([('A', 'B', "nsubj"), ('B', 'C', "dobj")]);
        let path = graph.find_path('A', 'C').unwrap();
        let steps: Vec<(&str, char)> = path.iter().map(|s| (s.label.as_str(), s.node)).collect();
        assert_eq!(steps, vec![("nsubj", 'B'), ("dobj", 'C')]);
        assert!(path.iter().all(|s| s.direction == Direction::Forward));
        assert_eq!(graph.find_path('A', 'D'), None);
    }

    #[test]
    fn test_reverse_edges() {
        let graph = SentenceGraph::from_edges([('V', 'S', "nsubj"), ('V', 'O', "dobj")]);
        let path = graph.find_path('S', 'O').unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].direction, Direction::Reverse);
        assert_eq!(path[0].node, 'V');
        assert_eq!(path[0].arrow(), "<--nsubj--");
        assert_eq!(path[1].direction, Direction::Forward);
        assert_eq!(path_labels(&path), vec!["nsubj", "dobj"]);
    }

    #[test]
    fn test_same_node() {
        let graph: SentenceGraph<u32> = SentenceGraph::new();
        assert_eq!(graph.find_path(7, 7), Some(Vec::new()));
        assert_eq!(graph.find_path(7, 8), None);
    }

    #[test]
    fn test_shortest_path_preferred() {
        let graph = SentenceGraph::from_edges([
            (1, 2, "a"),
            (2, 3, "b"),
            (3, 4, "c"),
            (1, 4, "shortcut"),
        ]);
        let path = graph.find_path(1, 4).unwrap();
        assert_eq!(path_labels(&path), vec!["shortcut"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let graph = SentenceGraph::from_edges([(1, 2, "x"), (2, 3, "y"), (3, 1, "z")]);
        assert_eq!(graph.find_path(1, 3).map(|p| p.len()), Some(1));
        assert_eq!(graph.find_path(1, 9), None);
    }

    #[test]
    fn test_forward_edges_exclude_reverse() {
        let graph = SentenceGraph::from_edges([(1, 2, "amod"), (1, 3, "det")]);
        assert_eq!(graph.forward_edges().len(), 2);
        assert_eq!(graph.dependency_count(), 2);
        assert_eq!(graph.edges(2).len(), 1);
        assert_eq!(graph.edges(1).len(), 2);
    }
}

//! Containment queries over start-ordered span collections
//!
//! All queries return the members `n` of a collection with
//! `n.start() >= p1 && n.end() <= p2`, in collection order. Collections must
//! be sorted ascending by start offset; the graph builder checks this once
//! with [`check_sorted`] so queries can rely on it.

use crate::annotation::Annotation;

/// Anything covering a character range
pub trait Spanned {
    /// Start character offset
    fn start(&self) -> usize;
    /// End character offset (exclusive)
    fn end(&self) -> usize;
}

impl Spanned for Annotation {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

impl<T: Spanned + ?Sized> Spanned for &T {
    fn start(&self) -> usize {
        (**self).start()
    }

    fn end(&self) -> usize {
        (**self).end()
    }
}

impl Spanned for (usize, usize) {
    fn start(&self) -> usize {
        self.0
    }

    fn end(&self) -> usize {
        self.1
    }
}

/// Return the first position where the start ordering is broken
pub fn check_sorted<T: Spanned>(nodes: &[T]) -> Result<(), usize> {
    match nodes
        .windows(2)
        .position(|pair| pair[1].start() < pair[0].start())
    {
        Some(i) => Err(i + 1),
        None => Ok(()),
    }
}

/// Linear sweep with early exit, O(n) per query
pub fn scan_in_range<T: Spanned>(nodes: &[T], p1: usize, p2: usize) -> Vec<usize> {
    let mut found = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        if node.start() > p2 {
            break;
        }
        if node.start() >= p1 && node.end() <= p2 {
            found.push(i);
        }
    }
    found
}

/// Binary search for the first candidate, then sweep while `start <= p2`
pub fn indices_in_range<T: Spanned>(nodes: &[T], p1: usize, p2: usize) -> Vec<usize> {
    let first = nodes.partition_point(|node| node.start() < p1);
    nodes[first..]
        .iter()
        .take_while(|node| node.start() <= p2)
        .enumerate()
        .filter(|(_, node)| node.end() <= p2)
        .map(|(i, _)| first + i)
        .collect()
}

/// Borrowing view over a start-ordered collection
#[derive(Debug, Clone, Copy)]
pub struct RangeIndex<'a, T> {
    nodes: &'a [T],
}

impl<'a, T: Spanned> RangeIndex<'a, T> {
    /// Wrap a collection, checking the ordering
    pub fn new(nodes: &'a [T]) -> Result<Self, usize> {
        check_sorted(nodes)?;
        Ok(Self { nodes })
    }

    /// Positions of all nodes contained in `p1..p2`
    pub fn indices_in_range(&self, p1: usize, p2: usize) -> Vec<usize> {
        indices_in_range(self.nodes, p1, p2)
    }

    /// All nodes contained in `p1..p2`
    pub fn nodes_in_range(&self, p1: usize, p2: usize) -> Vec<&'a T> {
        indices_in_range(self.nodes, p1, p2)
            .into_iter()
            .map(|i| &self.nodes[i])
            .collect()
    }

    /// All nodes contained in `span`
    pub fn nodes_within(&self, span: &impl Spanned) -> Vec<&'a T> {
        self.nodes_in_range(span.start(), span.end())
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

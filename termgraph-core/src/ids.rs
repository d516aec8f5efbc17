//! Identifier allocation and node ids

use std::collections::HashMap;

/// Per-document identifier allocator
///
/// Hands out `prefix` + counter ids (`t1`, `t2`, `term1`, ...). Each document
/// owns its own allocator, so ids never leak between documents of a batch.
#[derive(Debug, Default, Clone)]
pub struct IdentifierAllocator {
    counts: HashMap<String, usize>,
}

impl IdentifierAllocator {
    /// Create an allocator with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters, to be called at a document boundary
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Allocate the next id for `prefix`
    pub fn next_id(&mut self, prefix: &str) -> String {
        let count = self.counts.entry(prefix.to_string()).or_insert(0);
        *count += 1;
        format!("{prefix}{count}")
    }

    /// Number of ids allocated so far for `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.counts.get(prefix).copied().unwrap_or(0)
    }
}

/// Build a global node id from a collection id and an annotation id
pub fn node_id(collection: &str, annotation_id: &str) -> String {
    format!("{collection}:{annotation_id}")
}

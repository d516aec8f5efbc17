//! Core error types (deterministic only)

use thiserror::Error;

/// Errors raised while indexing or traversing a document's annotations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A dependency record points at an id that is not in the node index
    #[error("dependency '{dependency}' refers to unknown node '{id}'")]
    UnresolvedNode {
        /// The node id that could not be resolved
        id: String,
        /// The dependency record holding the reference
        dependency: String,
    },

    /// A dependency record points at a node that is not a token
    #[error("dependency '{dependency}' refers to '{id}', which is not a token")]
    NotAToken {
        /// The offending node id
        id: String,
        /// The dependency record holding the reference
        dependency: String,
    },

    /// Two nodes were created with the same id
    #[error("duplicate node id '{id}'")]
    DuplicateNode {
        /// The repeated node id
        id: String,
    },

    /// A collection is not ordered by start offset
    #[error("{collection} are not sorted by start offset (at position {position})")]
    UnsortedSpans {
        /// Name of the collection
        collection: &'static str,
        /// First position that breaks the ordering
        position: usize,
    },

    /// An annotation ends before it starts
    #[error("invalid span {start}..{end} on annotation '{id}'")]
    InvalidSpan {
        /// Annotation id
        id: String,
        /// Start offset
        start: usize,
        /// End offset
        end: usize,
    },

    /// A term pattern could not be loaded
    #[error("invalid term pattern: {0}")]
    InvalidPattern(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_node_display() {
        let err = CoreError::UnresolvedNode {
            id: "tokens:t9".to_string(),
            dependency: "dep4".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "dependency 'dep4' refers to unknown node 'tokens:t9'"
        );
    }

    #[test]
    fn test_unsorted_display() {
        let err = CoreError::UnsortedSpans {
            collection: "tokens",
            position: 3,
        };
        assert!(err.to_string().contains("tokens are not sorted"));
    }
}

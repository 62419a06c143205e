//! Core data structures for the node tree and its closure index

use serde::{Deserialize, Serialize};

/// Unique, stable identifier for a node. Never changes once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single row of the adjacency-list table: the node the store owns and
/// the closure maintenance reacts to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// `None` means the node is a root.
    pub parent_id: Option<NodeId>,
    /// Source value for the materialized path. Must not contain the
    /// configured separator. Ignored when paths are disabled.
    pub segment: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, parent_id: Option<NodeId>) -> Self {
        Node {
            id,
            parent_id,
            segment: None,
        }
    }

    pub fn with_segment(id: NodeId, parent_id: Option<NodeId>, segment: impl Into<String>) -> Self {
        Node {
            id,
            parent_id,
            segment: Some(segment.into()),
        }
    }

    /// Whether `other` describes the same row with a different parent.
    pub fn reparented_from(&self, other: &Node) -> bool {
        self.id == other.id && self.parent_id != other.parent_id
    }
}

/// One ancestor/descendant pair in the closure index.
///
/// `depth` is the number of parent hops from descendant to ancestor;
/// every node carries a `depth == 0` edge to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureEdge {
    pub ancestor: NodeId,
    pub descendant: NodeId,
    pub depth: u32,
}

impl ClosureEdge {
    pub fn new(ancestor: NodeId, descendant: NodeId, depth: u32) -> Self {
        ClosureEdge {
            ancestor,
            descendant,
            depth,
        }
    }

    /// The self-edge every node gets on insertion.
    pub fn self_edge(id: NodeId) -> Self {
        ClosureEdge::new(id, id, 0)
    }
}

/// Configuration for materialized paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathConfig {
    /// Separator between path segments.
    pub separator: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        PathConfig {
            separator: "/".to_string(),
        }
    }
}

impl PathConfig {
    pub fn with_separator(separator: impl Into<String>) -> Self {
        PathConfig {
            separator: separator.into(),
        }
    }
}

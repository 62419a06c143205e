//! Error kinds for closure maintenance
//!
//! Every variant is an integrity violation, not a transient failure: the
//! triggering mutation is aborted wholesale and nothing is retried.

use crate::model::NodeId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The primary key of an existing node was changed in an update.
    #[error("changing ids is forbidden: {old} -> {new}")]
    ImmutableKeyViolation { old: NodeId, new: NodeId },

    /// The proposed parent is a descendant of the node being moved, so the
    /// move would make the node its own ancestor.
    #[error("moving {node} under {new_parent} would create a loop in the tree")]
    CycleDetected { node: NodeId, new_parent: NodeId },

    /// An insert referenced a parent that has no self-edge in the index yet.
    #[error("node {node} references parent {parent} which is not in the index")]
    DanglingParent { node: NodeId, parent: NodeId },

    /// A path segment contains the configured separator.
    #[error("path segment {segment:?} of node {node} contains the separator {separator:?}")]
    InvalidPathSegment {
        node: NodeId,
        segment: String,
        separator: String,
    },

    /// An `(ancestor, descendant)` pair was inserted twice. Cannot happen
    /// under correct use of the maintainers.
    #[error("closure edge ({ancestor}, {descendant}) already exists")]
    DuplicateEdge {
        ancestor: NodeId,
        descendant: NodeId,
    },

    /// A store operation referenced a node id that has no row.
    #[error("no node with id {0}")]
    UnknownNode(NodeId),
}

pub type Result<T> = std::result::Result<T, TreeError>;

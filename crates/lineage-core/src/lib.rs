//! Lineage Core — closure-table maintenance over an adjacency-list tree
//!
//! Keeps a secondary index of every ancestor/descendant pair (with its
//! distance) consistent while nodes are created, re-parented and
//! deleted, so tree traversal never needs recursive queries.

pub mod error;
pub mod guard;
pub mod index;
pub mod maintain;
pub mod model;
pub mod paths;
pub mod store;


#[cfg(test)]
pub mod test_utils;

pub use error::{Result, TreeError};
pub use guard::MoveCheck;
pub use index::ClosureIndex;
pub use model::{ClosureEdge, Node, NodeId, PathConfig};
pub use paths::PathSynchronizer;
pub use store::TreeStore;

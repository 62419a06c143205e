//! Shared helpers for building sample trees in tests

use crate::model::{Node, NodeId, PathConfig};
use crate::store::TreeStore;

pub fn node(id: i64, parent: Option<i64>) -> Node {
    Node::new(NodeId(id), parent.map(NodeId))
}

pub fn seg_node(id: i64, parent: Option<i64>, segment: &str) -> Node {
    Node::with_segment(NodeId(id), parent.map(NodeId), segment)
}

/// A three-level chain: 1 -> 2 -> 3, plus a second child 4 under 1.
///
/// ```text
/// 1
/// ├── 2
/// │   └── 3
/// └── 4
/// ```
pub fn sample_tree() -> TreeStore {
    let mut store = TreeStore::new();
    store.insert(node(1, None)).unwrap();
    store.insert(node(2, Some(1))).unwrap();
    store.insert(node(3, Some(2))).unwrap();
    store.insert(node(4, Some(1))).unwrap();
    store
}

/// The R/C/G scenario with paths: root "r", child "c", grandchild "g".
pub fn pathed_tree() -> TreeStore {
    let mut store = TreeStore::with_paths(PathConfig::default());
    store.insert(seg_node(1, None, "r")).unwrap();
    store.insert(seg_node(2, Some(1), "c")).unwrap();
    store.insert(seg_node(3, Some(2), "g")).unwrap();
    store
}

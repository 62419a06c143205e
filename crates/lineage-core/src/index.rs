//! The transitive-closure index: (ancestor, descendant, depth) triples
//! with uniqueness on the (ancestor, descendant) pair

use crate::error::{Result, TreeError};
use crate::model::{ClosureEdge, NodeId};
use std::collections::BTreeMap;

/// Set of closure edges. Pure storage with uniqueness; the maintenance
/// rules live in `guard` and `maintain`.
///
/// Two mirrored orderings are kept so that both `descendants_of` (scan by
/// ancestor) and `ancestors_of` (scan by descendant) are range queries,
/// the same way the generated SQL indexes the closure table from both
/// ends.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClosureIndex {
    by_ancestor: BTreeMap<(NodeId, NodeId), u32>,
    by_descendant: BTreeMap<(NodeId, NodeId), u32>,
}

impl std::fmt::Debug for ClosureIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureIndex")
            .field("edge_count", &self.by_ancestor.len())
            .finish()
    }
}

fn key_range(id: NodeId) -> std::ops::RangeInclusive<(NodeId, NodeId)> {
    (id, NodeId(i64::MIN))..=(id, NodeId(i64::MAX))
}

impl ClosureIndex {
    pub fn new() -> Self {
        ClosureIndex::default()
    }

    /// Insert an edge. Fails with `DuplicateEdge` if the pair exists.
    pub fn insert_edge(&mut self, edge: ClosureEdge) -> Result<()> {
        if self
            .by_ancestor
            .contains_key(&(edge.ancestor, edge.descendant))
        {
            return Err(TreeError::DuplicateEdge {
                ancestor: edge.ancestor,
                descendant: edge.descendant,
            });
        }
        self.by_ancestor
            .insert((edge.ancestor, edge.descendant), edge.depth);
        self.by_descendant
            .insert((edge.descendant, edge.ancestor), edge.depth);
        Ok(())
    }

    /// Remove the edge between a pair, if present. Returns its depth.
    pub fn remove_edge(&mut self, ancestor: NodeId, descendant: NodeId) -> Option<u32> {
        let depth = self.by_ancestor.remove(&(ancestor, descendant))?;
        self.by_descendant.remove(&(descendant, ancestor));
        Some(depth)
    }

    /// Depth between a pair, or `None` when no relationship exists.
    pub fn depth_between(&self, ancestor: NodeId, descendant: NodeId) -> Option<u32> {
        self.by_ancestor.get(&(ancestor, descendant)).copied()
    }

    pub fn contains(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        self.by_ancestor.contains_key(&(ancestor, descendant))
    }

    /// All edges where `id` is the descendant, self-edge included: the
    /// node's ancestor chain, in ancestor-id order.
    pub fn ancestors_of(&self, id: NodeId) -> Vec<ClosureEdge> {
        self.by_descendant
            .range(key_range(id))
            .map(|(&(descendant, ancestor), &depth)| ClosureEdge::new(ancestor, descendant, depth))
            .collect()
    }

    /// All edges where `id` is the ancestor, self-edge included: the
    /// node's subtree, in descendant-id order.
    pub fn descendants_of(&self, id: NodeId) -> Vec<ClosureEdge> {
        self.by_ancestor
            .range(key_range(id))
            .map(|(&(ancestor, descendant), &depth)| ClosureEdge::new(ancestor, descendant, depth))
            .collect()
    }

    /// Remove every edge referencing `id` in either role. Returns how
    /// many edges were dropped.
    pub fn remove_all_for(&mut self, id: NodeId) -> usize {
        let mut dropped = 0;
        for edge in self.descendants_of(id) {
            self.remove_edge(edge.ancestor, edge.descendant);
            dropped += 1;
        }
        // The self-edge was already removed by the pass above.
        for edge in self.ancestors_of(id) {
            if self.remove_edge(edge.ancestor, edge.descendant).is_some() {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.by_ancestor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ancestor.is_empty()
    }

    /// All edges in (ancestor, descendant) order.
    pub fn iter(&self) -> impl Iterator<Item = ClosureEdge> + '_ {
        self.by_ancestor
            .iter()
            .map(|(&(ancestor, descendant), &depth)| ClosureEdge::new(ancestor, descendant, depth))
    }
}

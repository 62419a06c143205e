//! In-memory node store with the maintenance pipeline wired in
//!
//! `TreeStore` plays the role a trigger scheduler plays in the generated
//! SQL: it owns the node rows and, for each mutation, runs the pipeline
//! in one fixed order (guard, closure-edge update, path update) as a
//! single all-or-nothing unit. Ordering is a property of this code, not
//! of any host engine. Mutations take `&mut self`, which is the whole
//! serialization story: overlapping operations cannot interleave.

use crate::error::{Result, TreeError};
use crate::guard::{self, MoveCheck};
use crate::index::ClosureIndex;
use crate::maintain;
use crate::model::{ClosureEdge, Node, NodeId, PathConfig};
use crate::paths::PathSynchronizer;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    nodes: BTreeMap<NodeId, Node>,
    closure: ClosureIndex,
    paths: Option<PathSynchronizer>,
}

impl TreeStore {
    /// Store without path materialization.
    pub fn new() -> Self {
        TreeStore::default()
    }

    /// Store that also maintains a materialized path per node.
    pub fn with_paths(config: PathConfig) -> Self {
        TreeStore {
            nodes: BTreeMap::new(),
            closure: ClosureIndex::new(),
            paths: Some(PathSynchronizer::new(config)),
        }
    }

    /// Insert a node. The parent row must already exist.
    pub fn insert(&mut self, node: Node) -> Result<()> {
        if let Some(paths) = &self.paths {
            paths.check_segment(&node)?;
        }
        if let Some(parent) = node.parent_id {
            if !self.nodes.contains_key(&parent) {
                return Err(TreeError::DanglingParent {
                    node: node.id,
                    parent,
                });
            }
        }
        self.atomically(|store| {
            maintain::on_insert(&mut store.closure, &node)?;
            if let Some(paths) = &mut store.paths {
                paths.on_insert(&node)?;
            }
            store.nodes.insert(node.id, node.clone());
            Ok(())
        })?;
        info!(node = %node.id, parent = ?node.parent_id, "node inserted");
        Ok(())
    }

    /// Apply an updated row. Validates first; a parent change runs the
    /// move maintainers, a segment change under the same parent rewrites
    /// the affected paths, anything else only replaces the row.
    pub fn update(&mut self, new: Node) -> Result<()> {
        let old = self
            .nodes
            .get(&new.id)
            .cloned()
            .ok_or(TreeError::UnknownNode(new.id))?;
        if let Some(paths) = &self.paths {
            paths.check_segment(&new)?;
        }
        match guard::validate(&self.closure, &old, &new)? {
            MoveCheck::Unchanged => {
                if self.paths.is_some() && new.segment != old.segment {
                    // Same prefix rewrite as a move, against the same
                    // parent, so the subtree's paths track the rename.
                    self.atomically(|store| {
                        if let Some(paths) = &mut store.paths {
                            paths.on_move(&store.closure, &new)?;
                        }
                        store.nodes.insert(new.id, new.clone());
                        Ok(())
                    })?;
                    info!(node = %new.id, "node segment renamed");
                } else {
                    self.nodes.insert(new.id, new);
                }
                Ok(())
            }
            MoveCheck::Reparent => {
                if let Some(parent) = new.parent_id {
                    if !self.nodes.contains_key(&parent) {
                        return Err(TreeError::UnknownNode(parent));
                    }
                }
                self.atomically(|store| {
                    maintain::on_move(&mut store.closure, &old, &new)?;
                    if let Some(paths) = &mut store.paths {
                        paths.on_move(&store.closure, &new)?;
                    }
                    store.nodes.insert(new.id, new.clone());
                    Ok(())
                })?;
                info!(node = %new.id, from = ?old.parent_id, to = ?new.parent_id, "node re-parented");
                Ok(())
            }
        }
    }

    /// Re-parent a node, `None` detaching it to a root.
    pub fn set_parent(&mut self, id: NodeId, parent_id: Option<NodeId>) -> Result<()> {
        let mut new = self
            .nodes
            .get(&id)
            .cloned()
            .ok_or(TreeError::UnknownNode(id))?;
        new.parent_id = parent_id;
        self.update(new)
    }

    /// Delete a node and its entire subtree, leaves first, cascading
    /// the closure edges and paths of every removed node. Returns the
    /// removed ids in deletion order.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        if !self.nodes.contains_key(&id) {
            return Err(TreeError::UnknownNode(id));
        }
        let mut subtree = self.closure.descendants_of(id);
        subtree.sort_by(|a, b| b.depth.cmp(&a.depth));
        let mut removed = Vec::with_capacity(subtree.len());
        for edge in subtree {
            maintain::on_delete(&mut self.closure, edge.descendant);
            if let Some(paths) = &mut self.paths {
                paths.on_delete(edge.descendant);
            }
            self.nodes.remove(&edge.descendant);
            removed.push(edge.descendant);
        }
        info!(node = %id, removed = removed.len(), "subtree deleted");
        Ok(removed)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn closure(&self) -> &ClosureIndex {
        &self.closure
    }

    pub fn ancestors_of(&self, id: NodeId) -> Vec<ClosureEdge> {
        self.closure.ancestors_of(id)
    }

    pub fn descendants_of(&self, id: NodeId) -> Vec<ClosureEdge> {
        self.closure.descendants_of(id)
    }

    /// Materialized path of a node, when paths are configured.
    pub fn path_of(&self, id: NodeId) -> Option<&str> {
        self.paths.as_ref().and_then(|p| p.path_of(id))
    }

    /// Run a mutation against the closure index and paths, restoring
    /// both from a snapshot if any step fails.
    fn atomically<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let closure_snapshot = self.closure.clone();
        let paths_snapshot = self.paths.clone();
        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.closure = closure_snapshot;
                self.paths = paths_snapshot;
                Err(err)
            }
        }
    }
}

//! Materialized path maintenance, kept in lockstep with the closure index

use crate::error::{Result, TreeError};
use crate::index::ClosureIndex;
use crate::model::{Node, NodeId, PathConfig};
use std::collections::BTreeMap;
use tracing::debug;

/// Owns the per-node path strings when path materialization is
/// configured. A node's path is the ancestor segments from the root down
/// to the node, joined by the configured separator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSynchronizer {
    config: PathConfig,
    paths: BTreeMap<NodeId, String>,
}

impl PathSynchronizer {
    pub fn new(config: PathConfig) -> Self {
        PathSynchronizer {
            config,
            paths: BTreeMap::new(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.config.separator
    }

    /// Path of a node, if it has one.
    pub fn path_of(&self, id: NodeId) -> Option<&str> {
        self.paths.get(&id).map(String::as_str)
    }

    /// Reject segments that embed the separator. Runs before any
    /// mutation of the triggering operation.
    pub fn check_segment(&self, node: &Node) -> Result<()> {
        let segment = self.segment_of(node);
        if segment.contains(&self.config.separator) {
            return Err(TreeError::InvalidPathSegment {
                node: node.id,
                segment,
                separator: self.config.separator.clone(),
            });
        }
        Ok(())
    }

    /// Set the path of a freshly inserted node: its own segment for a
    /// root, `parent_path + separator + segment` otherwise.
    pub fn on_insert(&mut self, node: &Node) -> Result<()> {
        let path = match node.parent_id {
            None => self.segment_of(node),
            Some(parent) => {
                let parent_path = self
                    .paths
                    .get(&parent)
                    .ok_or(TreeError::UnknownNode(parent))?;
                format!(
                    "{}{}{}",
                    parent_path,
                    self.config.separator,
                    self.segment_of(node)
                )
            }
        };
        debug!(node = %node.id, path = %path, "materialized path");
        self.paths.insert(node.id, path);
        Ok(())
    }

    /// Rewrite paths after a re-parent. The moved node's path is
    /// recomputed against the new parent; every strict descendant gets
    /// the old prefix swapped for the new one. This is a structural
    /// string rewrite, not a re-derivation, and must run after the
    /// closure edges were updated because the subtree is enumerated
    /// through them.
    pub fn on_move(&mut self, index: &ClosureIndex, new: &Node) -> Result<()> {
        let old_path = self
            .paths
            .get(&new.id)
            .cloned()
            .ok_or(TreeError::UnknownNode(new.id))?;
        let new_path = match new.parent_id {
            None => self.segment_of(new),
            Some(parent) => {
                let parent_path = self
                    .paths
                    .get(&parent)
                    .ok_or(TreeError::UnknownNode(parent))?;
                format!(
                    "{}{}{}",
                    parent_path,
                    self.config.separator,
                    self.segment_of(new)
                )
            }
        };

        let old_prefix = format!("{}{}", old_path, self.config.separator);
        let new_prefix = format!("{}{}", new_path, self.config.separator);
        for edge in index.descendants_of(new.id) {
            if edge.depth == 0 {
                continue;
            }
            if let Some(descendant_path) = self.paths.get_mut(&edge.descendant) {
                if let Some(rest) = descendant_path.strip_prefix(&old_prefix) {
                    *descendant_path = format!("{}{}", new_prefix, rest);
                }
            }
        }
        debug!(node = %new.id, old = %old_path, new = %new_path, "rewrote subtree paths");
        self.paths.insert(new.id, new_path);
        Ok(())
    }

    /// Drop the path of a deleted node.
    pub fn on_delete(&mut self, id: NodeId) {
        self.paths.remove(&id);
    }

    fn segment_of(&self, node: &Node) -> String {
        node.segment.clone().unwrap_or_else(|| node.id.to_string())
    }
}

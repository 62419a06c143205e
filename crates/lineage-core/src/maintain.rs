//! Closure-edge maintenance on insert, re-parent and delete
//!
//! These are the write-path rules that keep the index equal to the
//! transitive closure of the parent pointers. Each function assumes its
//! guard has already run (see `guard`) and touches only closure edges;
//! node rows and paths belong to the dispatcher in `store`.

use crate::error::{Result, TreeError};
use crate::index::ClosureIndex;
use crate::model::{ClosureEdge, Node, NodeId};
use tracing::debug;

/// React to a node creation.
///
/// Inserts the self-edge, then one edge per ancestor of the parent
/// (the parent's self-edge included) at `depth + 1`. Fails with
/// `DanglingParent` when the parent has no self-edge yet, i.e. the rows
/// were created out of order.
pub fn on_insert(index: &mut ClosureIndex, node: &Node) -> Result<()> {
    index.insert_edge(ClosureEdge::self_edge(node.id))?;
    if let Some(parent) = node.parent_id {
        let ancestors = index.ancestors_of(parent);
        if ancestors.is_empty() {
            // Undo the self-edge so a failed insert leaves no trace.
            index.remove_edge(node.id, node.id);
            return Err(TreeError::DanglingParent {
                node: node.id,
                parent,
            });
        }
        for edge in ancestors {
            index.insert_edge(ClosureEdge::new(edge.ancestor, node.id, edge.depth + 1))?;
        }
    }
    debug!(node = %node.id, edges = index.len(), "inserted node into closure index");
    Ok(())
}

/// React to a validated re-parent that actually changed `parent_id`.
///
/// The subtree (the node plus everything beneath it) keeps its internal
/// edges; only the links between the subtree and the rest of the tree
/// are rewritten. All removals and insertions are computed up front and
/// applied only when the whole batch is known to be consistent, so a
/// failure mutates nothing.
pub fn on_move(index: &mut ClosureIndex, old: &Node, new: &Node) -> Result<()> {
    debug_assert_eq!(old.id, new.id);
    let subtree = index.descendants_of(old.id);

    let mut removals: Vec<(NodeId, NodeId)> = Vec::new();
    if let Some(old_parent) = old.parent_id {
        for ancestor in index.ancestors_of(old_parent) {
            for member in &subtree {
                removals.push((ancestor.ancestor, member.descendant));
            }
        }
    }

    let mut insertions: Vec<ClosureEdge> = Vec::new();
    if let Some(new_parent) = new.parent_id {
        for ancestor in index.ancestors_of(new_parent) {
            for member in &subtree {
                insertions.push(ClosureEdge::new(
                    ancestor.ancestor,
                    member.descendant,
                    ancestor.depth + member.depth + 1,
                ));
            }
        }
    }

    // The guard already rejected cycles, so after the removals every
    // inserted pair is new; a duplicate here means the index was
    // corrupted before this call.
    for &(ancestor, descendant) in &removals {
        index.remove_edge(ancestor, descendant);
    }
    for edge in insertions {
        index.insert_edge(edge)?;
    }
    debug!(
        node = %old.id,
        subtree = subtree.len(),
        removed = removals.len(),
        "relinked subtree in closure index"
    );
    Ok(())
}

/// React to a node deletion: drop every edge where the node appears as
/// ancestor or descendant. The fate of the node's children is the
/// store's decision, not this function's.
pub fn on_delete(index: &mut ClosureIndex, id: NodeId) {
    let dropped = index.remove_all_for(id);
    debug!(node = %id, dropped, "cascaded node deletion through closure index");
}

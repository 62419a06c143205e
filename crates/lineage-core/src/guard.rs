//! Pre-move validation: id freeze and cycle prevention

use crate::error::{Result, TreeError};
use crate::index::ClosureIndex;
use crate::model::Node;
use tracing::debug;

/// Outcome of a passed validation, telling the dispatcher whether the
/// edge maintainers have any work to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCheck {
    /// The parent did not change; the update is a no-op for the index.
    Unchanged,
    /// The parent changed and the move is safe to apply.
    Reparent,
}

/// Validate a proposed update before any mutation is applied.
///
/// Rejects primary-key changes outright. A re-parent is a cycle when the
/// proposed parent is currently a descendant of the moving node; the
/// node's own self-edge makes "move under itself" a cycle as well.
/// Detaching to root (`parent_id = None`) always passes.
pub fn validate(index: &ClosureIndex, old: &Node, new: &Node) -> Result<MoveCheck> {
    if new.id != old.id {
        return Err(TreeError::ImmutableKeyViolation {
            old: old.id,
            new: new.id,
        });
    }
    if new.parent_id == old.parent_id {
        return Ok(MoveCheck::Unchanged);
    }
    if let Some(new_parent) = new.parent_id {
        if index.contains(new.id, new_parent) {
            debug!(node = %new.id, new_parent = %new_parent, "move rejected: would create a loop");
            return Err(TreeError::CycleDetected {
                node: new.id,
                new_parent,
            });
        }
    }
    Ok(MoveCheck::Reparent)
}

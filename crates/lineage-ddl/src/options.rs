//! Generator options: which table to wrap and how its columns are named

use serde::{Deserialize, Serialize};

/// Path materialization columns, present only when the caller asked for
/// path triggers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathColumns {
    /// Column holding the materialized path.
    pub column: String,
    /// Column whose value becomes this node's path segment. Values must
    /// not contain the separator.
    pub source: String,
}

/// Description of the adjacency-list table the closure table and
/// triggers are generated for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableOptions {
    pub table: String,
    pub parent_column: String,
    pub pk_column: String,
    pub pk_type: String,
    pub path: Option<PathColumns>,
    pub path_separator: String,
    pub table_suffix: String,
}

impl TableOptions {
    /// Options for `table` with every knob at its default.
    pub fn new(table: impl Into<String>) -> Self {
        TableOptions {
            table: table.into(),
            parent_column: "parent_id".to_string(),
            pk_column: "id".to_string(),
            pk_type: "integer".to_string(),
            path: None,
            path_separator: "/".to_string(),
            table_suffix: "_tree".to_string(),
        }
    }

    pub fn with_path(mut self, column: impl Into<String>, source: impl Into<String>) -> Self {
        self.path = Some(PathColumns {
            column: column.into(),
            source: source.into(),
        });
        self
    }

    /// Name of the closure table.
    pub fn tree_table(&self) -> String {
        format!("{}{}", self.table, self.table_suffix)
    }

    /// Name of a generated trigger or trigger function.
    pub fn trigger_name(&self, suffix: &str) -> String {
        format!("{}_{}", self.tree_table(), suffix)
    }
}

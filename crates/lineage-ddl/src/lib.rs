//! Lineage DDL — closure-table and trigger generation for SQL databases
//!
//! Renders, per dialect, the DDL that makes a database maintain the
//! closure index itself: the closure table and the insert/update
//! triggers implementing the same algorithm `lineage-core` runs in
//! memory.

pub mod driver;
pub mod error;
pub mod generate;
pub mod options;
pub mod registry;
pub mod render;

#[cfg(test)]
pub mod tests;

pub use driver::Driver;
pub use error::GenerateError;
pub use generate::{generate, Script};
pub use options::{PathColumns, TableOptions};
pub use registry::{Registry, SchemaRenderer};

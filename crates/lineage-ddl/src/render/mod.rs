//! Per-dialect SQL renderers

pub mod mysql;
pub mod postgres;
pub mod sqlite;

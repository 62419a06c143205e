//! Generator-level errors. All occur before any statement is emitted.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The DSN names a driver no renderer exists for.
    #[error("no schema renderer for driver {0:?}")]
    UnsupportedDialect(String),

    /// The DSN carries no driver name at all.
    #[error("malformed connection string {0:?}: missing driver name")]
    MalformedConnectionString(String),
}

//! Supported database drivers and DSN parsing

use crate::error::GenerateError;
use serde::{Deserialize, Serialize};

/// The closed set of databases a renderer exists for. Dispatch is by
/// this enum, validated once when the DSN is parsed; nothing downstream
/// ever matches on driver strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Pgsql,
    Mysql,
    Sqlite,
}

impl Driver {
    pub const ALL: [Driver; 3] = [Driver::Pgsql, Driver::Mysql, Driver::Sqlite];

    /// Canonical driver name as it appears in a DSN.
    pub fn name(&self) -> &'static str {
        match self {
            Driver::Pgsql => "pgsql",
            Driver::Mysql => "mysql",
            Driver::Sqlite => "sqlite",
        }
    }

    /// Resolve the driver from a DSN, which is either a bare driver name
    /// (`pgsql`) or a full connection string (`pgsql:host=...`). The part
    /// before the first `:` decides; the rest is never inspected and no
    /// connection is opened. `mysqli` is accepted as a MySQL alias.
    pub fn from_dsn(dsn: &str) -> Result<Driver, GenerateError> {
        let name = match dsn.find(':') {
            Some(pos) => &dsn[..pos],
            None => dsn,
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(GenerateError::MalformedConnectionString(dsn.to_string()));
        }
        match name.as_str() {
            "pgsql" => Ok(Driver::Pgsql),
            "mysql" | "mysqli" => Ok(Driver::Mysql),
            "sqlite" => Ok(Driver::Sqlite),
            _ => Err(GenerateError::UnsupportedDialect(name)),
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

//! Renderer interface and the closed driver registry

use crate::driver::Driver;
use crate::options::TableOptions;
use crate::render::{mysql::MysqlRenderer, postgres::PostgresRenderer, sqlite::SqliteRenderer};

/// Per-dialect rendering of the closure-table schema. The algorithm the
/// triggers implement is identical across dialects; only quoting, error
/// signalling and trigger syntax differ.
pub trait SchemaRenderer {
    /// DDL for the closure table itself.
    fn create_table(&self, opts: &TableOptions) -> String;

    /// Trigger (and, where the dialect needs them, function) definitions
    /// in the order they should be created.
    fn create_triggers(&self, opts: &TableOptions) -> Vec<String>;

    /// Idempotent drop of the closure table.
    fn drop_table(&self, opts: &TableOptions) -> String;

    /// Idempotent drops of every trigger this renderer may have created,
    /// path triggers included, so re-runs clean up a previous
    /// configuration too.
    fn drop_triggers(&self, opts: &TableOptions) -> Vec<String>;
}

/// One renderer per `Driver` variant, constructed once at startup and
/// passed by reference to the generator. Being a plain struct over a
/// closed enum, there is nothing to register at runtime and no lookup
/// that can miss.
pub struct Registry {
    pgsql: PostgresRenderer,
    mysql: MysqlRenderer,
    sqlite: SqliteRenderer,
}

impl Registry {
    pub fn with_builtin() -> Self {
        Registry {
            pgsql: PostgresRenderer,
            mysql: MysqlRenderer,
            sqlite: SqliteRenderer,
        }
    }

    pub fn renderer(&self, driver: Driver) -> &dyn SchemaRenderer {
        match driver {
            Driver::Pgsql => &self.pgsql,
            Driver::Mysql => &self.mysql,
            Driver::Sqlite => &self.sqlite,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::with_builtin()
    }
}

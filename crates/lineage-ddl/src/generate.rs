//! Assembly of the generated statement sequence

use crate::driver::Driver;
use crate::error::GenerateError;
use crate::options::TableOptions;
use crate::registry::Registry;
use serde::Serialize;
use tracing::info;

/// The ordered DDL output for one table: drop the closure table, create
/// it, drop every trigger, create the triggers. The drops come first so
/// re-running the script on an existing schema is idempotent.
#[derive(Debug, Clone, Serialize)]
pub struct Script {
    pub driver: Driver,
    pub statements: Vec<String>,
}

impl Script {
    /// The statements joined the way the CLI prints them: each followed
    /// by a blank line.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        for statement in &self.statements {
            out.push_str(statement);
            out.push_str("\n\n");
        }
        out
    }
}

/// Resolve the driver from the DSN and render the full script. Fails
/// before producing any output; there is no partial script.
pub fn generate(
    registry: &Registry,
    dsn: &str,
    opts: &TableOptions,
) -> Result<Script, GenerateError> {
    let driver = Driver::from_dsn(dsn)?;
    let renderer = registry.renderer(driver);

    let mut statements = vec![renderer.drop_table(opts), renderer.create_table(opts)];
    statements.extend(renderer.drop_triggers(opts));
    statements.extend(renderer.create_triggers(opts));

    info!(
        driver = %driver,
        table = %opts.table,
        statements = statements.len(),
        "rendered closure-table script"
    );
    Ok(Script { driver, statements })
}

//! CLI command implementations

use lineage_ddl::{Driver, Registry, TableOptions};

pub struct GenerateArgs {
    pub dsn: String,
    pub table: String,
    pub parent: String,
    pub pk: String,
    pub pk_type: String,
    pub path: Option<String>,
    pub path_from: Option<String>,
    pub path_separator: String,
    pub table_suffix: String,
    pub json: bool,
}

pub fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut opts = TableOptions::new(&args.table);
    opts.parent_column = args.parent;
    opts.pk_column = args.pk;
    opts.pk_type = args.pk_type;
    opts.path_separator = args.path_separator;
    opts.table_suffix = args.table_suffix;
    if let (Some(column), Some(source)) = (args.path, args.path_from) {
        opts = opts.with_path(column, source);
    }

    let registry = Registry::with_builtin();
    let script = lineage_ddl::generate(&registry, &args.dsn, &opts)?;

    tracing::info!(
        driver = %script.driver,
        statements = script.statements.len(),
        "generated script for table {}",
        opts.table
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&script)?);
    } else {
        print!("{}", script.to_sql());
    }
    Ok(())
}

pub fn drivers() -> anyhow::Result<()> {
    for driver in Driver::ALL {
        println!("{driver}");
    }
    Ok(())
}

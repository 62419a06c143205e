//! Lineage CLI entry point

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(about = "Closure table and trigger generator for hierarchical SQL tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the closure table and trigger DDL for a table
    Generate {
        /// DSN connection string or just the driver name (pgsql, sqlite, mysql)
        #[arg(short, long)]
        dsn: String,

        /// Table name
        #[arg(short, long)]
        table: String,

        /// Parent foreign key column name
        #[arg(short, long, default_value = "parent_id")]
        parent: String,

        /// Primary key column name
        #[arg(short = 'i', long, default_value = "id")]
        pk: String,

        /// Primary key and parent column type
        #[arg(long, default_value = "integer")]
        pk_type: String,

        /// Path column name; if set, additional triggers will be generated
        #[arg(long, requires = "path_from")]
        path: Option<String>,

        /// Column which value will be used to build a path. Its values
        /// can't contain the path separator
        #[arg(long, requires = "path")]
        path_from: Option<String>,

        /// Path separator character
        #[arg(long, default_value = "/")]
        path_separator: String,

        /// Suffix of the closure table
        #[arg(long, default_value = "_tree")]
        table_suffix: String,

        /// Emit the statements as a JSON document instead of plain SQL
        #[arg(long)]
        json: bool,
    },
    /// List the supported database drivers
    Drivers,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "lineage={l},lineage_core={l},lineage_ddl={l}",
            l = log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            dsn,
            table,
            parent,
            pk,
            pk_type,
            path,
            path_from,
            path_separator,
            table_suffix,
            json,
        } => commands::generate(commands::GenerateArgs {
            dsn,
            table,
            parent,
            pk,
            pk_type,
            path,
            path_from,
            path_separator,
            table_suffix,
            json,
        }),
        Commands::Drivers => commands::drivers(),
        Commands::Version => {
            println!("lineage v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

//! Unit tests for lineage-ddl

use crate::driver::Driver;
use crate::error::GenerateError;
use crate::generate::generate;
use crate::options::TableOptions;
use crate::registry::Registry;

fn script_for(dsn: &str, opts: &TableOptions) -> Vec<String> {
    let registry = Registry::with_builtin();
    generate(&registry, dsn, opts).unwrap().statements
}

// ── Driver / DSN ────────────────────────────────────────

#[test]
fn test_bare_driver_names() {
    assert_eq!(Driver::from_dsn("pgsql").unwrap(), Driver::Pgsql);
    assert_eq!(Driver::from_dsn("mysql").unwrap(), Driver::Mysql);
    assert_eq!(Driver::from_dsn("sqlite").unwrap(), Driver::Sqlite);
}

#[test]
fn test_full_connection_strings() {
    assert_eq!(
        Driver::from_dsn("pgsql:host=localhost;dbname=app").unwrap(),
        Driver::Pgsql
    );
    assert_eq!(Driver::from_dsn("sqlite:/tmp/app.db").unwrap(), Driver::Sqlite);
}

#[test]
fn test_driver_name_is_case_insensitive() {
    assert_eq!(Driver::from_dsn("PgSql:whatever").unwrap(), Driver::Pgsql);
}

#[test]
fn test_mysqli_alias() {
    assert_eq!(Driver::from_dsn("mysqli:host=db").unwrap(), Driver::Mysql);
}

#[test]
fn test_unknown_driver_rejected() {
    assert_eq!(
        Driver::from_dsn("oci:...").unwrap_err(),
        GenerateError::UnsupportedDialect("oci".to_string())
    );
}

#[test]
fn test_empty_driver_is_malformed() {
    assert!(matches!(
        Driver::from_dsn("").unwrap_err(),
        GenerateError::MalformedConnectionString(_)
    ));
    assert!(matches!(
        Driver::from_dsn(":host=x").unwrap_err(),
        GenerateError::MalformedConnectionString(_)
    ));
}

#[test]
fn test_generate_fails_with_no_output() {
    let registry = Registry::with_builtin();
    let result = generate(&registry, "mssql", &TableOptions::new("nodes"));
    assert!(result.is_err());
}

// ── Options ─────────────────────────────────────────────

#[test]
fn test_option_defaults() {
    let opts = TableOptions::new("pages");
    assert_eq!(opts.parent_column, "parent_id");
    assert_eq!(opts.pk_column, "id");
    assert_eq!(opts.pk_type, "integer");
    assert_eq!(opts.path, None);
    assert_eq!(opts.path_separator, "/");
    assert_eq!(opts.tree_table(), "pages_tree");
}

#[test]
fn test_custom_suffix_names() {
    let mut opts = TableOptions::new("pages");
    opts.table_suffix = "_closure".to_string();
    assert_eq!(opts.tree_table(), "pages_closure");
    assert_eq!(opts.trigger_name("ai"), "pages_closure_ai");
}

// ── Statement order ─────────────────────────────────────

#[test]
fn test_statement_order_is_idempotent_shape() {
    for dsn in ["pgsql", "mysql", "sqlite"] {
        let statements = script_for(dsn, &TableOptions::new("nodes"));
        assert!(
            statements[0].contains("DROP TABLE IF EXISTS"),
            "{dsn}: first statement drops the closure table"
        );
        assert!(
            statements[1].contains("CREATE TABLE"),
            "{dsn}: second statement creates the closure table"
        );
        let first_create_trigger = statements
            .iter()
            .position(|s| s.contains("CREATE TRIGGER") || s.contains("RETURNS TRIGGER"))
            .unwrap();
        let last_drop_trigger = statements
            .iter()
            .rposition(|s| s.starts_with("DROP TRIGGER") || s.starts_with("DROP FUNCTION"))
            .unwrap();
        assert!(
            last_drop_trigger < first_create_trigger,
            "{dsn}: all trigger drops precede trigger creation"
        );
    }
}

// ── Closure table DDL ───────────────────────────────────

#[test]
fn test_create_table_columns() {
    let opts = TableOptions::new("nodes");
    let statements = script_for("pgsql", &opts);
    let create = &statements[1];
    assert!(create.contains(r#"CREATE TABLE "nodes_tree""#));
    assert!(create.contains("depth INTEGER NOT NULL"));
    assert!(create.contains("UNIQUE (parent_id, child_id)"));
    assert!(create.contains(r#"REFERENCES "nodes"("id") ON DELETE CASCADE"#));
}

#[test]
fn test_pk_type_is_propagated() {
    let mut opts = TableOptions::new("nodes");
    opts.pk_type = "bigint".to_string();
    let statements = script_for("pgsql", &opts);
    assert!(statements[1].contains("parent_id bigint NOT NULL"));
    assert!(statements[1].contains("child_id bigint NOT NULL"));
}

#[test]
fn test_quoting_per_dialect() {
    let opts = TableOptions::new("nodes");
    let pg = script_for("pgsql", &opts);
    assert!(pg[1].contains(r#""nodes_tree""#));
    let my = script_for("mysql", &opts);
    assert!(my[1].contains("`nodes_tree`"));
    assert!(my[1].contains("ENGINE=InnoDB"));
    let lite = script_for("sqlite", &opts);
    assert!(lite[1].contains(r#""nodes_tree""#));
    assert!(lite[1].contains("AUTOINCREMENT"));
}

// ── Trigger bodies ──────────────────────────────────────

#[test]
fn test_insert_trigger_self_row_and_ancestor_copies() {
    for dsn in ["pgsql", "mysql", "sqlite"] {
        let statements = script_for(dsn, &TableOptions::new("nodes"));
        let ai = statements
            .iter()
            .find(|s| s.contains("nodes_tree_ai") && !s.starts_with("DROP"))
            .unwrap();
        // Self row at depth 0 and the ancestor copy at depth + 1.
        assert!(ai.contains(", 0)"), "{dsn}");
        assert!(ai.contains("x.depth + 1"), "{dsn}");
    }
}

#[test]
fn test_guard_trigger_checks_cycle_and_id() {
    for dsn in ["pgsql", "mysql", "sqlite"] {
        let statements = script_for(dsn, &TableOptions::new("nodes"));
        let body = statements.join("\n");
        assert!(body.contains("Changing ids is forbidden."), "{dsn}");
        assert!(
            body.contains("Update blocked, because it would create loop in tree."),
            "{dsn}"
        );
    }
}

#[test]
fn test_move_trigger_depth_arithmetic() {
    for dsn in ["pgsql", "mysql", "sqlite"] {
        let statements = script_for(dsn, &TableOptions::new("nodes"));
        let body = statements.join("\n");
        assert!(body.contains("r1.depth + r2.depth + 1"), "{dsn}");
        assert!(body.contains("r2.depth > r1.depth"), "{dsn}");
    }
}

#[test]
fn test_mysql_uses_signal() {
    let statements = script_for("mysql", &TableOptions::new("nodes"));
    let body = statements.join("\n");
    assert!(body.contains("SIGNAL SQLSTATE '45000'"));
}

// ── Path triggers ───────────────────────────────────────

#[test]
fn test_no_path_triggers_without_path_option() {
    for dsn in ["pgsql", "mysql", "sqlite"] {
        let statements = script_for(dsn, &TableOptions::new("nodes"));
        let creates: Vec<_> = statements
            .iter()
            .filter(|s| !s.starts_with("DROP") && s.contains("path"))
            .collect();
        assert!(creates.is_empty(), "{dsn}: {creates:?}");
    }
}

#[test]
fn test_path_insert_trigger_tests_parent_column() {
    // The "no parent" branch must test the parent column for NULL.
    let opts = TableOptions::new("nodes").with_path("url", "slug");
    for dsn in ["pgsql", "mysql", "sqlite"] {
        let statements = script_for(dsn, &opts);
        let body = statements.join("\n");
        assert!(body.contains("url"), "{dsn}");
        assert!(body.contains("slug"), "{dsn}");
        let null_check = body.contains(r#"NEW."parent_id" IS NULL"#)
            || body.contains("NEW.`parent_id` IS NULL");
        assert!(null_check, "{dsn}: insert path trigger checks the parent column");
    }
}

#[test]
fn test_path_separator_is_rendered() {
    let mut opts = TableOptions::new("nodes").with_path("url", "slug");
    opts.path_separator = ".".to_string();
    let statements = script_for("sqlite", &opts);
    let body = statements.join("\n");
    assert!(body.contains("'.'"));
    assert!(!body.contains("'/'"));
}

#[test]
fn test_drop_triggers_cover_path_triggers_even_without_path() {
    // Re-running after a config change must clean up old path triggers.
    let statements = script_for("pgsql", &TableOptions::new("nodes"));
    let drops: Vec<_> = statements
        .iter()
        .filter(|s| s.starts_with("DROP TRIGGER"))
        .collect();
    assert!(drops.iter().any(|s| s.contains("bi_path")));
    assert!(drops.iter().any(|s| s.contains("bu_path")));
}

// ── Script output ───────────────────────────────────────

#[test]
fn test_script_to_sql_blank_line_separated() {
    let registry = Registry::with_builtin();
    let script = generate(&registry, "sqlite", &TableOptions::new("nodes")).unwrap();
    let sql = script.to_sql();
    assert!(sql.starts_with("DROP TABLE IF EXISTS"));
    assert!(sql.contains("\n\n"));
}

#[test]
fn test_script_serializes_to_json() {
    let registry = Registry::with_builtin();
    let script = generate(&registry, "pgsql", &TableOptions::new("nodes")).unwrap();
    let json = serde_json::to_value(&script).unwrap();
    assert_eq!(json["driver"], "pgsql");
    assert!(json["statements"].as_array().unwrap().len() > 2);
}

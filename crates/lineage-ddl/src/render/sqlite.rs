//! SQLite renderer: one WHEN-guarded trigger per maintenance step
//!
//! SQLite leaves the firing order of same-phase triggers unspecified, so
//! every trigger here carries the full condition it needs in its WHEN
//! clause and no trigger reads state another sibling must have written
//! first. The statements are emitted in logical pipeline order: guards,
//! insert maintenance, then update maintenance.

use crate::options::TableOptions;
use crate::registry::SchemaRenderer;

pub struct SqliteRenderer;

const TRIGGER_SUFFIXES: [&str; 8] = [
    "ai", "bu_1", "bu_2", "au_1", "au_2", "ai_path_1", "ai_path_2", "au_path",
];

impl SchemaRenderer for SqliteRenderer {
    fn create_table(&self, opts: &TableOptions) -> String {
        format!(
            r#"CREATE TABLE "{tree}" (
	id INTEGER PRIMARY KEY AUTOINCREMENT,
	parent_id {pk_type} NOT NULL REFERENCES "{table}"("{pk}") ON DELETE CASCADE,
	child_id {pk_type} NOT NULL REFERENCES "{table}"("{pk}") ON DELETE CASCADE,
	depth INTEGER NOT NULL,
	UNIQUE (parent_id, child_id)
)"#,
            tree = opts.tree_table(),
            table = opts.table,
            pk = opts.pk_column,
            pk_type = opts.pk_type,
        )
    }

    fn create_triggers(&self, opts: &TableOptions) -> Vec<String> {
        let tree = opts.tree_table();
        let table = &opts.table;
        let pk = &opts.pk_column;
        let parent = &opts.parent_column;
        let mut queries = Vec::new();

        queries.push(format!(
            r#"-- This implementation forbids changes to the primary key
CREATE TRIGGER "{bu_1}" BEFORE UPDATE ON "{table}"
FOR EACH ROW WHEN OLD."{pk}" != NEW."{pk}"
BEGIN
  SELECT RAISE (ABORT, 'Changing ids is forbidden.');
END;"#,
            bu_1 = opts.trigger_name("bu_1"),
        ));

        queries.push(format!(
            r#"-- As for moving data around in {table} freely, we should forbid
-- moves that would create loops:
CREATE TRIGGER "{bu_2}" BEFORE UPDATE ON "{table}"
FOR EACH ROW WHEN NEW."{parent}" IS NOT NULL AND 0 < (
  SELECT COUNT(child_id)
  FROM "{tree}"
  WHERE child_id = NEW."{parent}" AND parent_id = NEW."{pk}"
)
BEGIN
  SELECT RAISE (ABORT, 'Update blocked, because it would create loop in tree.');
END;"#,
            bu_2 = opts.trigger_name("bu_2"),
        ));

        queries.push(format!(
            r#"-- --------------------------------------------------------------------
-- INSERT:
-- 1. Insert a matching row in {tree} where both parent and child
-- are set to the id of the newly inserted object. Depth is set to 0 as
-- both child and parent are on the same level.
--
-- 2. Copy all rows that our parent had as its parents, but we modify
-- the child id in these rows to be the id of currently inserted row,
-- and increase depth by one.
-- --------------------------------------------------------------------
CREATE TRIGGER "{ai}" AFTER INSERT ON "{table}"
FOR EACH ROW
BEGIN
  INSERT INTO "{tree}" (parent_id, child_id, depth)
    VALUES (NEW."{pk}", NEW."{pk}", 0);
  INSERT INTO "{tree}" (parent_id, child_id, depth)
    SELECT x.parent_id, NEW."{pk}", x.depth + 1
    FROM "{tree}" x
    WHERE x.child_id = NEW."{parent}";
END;"#,
            ai = opts.trigger_name("ai"),
        ));

        if let Some(path) = &opts.path {
            let sep = &opts.path_separator;
            queries.push(format!(
                r#"CREATE TRIGGER "{ai_path_1}" AFTER INSERT ON "{table}"
FOR EACH ROW WHEN NEW."{parent}" IS NULL
BEGIN
  UPDATE "{table}" SET "{path}" = "{path_from}" WHERE "{pk}" = NEW."{pk}";
END;"#,
                ai_path_1 = opts.trigger_name("ai_path_1"),
                path = path.column,
                path_from = path.source,
            ));
            queries.push(format!(
                r#"CREATE TRIGGER "{ai_path_2}" AFTER INSERT ON "{table}"
FOR EACH ROW WHEN NEW."{parent}" IS NOT NULL
BEGIN
  UPDATE "{table}"
    SET "{path}" = (
      SELECT "{path}" || '{sep}' || NEW."{path_from}"
      FROM "{table}"
      WHERE "{pk}" = NEW."{parent}"
    )
    WHERE "{pk}" = NEW."{pk}";
END;"#,
                ai_path_2 = opts.trigger_name("ai_path_2"),
                path = path.column,
                path_from = path.source,
            ));
        }

        queries.push(format!(
            r#"-- Remove the tree data relating to the old parent
CREATE TRIGGER "{au_1}" AFTER UPDATE ON "{table}"
FOR EACH ROW WHEN OLD."{parent}" IS NOT NEW."{parent}" AND OLD."{parent}" IS NOT NULL
BEGIN
  DELETE FROM "{tree}" WHERE id IN (
    SELECT r2.id
    FROM "{tree}" r1
    INNER JOIN "{tree}" r2 ON r1.child_id = r2.child_id AND r2.depth > r1.depth
    WHERE r1.parent_id = NEW."{pk}"
  );
END;"#,
            au_1 = opts.trigger_name("au_1"),
        ));

        queries.push(format!(
            r#"-- Insert tree data relating to the new parent
CREATE TRIGGER "{au_2}" AFTER UPDATE ON "{table}"
FOR EACH ROW WHEN OLD."{parent}" IS NOT NEW."{parent}" AND NEW."{parent}" IS NOT NULL
BEGIN
  INSERT INTO "{tree}" (parent_id, child_id, depth)
    SELECT r1.parent_id, r2.child_id, r1.depth + r2.depth + 1
    FROM "{tree}" r1
    INNER JOIN "{tree}" r2 ON r2.parent_id = NEW."{pk}"
    WHERE r1.child_id = NEW."{parent}";
END;"#,
            au_2 = opts.trigger_name("au_2"),
        ));

        if let Some(path) = &opts.path {
            let sep = &opts.path_separator;
            queries.push(format!(
                r#"-- Rewrite paths below the moved row: swap the old prefix for the
-- new one, descendants first so the old prefix is still readable
CREATE TRIGGER "{au_path}" AFTER UPDATE ON "{table}"
FOR EACH ROW WHEN OLD."{parent}" IS NOT NEW."{parent}"
BEGIN
  UPDATE "{table}"
    SET "{path}" = CASE
      WHEN NEW."{parent}" IS NULL THEN NEW."{path_from}"
      ELSE (
        SELECT "{path}"
        FROM "{table}"
        WHERE "{pk}" = NEW."{parent}"
      ) || '{sep}' || NEW."{path_from}"
    END || '{sep}' || substr("{path}", length((
      SELECT "{path}"
      FROM "{table}"
      WHERE "{pk}" = NEW."{pk}"
    )) + length('{sep}') + 1)
    WHERE "{pk}" IN (
      SELECT child_id
      FROM "{tree}"
      WHERE parent_id = NEW."{pk}" AND depth > 0
    );
  UPDATE "{table}"
    SET "{path}" = CASE
      WHEN NEW."{parent}" IS NULL THEN NEW."{path_from}"
      ELSE (
        SELECT "{path}"
        FROM "{table}"
        WHERE "{pk}" = NEW."{parent}"
      ) || '{sep}' || NEW."{path_from}"
    END
    WHERE "{pk}" = NEW."{pk}";
END;"#,
                au_path = opts.trigger_name("au_path"),
                path = path.column,
                path_from = path.source,
            ));
        }
        queries
    }

    fn drop_table(&self, opts: &TableOptions) -> String {
        format!(r#"DROP TABLE IF EXISTS "{}""#, opts.tree_table())
    }

    fn drop_triggers(&self, opts: &TableOptions) -> Vec<String> {
        TRIGGER_SUFFIXES
            .iter()
            .map(|suffix| format!(r#"DROP TRIGGER IF EXISTS "{}""#, opts.trigger_name(suffix)))
            .collect()
    }
}

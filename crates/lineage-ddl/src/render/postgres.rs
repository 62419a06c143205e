//! PostgreSQL renderer: plpgsql trigger functions plus the triggers
//! binding them

use crate::options::TableOptions;
use crate::registry::SchemaRenderer;

pub struct PostgresRenderer;

const TRIGGER_SUFFIXES: [&str; 5] = ["ai", "bu", "au", "bi_path", "bu_path"];

impl SchemaRenderer for PostgresRenderer {
    fn create_table(&self, opts: &TableOptions) -> String {
        format!(
            r#"CREATE TABLE "{tree}" (
	id SERIAL PRIMARY KEY,
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
CREATE OR REPLACE FUNCTION "{ai}"() RETURNS TRIGGER AS
$BODY$
BEGIN
  INSERT INTO "{tree}" (parent_id, child_id, depth)
    VALUES (NEW."{pk}", NEW."{pk}", 0);
  INSERT INTO "{tree}" (parent_id, child_id, depth)
    SELECT x.parent_id, NEW."{pk}", x.depth + 1
    FROM "{tree}" x
    WHERE x.child_id = NEW."{parent}";
  RETURN NEW;
END;
$BODY$
LANGUAGE 'plpgsql'"#,
            ai = opts.trigger_name("ai"),
        ));

        queries.push(format!(
            r#"-- As for moving data around in {table} freely, we should forbid
-- moves that would create loops:
CREATE OR REPLACE FUNCTION "{bu}"() RETURNS TRIGGER AS
$BODY$
BEGIN
  IF NEW."{pk}" <> OLD."{pk}" THEN
    RAISE EXCEPTION 'Changing ids is forbidden.';
  END IF;
  IF OLD."{parent}" IS NOT DISTINCT FROM NEW."{parent}" THEN
    RETURN NEW;
  END IF;
  IF NEW."{parent}" IS NULL THEN
    RETURN NEW;
  END IF;
  PERFORM 1 FROM "{tree}" WHERE ( parent_id, child_id ) = ( NEW."{pk}", NEW."{parent}" );
  IF FOUND THEN
    RAISE EXCEPTION 'Update blocked, because it would create loop in tree.';
  END IF;
  RETURN NEW;
END;
$BODY$
LANGUAGE 'plpgsql'"#,
            bu = opts.trigger_name("bu"),
        ));

        queries.push(format!(
            r#"CREATE OR REPLACE FUNCTION "{au}"() RETURNS TRIGGER AS
$BODY$
BEGIN
  IF OLD."{parent}" IS NOT DISTINCT FROM NEW."{parent}" THEN
    RETURN NEW;
  END IF;
  IF OLD."{parent}" IS NOT NULL THEN
    DELETE FROM "{tree}" WHERE id IN (
      SELECT r2.id
      FROM "{tree}" r1
      INNER JOIN "{tree}" r2 ON r1.child_id = r2.child_id
      WHERE r1.parent_id = NEW."{pk}" AND r2.depth > r1.depth
    );
  END IF;
  IF NEW."{parent}" IS NOT NULL THEN
    INSERT INTO "{tree}" (parent_id, child_id, depth)
      SELECT r1.parent_id, r2.child_id, r1.depth + r2.depth + 1
      FROM "{tree}" r1
      INNER JOIN "{tree}" r2 ON r2.parent_id = NEW."{pk}"
      WHERE r1.child_id = NEW."{parent}";
  END IF;
  RETURN NEW;
END;
$BODY$
LANGUAGE 'plpgsql'"#,
            au = opts.trigger_name("au"),
        ));

        if let Some(path) = &opts.path {
            let sep = &opts.path_separator;
            queries.push(format!(
                r#"-- Generate path urls based on {path_from} and position in the tree.
CREATE OR REPLACE FUNCTION "{bi_path}"() RETURNS TRIGGER AS
$BODY$
BEGIN
  IF NEW."{parent}" IS NULL THEN
    NEW."{path}" := NEW."{path_from}";
  ELSE
    SELECT "{path}" || '{sep}' || NEW."{path_from}" INTO NEW."{path}"
    FROM "{table}"
    WHERE "{pk}" = NEW."{parent}";
  END IF;
  RETURN NEW;
END;
$BODY$
LANGUAGE 'plpgsql'"#,
                bi_path = opts.trigger_name("bi_path"),
                path = path.column,
                path_from = path.source,
            ));

            queries.push(format!(
                r#"CREATE OR REPLACE FUNCTION "{bu_path}"() RETURNS TRIGGER AS
$BODY$
DECLARE
  replace_from TEXT := '^';
  replace_to TEXT := '';
BEGIN
  IF OLD."{parent}" IS NOT DISTINCT FROM NEW."{parent}" THEN
    RETURN NEW;
  END IF;
  IF OLD."{parent}" IS NOT NULL THEN
    SELECT '^' || "{path}" || '{sep}' INTO replace_from
    FROM "{table}"
    WHERE "{pk}" = OLD."{parent}";
  END IF;
  IF NEW."{parent}" IS NOT NULL THEN
    SELECT "{path}" || '{sep}' INTO replace_to
    FROM "{table}"
    WHERE "{pk}" = NEW."{parent}";
  END IF;
  NEW."{path}" := regexp_replace( NEW."{path}", replace_from, replace_to );
  UPDATE "{table}"
    SET "{path}" = regexp_replace("{path}", replace_from, replace_to )
    WHERE "{pk}" IN (
      SELECT child_id
      FROM "{tree}"
      WHERE parent_id = NEW."{pk}" AND depth > 0
  );
  RETURN NEW;
END;
$BODY$
LANGUAGE 'plpgsql'"#,
                bu_path = opts.trigger_name("bu_path"),
                path = path.column,
            ));
        }

        queries.push(format!(
            r#"CREATE TRIGGER "{name}" AFTER INSERT ON "{table}" FOR EACH ROW EXECUTE PROCEDURE "{name}"()"#,
            name = opts.trigger_name("ai"),
        ));
        queries.push(format!(
            r#"CREATE TRIGGER "{name}" BEFORE UPDATE ON "{table}" FOR EACH ROW EXECUTE PROCEDURE "{name}"()"#,
            name = opts.trigger_name("bu"),
        ));
        queries.push(format!(
            r#"CREATE TRIGGER "{name}" AFTER UPDATE ON "{table}" FOR EACH ROW EXECUTE PROCEDURE "{name}"()"#,
            name = opts.trigger_name("au"),
        ));
        if opts.path.is_some() {
            queries.push(format!(
                r#"CREATE TRIGGER "{name}" BEFORE INSERT ON "{table}" FOR EACH ROW EXECUTE PROCEDURE "{name}"()"#,
                name = opts.trigger_name("bi_path"),
            ));
            queries.push(format!(
                r#"CREATE TRIGGER "{name}" BEFORE UPDATE ON "{table}" FOR EACH ROW EXECUTE PROCEDURE "{name}"()"#,
                name = opts.trigger_name("bu_path"),
            ));
        }
        queries
    }

    fn drop_table(&self, opts: &TableOptions) -> String {
        format!(r#"DROP TABLE IF EXISTS "{}""#, opts.tree_table())
    }

    fn drop_triggers(&self, opts: &TableOptions) -> Vec<String> {
        let mut queries = Vec::new();
        for suffix in TRIGGER_SUFFIXES {
            queries.push(format!(
                r#"DROP TRIGGER IF EXISTS "{name}" ON "{table}""#,
                name = opts.trigger_name(suffix),
                table = opts.table,
            ));
        }
        for suffix in TRIGGER_SUFFIXES {
            queries.push(format!(
                r#"DROP FUNCTION IF EXISTS "{name}"()"#,
                name = opts.trigger_name(suffix),
            ));
        }
        queries
    }
}

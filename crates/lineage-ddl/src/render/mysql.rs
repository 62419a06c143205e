//! MySQL / MariaDB renderer: DELIMITER-wrapped triggers with SIGNAL
//! error reporting

use crate::options::TableOptions;
use crate::registry::SchemaRenderer;

pub struct MysqlRenderer;

const TRIGGER_SUFFIXES: [&str; 5] = ["ai", "bu", "au", "bi_path", "bu_path"];

impl SchemaRenderer for MysqlRenderer {
    fn create_table(&self, opts: &TableOptions) -> String {
        format!(
            r#"CREATE TABLE `{tree}` (
	id INTEGER AUTO_INCREMENT PRIMARY KEY,
	parent_id {pk_type} NOT NULL REFERENCES `{table}`(`{pk}`) ON DELETE CASCADE,
	child_id {pk_type} NOT NULL REFERENCES `{table}`(`{pk}`) ON DELETE CASCADE,
	depth INTEGER NOT NULL,
	UNIQUE (parent_id, child_id)
) ENGINE=InnoDB DEFAULT CHARSET=utf8"#,
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
DELIMITER $$
CREATE TRIGGER `{ai}` AFTER INSERT ON `{table}`
FOR EACH ROW BEGIN
  INSERT INTO `{tree}` (parent_id, child_id, depth)
    VALUES (NEW.`{pk}`, NEW.`{pk}`, 0);
  INSERT INTO `{tree}` (parent_id, child_id, depth)
    SELECT x.parent_id, NEW.`{pk}`, x.depth + 1
    FROM `{tree}` x
    WHERE x.child_id = NEW.`{parent}`;
END;$$
DELIMITER ;"#,
            ai = opts.trigger_name("ai"),
        ));

        queries.push(format!(
            r#"-- As for moving data around in {table} freely, we should forbid
-- moves that would create loops:
DELIMITER $$
CREATE TRIGGER `{bu}` BEFORE UPDATE ON `{table}`
FOR EACH ROW BEGIN
  IF NEW.`{pk}` <> OLD.`{pk}` THEN
    SIGNAL SQLSTATE '45000' SET MESSAGE_TEXT = 'Changing ids is forbidden.';
  END IF;
  IF NOT (NEW.`{parent}` <=> OLD.`{parent}`) AND NEW.`{parent}` IS NOT NULL AND 0 < (
    SELECT COUNT(child_id)
    FROM `{tree}`
    WHERE child_id = NEW.`{parent}` AND parent_id = NEW.`{pk}`
  )
  THEN
    SIGNAL SQLSTATE '45000' SET MESSAGE_TEXT = 'Update blocked, because it would create loop in tree.';
  END IF;
END;$$
DELIMITER ;"#,
            bu = opts.trigger_name("bu"),
        ));

        queries.push(format!(
            r#"DELIMITER $$
CREATE TRIGGER `{au}` AFTER UPDATE ON `{table}`
FOR EACH ROW BEGIN
  IF NOT (NEW.`{parent}` <=> OLD.`{parent}`) THEN
    IF OLD.`{parent}` IS NOT NULL THEN
      DELETE FROM `{tree}` WHERE id IN (
        SELECT r2.id
        FROM `{tree}` r1
        INNER JOIN `{tree}` r2 ON r1.child_id = r2.child_id
        WHERE r1.parent_id = NEW.`{pk}` AND r2.depth > r1.depth
      );
    END IF;
    IF NEW.`{parent}` IS NOT NULL THEN
      INSERT INTO `{tree}` (parent_id, child_id, depth)
        SELECT r1.parent_id, r2.child_id, r1.depth + r2.depth + 1
        FROM `{tree}` r1
        INNER JOIN `{tree}` r2 ON r2.parent_id = NEW.`{pk}`
        WHERE r1.child_id = NEW.`{parent}`;
    END IF;
  END IF;
END;$$
DELIMITER ;"#,
            au = opts.trigger_name("au"),
        ));

        if let Some(path) = &opts.path {
            let sep = &opts.path_separator;
            queries.push(format!(
                r#"-- Generate path urls based on {path_from} and position in the tree.
DELIMITER $$
CREATE TRIGGER `{bi_path}` BEFORE INSERT ON `{table}`
FOR EACH ROW BEGIN
  IF NEW.`{parent}` IS NULL THEN
    SET NEW.`{path}` = NEW.`{path_from}`;
  ELSE
    SELECT CONCAT(`{path}`, '{sep}', NEW.`{path_from}`) INTO @new_path
    FROM `{table}`
    WHERE `{pk}` = NEW.`{parent}`;
    SET NEW.`{path}` = @new_path;
  END IF;
END;$$
DELIMITER ;"#,
                bi_path = opts.trigger_name("bi_path"),
                path = path.column,
                path_from = path.source,
            ));

            queries.push(format!(
                r#"DELIMITER $$
CREATE TRIGGER `{bu_path}` BEFORE UPDATE ON `{table}`
FOR EACH ROW BEGIN
  IF NOT (NEW.`{parent}` <=> OLD.`{parent}`) THEN
    SET @replace_from = '^';
    SET @replace_to = '';
    IF OLD.`{parent}` IS NOT NULL THEN
      SELECT CONCAT('^', `{path}`, '{sep}') INTO @replace_from
      FROM `{table}`
      WHERE `{pk}` = OLD.`{parent}`;
    END IF;
    IF NEW.`{parent}` IS NOT NULL THEN
      SELECT CONCAT(`{path}`, '{sep}') INTO @replace_to
      FROM `{table}`
      WHERE `{pk}` = NEW.`{parent}`;
    END IF;
    SET NEW.`{path}` = REGEXP_REPLACE(NEW.`{path}`, @replace_from, @replace_to);
    UPDATE `{table}`
      SET `{path}` = REGEXP_REPLACE(`{path}`, @replace_from, @replace_to)
      WHERE `{pk}` IN (
        SELECT child_id
        FROM `{tree}`
        WHERE parent_id = NEW.`{pk}` AND depth > 0
    );
  END IF;
END;$$
DELIMITER ;"#,
                bu_path = opts.trigger_name("bu_path"),
                path = path.column,
            ));
        }
        queries
    }

    fn drop_table(&self, opts: &TableOptions) -> String {
        format!("DROP TABLE IF EXISTS `{}`", opts.tree_table())
    }

    fn drop_triggers(&self, opts: &TableOptions) -> Vec<String> {
        TRIGGER_SUFFIXES
            .iter()
            .map(|suffix| format!("DROP TRIGGER IF EXISTS `{}`", opts.trigger_name(suffix)))
            .collect()
    }
}

//! Drop detection for destructive-query confirmation

use indexmap::IndexSet;

use super::find_table_reference_and_alias;
use crate::dialect::SqlDialect;
use crate::lexer::{tokenize, TokenizeOptions};
use crate::parser::{get_statement_type, simple_parse};

/// Full names of tables the query leaves dropped. A table dropped and then
/// created again later in the same query is not reported.
pub fn get_dropped_tables(query: &str, dialect: SqlDialect) -> Vec<String> {
    let statements = simple_parse(&tokenize(query, &TokenizeOptions::new(dialect)));
    let lineage = find_table_reference_and_alias(&statements);
    let mut dropped: IndexSet<String> = IndexSet::new();

    for (index, statement) in statements.iter().enumerate() {
        let Some(references) = lineage.references.get(&index) else {
            continue;
        };
        match get_statement_type(statement).as_deref() {
            Some("drop") => {
                dropped.extend(references.iter().map(|t| t.full_name()));
            }
            Some("create") => {
                for table in references {
                    dropped.shift_remove(&table.full_name());
                }
            }
            _ => {}
        }
    }

    dropped.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_then_create_is_not_dropped() {
        let dropped = get_dropped_tables("DROP TABLE a; CREATE TABLE a (id int);", SqlDialect::Hive);
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_multiple_drops_keep_order() {
        let dropped = get_dropped_tables("DROP TABLE a; DROP TABLE b;", SqlDialect::Hive);
        assert_eq!(dropped, vec!["default.a", "default.b"]);
    }

    #[test]
    fn test_create_before_drop_still_drops() {
        let dropped = get_dropped_tables(
            "CREATE TABLE x.a (id int); DROP TABLE IF EXISTS x.a",
            SqlDialect::Presto,
        );
        assert_eq!(dropped, vec!["x.a"]);
    }
}

// Integration tests for table references, aliases and drop detection
use pretty_assertions::assert_eq;
use sqlsift_core::analyzer::{get_dropped_tables, CodeAnalysis, Lineage, TableToken};
use sqlsift_core::dialect::SqlDialect;

fn lineage(query: &str) -> Lineage {
    CodeAnalysis::new(query, SqlDialect::Hive).lineage
}

fn names(lineage: &Lineage, statement: usize) -> Vec<String> {
    lineage
        .references
        .get(&statement)
        .map(|tables| tables.iter().map(TableToken::full_name).collect())
        .unwrap_or_default()
}

#[test]
fn test_join_with_aliases() {
    let lineage = lineage("SELECT * FROM orders o JOIN users u ON o.user_id = u.id");
    assert_eq!(names(&lineage, 0), vec!["default.orders", "default.users"]);

    let aliases: Vec<(&str, String)> = lineage.aliases[&0]
        .iter()
        .map(|(alias, table)| (alias.as_str(), table.full_name()))
        .collect();
    assert_eq!(
        aliases,
        vec![
            ("o", "default.orders".to_string()),
            ("u", "default.users".to_string())
        ]
    );
}

#[test]
fn test_use_changes_default_schema() {
    let lineage = lineage("USE sales; SELECT * FROM orders;");
    assert_eq!(names(&lineage, 0), Vec::<String>::new());
    assert_eq!(names(&lineage, 1), vec!["sales.orders"]);
}

#[test]
fn test_cte_names_are_not_tables() {
    let lineage = lineage("WITH recent AS (SELECT * FROM orders) SELECT * FROM recent");
    assert_eq!(names(&lineage, 0), vec!["default.orders"]);
}

#[test]
fn test_subquery_tables_and_alias() {
    let lineage = lineage(
        "select * from (select id from events e where e.ds = '2024-01-01') sub \
         join dim.users as u on sub.id = u.id",
    );
    assert_eq!(names(&lineage, 0), vec!["default.events", "dim.users"]);
    assert_eq!(
        lineage.resolve_alias(0, "u").map(TableToken::full_name),
        Some("dim.users".to_string())
    );
    assert_eq!(
        lineage.resolve_alias(0, "e").map(TableToken::full_name),
        Some("default.events".to_string())
    );
}

#[test]
fn test_table_positions() {
    let lineage = lineage("select *\nfrom  db.t");
    let table = &lineage.references[&0][0];
    assert_eq!((table.line, table.start, table.end), (1, 6, 10));
}

#[test]
fn test_names_are_lowercased_and_backticks_stripped() {
    let lineage = lineage("select * from `My_DB`.`Events`");
    assert_eq!(names(&lineage, 0), vec!["my_db.events"]);
}

#[test]
fn test_insert_select() {
    let lineage = lineage("insert overwrite table agg.daily select * from raw.events");
    assert_eq!(names(&lineage, 0), vec!["agg.daily", "raw.events"]);
}

#[test]
fn test_dropped_tables() {
    let dropped = get_dropped_tables(
        "drop table a; drop table if exists s.b; drop table c; create table c (id int)",
        SqlDialect::Hive,
    );
    assert_eq!(dropped, vec!["default.a", "s.b"]);
}

#[test]
fn test_lineage_serializes() {
    let lineage = lineage("select * from t");
    let json = serde_json::to_value(&lineage).unwrap();
    assert_eq!(json["references"]["0"][0]["name"], "t");
}

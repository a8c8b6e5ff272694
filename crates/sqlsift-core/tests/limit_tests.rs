// Integration tests for LIMIT inspection and injection
use pretty_assertions::assert_eq;
use sqlsift_core::dialect::SqlDialect;
use sqlsift_core::limit::{get_limited_query, get_select_statement_limit, StatementLimit};

#[test]
fn test_query_with_limit_is_returned_untouched() {
    let query = "SELECT * FROM t LIMIT 5";
    assert_eq!(get_limited_query(query, Some(100), SqlDialect::Presto), query);

    let messy = "  select *\n\n from t   limit 5 ;\n\n";
    assert_eq!(get_limited_query(messy, Some(100), SqlDialect::Presto), messy);
}

#[test]
fn test_no_row_limit_means_no_change() {
    let query = "select * from t";
    assert_eq!(get_limited_query(query, None, SqlDialect::Presto), query);
}

#[test]
fn test_limit_added_only_where_missing() {
    let query = "use db;\nselect * from a;\nselect * from b limit 3;\nselect count(*) from c";
    assert_eq!(
        get_limited_query(query, Some(100), SqlDialect::Hive),
        "use db;\nselect * from a\nLIMIT 100;\nselect * from b limit 3;\nselect count(*) from c\nLIMIT 100;"
    );
}

#[test]
fn test_subquery_limit_does_not_satisfy_outer_query() {
    assert_eq!(
        get_limited_query(
            "select * from (select * from t limit 1) x",
            Some(10),
            SqlDialect::Presto
        ),
        "select * from (select * from t limit 1) x\nLIMIT 10;"
    );
}

#[test]
fn test_union_and_fetch() {
    assert_eq!(
        get_select_statement_limit("select 1 union all select 2", SqlDialect::Presto),
        StatementLimit::Missing
    );
    assert_eq!(
        get_select_statement_limit(
            "select * from t order by a fetch next 1 row only",
            SqlDialect::PostgreSQL
        ),
        StatementLimit::Limit(1)
    );
}

#[test]
fn test_non_select_statements_are_not_applicable() {
    for statement in [
        "insert into t select * from s",
        "create table t as select 1",
        "create table t as select a from x union all select b from y",
        "insert into t select a from x union select b from y",
        "show tables",
        "",
    ] {
        assert_eq!(
            get_select_statement_limit(statement, SqlDialect::Hive),
            StatementLimit::NotApplicable,
            "{statement}"
        );
    }
}

#[test]
fn test_set_operations_inside_writes_are_not_limited() {
    let ctas = "create table t as select a from x union all select b from y";
    assert_eq!(get_limited_query(ctas, Some(100), SqlDialect::Hive), ctas);

    let bracketed = "(select a from x) union (select b from y)";
    assert_eq!(
        get_limited_query(bracketed, Some(100), SqlDialect::Hive),
        "(select a from x) union (select b from y)\nLIMIT 100;"
    );
}

#[test]
fn test_oversized_limit_is_still_a_limit() {
    let query = "select * from t limit 99999999999999999999";
    assert_eq!(get_limited_query(query, Some(100), SqlDialect::Hive), query);
}

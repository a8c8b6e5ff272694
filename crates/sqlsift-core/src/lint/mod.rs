//! Query linters
//!
//! Context-free rules look only at token shapes. Context-sensitive rules check
//! the resolved lineage against a metastore.

mod context_sensitive;

use crate::dialect::SqlDialect;
use crate::error::{LintRule, LinterWarning};
use crate::lexer::{Token, TokenType};

pub use context_sensitive::{get_context_sensitive_warnings, MissingTableCache};

type LintFn = fn(&[Token]) -> Vec<LinterWarning>;

const HIVE_RULES: &[LintFn] = &[lint_count_distinct];
const PRESTO_RULES: &[LintFn] = &[lint_missing_limit];

fn context_free_rules(dialect: SqlDialect) -> &'static [LintFn] {
    match dialect {
        SqlDialect::Hive | SqlDialect::SparkSql => HIVE_RULES,
        SqlDialect::Presto | SqlDialect::Trino => PRESTO_RULES,
        _ => &[],
    }
}

/// Run the dialect's token-shape rules over simple-parsed statements
pub fn get_context_free_linter_warnings(
    statements: &[Vec<Token>],
    dialect: SqlDialect,
) -> Vec<LinterWarning> {
    let rules = context_free_rules(dialect);
    statements
        .iter()
        .flat_map(|statement| rules.iter().flat_map(move |rule| rule(statement)))
        .collect()
}

/// `count ( distinct` runs on a single reducer in Hive
fn lint_count_distinct(statement: &[Token]) -> Vec<LinterWarning> {
    statement
        .windows(3)
        .filter(|window| {
            window[0].text.eq_ignore_ascii_case("count")
                && window[1].token_type == TokenType::Bracket
                && window[1].text == "("
                && window[2].is_keyword("distinct")
        })
        .map(|window| {
            LinterWarning::warning(
                LintRule::CountDistinct,
                "count(distinct ...) is computed by a single reducer and can be very slow; \
                 consider counting over a GROUP BY subquery",
            )
            .spanning(&window[0], &window[2])
        })
        .collect()
}

/// SELECT statements should end in `LIMIT <n>`
fn lint_missing_limit(statement: &[Token]) -> Vec<LinterWarning> {
    let (Some(first), Some(last)) = (statement.first(), statement.last()) else {
        return Vec::new();
    };
    if !first.is_keyword("select") {
        return Vec::new();
    }

    let has_limit = match statement {
        [.., limit, count] => limit.is_keyword("limit") && count.token_type == TokenType::Number,
        _ => false,
    };
    if has_limit {
        return Vec::new();
    }

    vec![LinterWarning::warning(
        LintRule::MissingLimit,
        "SELECT without LIMIT may scan and return the whole table",
    )
    .spanning(first, last)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Position;
    use crate::lexer::{tokenize, TokenizeOptions};
    use crate::parser::simple_parse;

    fn lint(code: &str, dialect: SqlDialect) -> Vec<LinterWarning> {
        let statements = simple_parse(&tokenize(code, &TokenizeOptions::new(dialect)));
        get_context_free_linter_warnings(&statements, dialect)
    }

    #[test]
    fn test_hive_count_distinct() {
        let warnings = lint("select COUNT(DISTINCT user_id) from t", SqlDialect::Hive);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, LintRule::CountDistinct);
        assert_eq!(warnings[0].from, Position::new(0, 7));
        assert_eq!(warnings[0].to, Position::new(0, 21));
    }

    #[test]
    fn test_hive_plain_count_is_fine() {
        assert!(lint("select count(user_id) from t", SqlDialect::Hive).is_empty());
    }

    #[test]
    fn test_presto_missing_limit() {
        let warnings = lint("select * from t;\nselect * from t limit 10", SqlDialect::Presto);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, LintRule::MissingLimit);
        assert_eq!(warnings[0].from, Position::new(0, 0));
        assert_eq!(warnings[0].to, Position::new(0, 15));
    }

    #[test]
    fn test_presto_ignores_non_select() {
        assert!(lint("insert into t select * from s", SqlDialect::Trino).is_empty());
    }

    #[test]
    fn test_rules_are_dialect_specific() {
        assert!(lint("select count(distinct a) from t", SqlDialect::Presto)
            .iter()
            .all(|w| w.rule != LintRule::CountDistinct));
        assert!(lint("select * from t", SqlDialect::MySQL).is_empty());
    }
}

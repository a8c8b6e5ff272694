//! Table reference resolver - finds table names and their aliases in
//! simple-parsed statements

use std::collections::HashSet;

use indexmap::IndexMap;

use super::{Lineage, TableToken, DEFAULT_SCHEMA};
use crate::lexer::{Token, TokenType};

/// Keywords a resolvable statement may start with
const INITIAL_STATEMENT_KEYWORDS: &[&str] = &[
    "select", "insert", "update", "delete", "with", "create", "alter", "drop", "describe",
    "desc", "show", "msck", "use",
];

/// Statement-leading keywords directly followed by a table name.
/// `update` is included so `UPDATE t SET ...` reports `t`.
const INITIAL_STATEMENT_TABLE_KEYWORDS: &[&str] = &["describe", "desc", "show", "msck", "update"];

/// Keywords that introduce a table name
const TABLE_KEYWORDS: &[&str] = &["table", "from", "join", "into"];

/// Keywords that do not end table search (`DROP TABLE IF NOT EXISTS x`)
const TABLE_SEARCH_CONTINUATION: &[&str] = &[
    "if", "not", "exists", "formatted", "repair", "partitions", "extended",
];

/// Keywords that end a WITH clause's CTE definitions
const DML_KEYWORDS: &[&str] = &["select", "insert", "update", "delete"];

/// Preceding keywords that stop a table keyword from introducing a table
/// (`a IS DISTINCT FROM b`)
fn table_keyword_denylist(keyword: &str) -> &'static [&'static str] {
    match keyword {
        "from" => &["distinct"],
        _ => &[],
    }
}

/// Result of resolving one statement
#[derive(Debug)]
enum StatementLineage {
    /// `USE <schema>` switches the default schema for later statements
    Use(String),
    Tables {
        references: Vec<TableToken>,
        aliases: IndexMap<String, TableToken>,
    },
    Skipped,
}

/// Find table references and aliases for every statement.
///
/// The default schema starts as `default` and is threaded through the
/// statements, so a `USE` only affects the statements after it.
pub fn find_table_reference_and_alias(statements: &[Vec<Token>]) -> Lineage {
    let mut lineage = Lineage::default();

    statements.iter().enumerate().fold(
        DEFAULT_SCHEMA.to_string(),
        |default_schema, (index, statement)| match resolve_statement(statement, &default_schema)
        {
            StatementLineage::Use(schema) => schema,
            StatementLineage::Tables {
                references,
                aliases,
            } => {
                lineage.references.insert(index, references);
                lineage.aliases.insert(index, aliases);
                default_schema
            }
            StatementLineage::Skipped => default_schema,
        },
    );

    lineage
}

fn resolve_statement(statement: &[Token], default_schema: &str) -> StatementLineage {
    let tokens = match statement.first() {
        Some(first) if first.is_keyword("explain") => &statement[1..],
        _ => statement,
    };

    let Some(first) = tokens.first() else {
        return StatementLineage::Skipped;
    };
    if !is_keyword_in(first, INITIAL_STATEMENT_KEYWORDS) {
        return StatementLineage::Skipped;
    }

    if first.is_keyword("use") {
        return match tokens.get(1) {
            Some(schema)
                if matches!(schema.token_type, TokenType::Variable | TokenType::Keyword) =>
            {
                StatementLineage::Use(normalize_name(&schema.text))
            }
            _ => StatementLineage::Skipped,
        };
    }

    let placeholders = find_with_statement_placeholder(tokens);
    let mut references = Vec::new();
    let mut aliases = IndexMap::new();

    let mut table_search_mode = false;
    // One entry per open bracket being walked: is it a subquery
    let mut bracket_query_context: Vec<bool> = Vec::new();
    let mut last_table: Option<(usize, TableToken)> = None;

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];

        match token.token_type {
            TokenType::Bracket if token.is_open_bracket() => {
                let is_subquery = tokens
                    .get(i + 1)
                    .is_some_and(|next| is_keyword_in(next, INITIAL_STATEMENT_KEYWORDS));
                if !is_subquery {
                    // Function call or column list
                    i = token.bracket_index.unwrap_or(i) + 1;
                    continue;
                }
                bracket_query_context.push(true);
            }
            TokenType::Bracket if token.is_close_bracket() => {
                if bracket_query_context.pop() == Some(true) {
                    table_search_mode = false;
                }
            }
            TokenType::Keyword => {
                let keyword = token.text.as_str();
                if i == 0 && INITIAL_STATEMENT_TABLE_KEYWORDS.contains(&keyword) {
                    table_search_mode = true;
                } else if TABLE_KEYWORDS.contains(&keyword) {
                    let denied = i > 0
                        && table_keyword_denylist(keyword)
                            .iter()
                            .any(|prev| tokens[i - 1].is_keyword(prev));
                    table_search_mode = !denied;
                } else if table_search_mode && !TABLE_SEARCH_CONTINUATION.contains(&keyword) {
                    table_search_mode = false;
                }
            }
            TokenType::Variable => {
                let is_placeholder = placeholders.contains(&normalize_name(&token.text));
                if table_search_mode {
                    table_search_mode = false;
                    if !is_placeholder {
                        last_table = sanitize_table(token, default_schema).map(|table| {
                            references.push(table.clone());
                            (i, table)
                        });
                    }
                } else if let Some((table_index, table)) = &last_table {
                    if !is_placeholder
                        && !token.text.contains('.')
                        && is_alias_position(tokens, i, *table_index)
                    {
                        aliases.insert(token.text.clone(), table.clone());
                    }
                }
            }
            _ => {}
        }

        i += 1;
    }

    StatementLineage::Tables {
        references,
        aliases,
    }
}

/// `t alias` or `t AS alias`
fn is_alias_position(tokens: &[Token], index: usize, table_index: usize) -> bool {
    index == table_index + 1 || (index == table_index + 2 && tokens[table_index + 1].is_keyword("as"))
}

fn is_keyword_in(token: &Token, keywords: &[&str]) -> bool {
    token.token_type == TokenType::Keyword && keywords.contains(&token.text.as_str())
}

/// Names introduced by a leading `WITH` clause. They are query-local and must
/// never be reported as tables.
pub fn find_with_statement_placeholder(tokens: &[Token]) -> HashSet<String> {
    let mut placeholders = HashSet::new();
    if !tokens.first().is_some_and(|t| t.is_keyword("with")) {
        return placeholders;
    }

    let mut i = 1;
    while i < tokens.len() {
        let token = &tokens[i];
        if token.is_open_bracket() {
            i = token.bracket_index.unwrap_or(i) + 1;
            continue;
        }
        if is_keyword_in(token, DML_KEYWORDS) {
            break;
        }
        if token.token_type == TokenType::Variable {
            placeholders.insert(normalize_name(&token.text));
        }
        i += 1;
    }

    placeholders
}

/// Resolve a raw table token to `schema.name`. Names with zero or more than
/// two parts cannot be resolved and are dropped.
pub fn sanitize_table(token: &Token, default_schema: &str) -> Option<TableToken> {
    let parts = split_qualified_name(&token.text);
    let (schema, name) = match parts.as_slice() {
        [name] if !name.is_empty() => (default_schema.to_string(), name.to_lowercase()),
        [schema, name] if !schema.is_empty() && !name.is_empty() => {
            (schema.to_lowercase(), name.to_lowercase())
        }
        _ => {
            tracing::warn!(
                table = %token.text,
                parts = parts.len(),
                "cannot resolve table reference"
            );
            return None;
        }
    };

    Some(TableToken {
        schema,
        name,
        line: token.line,
        start: token.start,
        end: token.end,
    })
}

/// Split a dotted name, ignoring dots inside backticks and dropping the backticks
fn split_qualified_name(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in text.chars() {
        match ch {
            '`' => quoted = !quoted,
            '.' if !quoted => parts.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    parts.push(current);
    parts
}

fn normalize_name(text: &str) -> String {
    text.replace('`', "").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SqlDialect;
    use crate::lexer::{tokenize, TokenizeOptions};
    use crate::parser::simple_parse;

    fn statements(code: &str) -> Vec<Vec<Token>> {
        simple_parse(&tokenize(code, &TokenizeOptions::new(SqlDialect::Hive)))
    }

    fn table_names(lineage: &Lineage, index: usize) -> Vec<String> {
        lineage.references[&index]
            .iter()
            .map(TableToken::full_name)
            .collect()
    }

    #[test]
    fn test_split_qualified_name() {
        assert_eq!(split_qualified_name("a.b"), vec!["a", "b"]);
        assert_eq!(split_qualified_name("`a.b`.c"), vec!["a.b", "c"]);
        assert_eq!(split_qualified_name("t"), vec!["t"]);
    }

    #[test]
    fn test_sanitize_rejects_three_parts() {
        let token = Token::new(TokenType::Variable, "a.b.c", 0, 0, 5);
        assert!(sanitize_table(&token, "default").is_none());

        let token = Token::new(TokenType::Variable, "`Sales`.Orders", 2, 4, 18);
        let table = sanitize_table(&token, "default").unwrap();
        assert_eq!(table.full_name(), "sales.orders");
        assert_eq!((table.line, table.start, table.end), (2, 4, 18));
    }

    #[test]
    fn test_with_placeholders() {
        let stmts = statements("with a as (select 1), b (x, y) as (select 2) select * from a join b");
        let placeholders = find_with_statement_placeholder(&stmts[0]);
        assert_eq!(placeholders.len(), 2);
        assert!(placeholders.contains("a"));
        assert!(placeholders.contains("b"));
        assert!(!placeholders.contains("x"));
    }

    #[test]
    fn test_drop_if_exists() {
        let lineage = find_table_reference_and_alias(&statements("DROP TABLE IF EXISTS db.t"));
        assert_eq!(table_names(&lineage, 0), vec!["db.t"]);
    }

    #[test]
    fn test_describe_and_msck() {
        let lineage = find_table_reference_and_alias(&statements(
            "describe formatted t1; msck repair table t2; show partitions t3",
        ));
        assert_eq!(table_names(&lineage, 0), vec!["default.t1"]);
        assert_eq!(table_names(&lineage, 1), vec!["default.t2"]);
        assert_eq!(table_names(&lineage, 2), vec!["default.t3"]);
    }

    #[test]
    fn test_function_brackets_are_skipped() {
        let lineage = find_table_reference_and_alias(&statements(
            "select extract(year from ts), count(x) from events",
        ));
        assert_eq!(table_names(&lineage, 0), vec!["default.events"]);
    }

    #[test]
    fn test_is_distinct_from_is_not_a_table() {
        let lineage = find_table_reference_and_alias(&statements(
            "select * from t where a is distinct from b",
        ));
        assert_eq!(table_names(&lineage, 0), vec!["default.t"]);
    }

    #[test]
    fn test_unrecognized_statement_is_skipped() {
        let lineage = find_table_reference_and_alias(&statements("grant select on t to bob"));
        assert!(lineage.references.is_empty());
    }

    #[test]
    fn test_explain_prefix() {
        let lineage = find_table_reference_and_alias(&statements("explain select * from t x"));
        assert_eq!(table_names(&lineage, 0), vec!["default.t"]);
        assert!(lineage.aliases[&0].contains_key("x"));
    }

    #[test]
    fn test_update_target() {
        let lineage = find_table_reference_and_alias(&statements("update t set a = 1"));
        assert_eq!(table_names(&lineage, 0), vec!["default.t"]);
    }
}

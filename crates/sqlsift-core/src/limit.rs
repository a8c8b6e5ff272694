//! LIMIT inspection and injection for SELECT statements

use serde::{Deserialize, Serialize};

use crate::dialect::SqlDialect;
use crate::lexer::{tokenize, Token, TokenType, TokenizeOptions};
use crate::lines::EditorLines;
use crate::parser::{assign_bracket_indices, get_statement_type};

/// Row limit of a single statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementLimit {
    /// The statement does not return rows that can be limited
    NotApplicable,
    /// A row-returning statement without a limit
    Missing,
    Limit(u64),
}

/// Keywords that make a statement a set operation over SELECTs
const SET_OPERATORS: &[&str] = &["union", "intersect", "except"];

/// Find the row limit of a single statement
pub fn get_select_statement_limit(statement: &str, dialect: SqlDialect) -> StatementLimit {
    let mut tokens: Vec<Token> = tokenize(statement, &TokenizeOptions::new(dialect))
        .into_iter()
        .filter(|t| t.token_type != TokenType::Comment && t.token_type != TokenType::Semi)
        .collect();
    assign_bracket_indices(&mut tokens);
    let outer = outer_statement(&tokens);

    // Only a bracketed leading operand makes a set operation row-returning on
    // its own; `insert ... select ... union ...` must stay untouched.
    let is_select = get_statement_type(&tokens).as_deref() == Some("select");
    let is_set_operation = outer.first().is_some_and(|t| t.is_open_bracket())
        && outer
            .iter()
            .any(|t| SET_OPERATORS.iter().any(|op| t.is_keyword(op)));
    if !is_select && !is_set_operation {
        return StatementLimit::NotApplicable;
    }

    trailing_limit(&outer)
        .or_else(|| fetch_limit(&outer))
        .map_or(StatementLimit::Missing, StatementLimit::Limit)
}

/// Tokens outside any bracket. Bracket groups collapse to their opening bracket.
fn outer_statement(tokens: &[Token]) -> Vec<&Token> {
    let mut outer = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        outer.push(token);
        i = match token.bracket_index {
            Some(close) if token.is_open_bracket() => close.max(i) + 1,
            _ => i + 1,
        };
    }
    outer
}

/// Any NUMBER token counts; values past `u64::MAX` saturate
fn number_value(token: &Token) -> Option<u64> {
    if token.token_type != TokenType::Number {
        return None;
    }
    let value = token
        .text
        .parse::<u64>()
        .or_else(|_| token.text.parse::<f64>().map(|n| n as u64))
        .unwrap_or(u64::MAX);
    Some(value)
}

/// `LIMIT n`, `LIMIT n OFFSET m` or MySQL's `LIMIT m, n` at the end of the statement
fn trailing_limit(outer: &[&Token]) -> Option<u64> {
    match outer {
        [.., limit, offset, comma, count]
            if limit.is_keyword("limit")
                && number_value(offset).is_some()
                && comma.token_type == TokenType::Comma =>
        {
            number_value(count)
        }
        [.., limit, count, offset_kw, offset]
            if limit.is_keyword("limit")
                && offset_kw.is_keyword("offset")
                && number_value(offset).is_some() =>
        {
            number_value(count)
        }
        [.., limit, count] if limit.is_keyword("limit") => number_value(count),
        _ => None,
    }
}

/// `FETCH FIRST|NEXT n ROW|ROWS`
fn fetch_limit(outer: &[&Token]) -> Option<u64> {
    outer.windows(4).rev().find_map(|window| {
        let [fetch, first, count, rows] = window else {
            return None;
        };
        let is_fetch = fetch.is_keyword("fetch")
            && (first.is_keyword("first") || first.is_keyword("next"))
            && (rows.is_keyword("rows") || rows.is_keyword("row"));
        if is_fetch {
            number_value(count)
        } else {
            None
        }
    })
}

/// Split a query into trimmed statement texts on top-level semicolons
pub fn get_statements_from_query(query: &str, dialect: SqlDialect) -> Vec<&str> {
    let lines = EditorLines::new(query);
    let tokens = tokenize(query, &TokenizeOptions::new(dialect));

    let mut statements = Vec::new();
    let mut start = 0;
    for semi in tokens.iter().filter(|t| t.token_type == TokenType::Semi) {
        let end = lines.offset(semi.start_position());
        statements.push(query[start..end].trim());
        start = end + 1;
    }
    statements.push(query[start.min(query.len())..].trim());

    statements.retain(|statement| !statement.is_empty());
    statements
}

/// Append `LIMIT row_limit` to every row-returning statement that lacks one.
///
/// When no statement needs a limit the query is returned untouched.
pub fn get_limited_query(query: &str, row_limit: Option<u64>, dialect: SqlDialect) -> String {
    let Some(row_limit) = row_limit else {
        return query.to_string();
    };

    let mut added_limit = false;
    let statements: Vec<String> = get_statements_from_query(query, dialect)
        .into_iter()
        .map(|statement| {
            if get_select_statement_limit(statement, dialect) == StatementLimit::Missing {
                added_limit = true;
                format!("{}\nLIMIT {}", statement, row_limit)
            } else {
                statement.to_string()
            }
        })
        .collect();

    if !added_limit {
        return query.to_string();
    }

    tracing::debug!(row_limit, "added limit to query");
    statements
        .iter()
        .map(|statement| format!("{};", statement))
        .collect::<Vec<_>>()
        .join("\n")
}

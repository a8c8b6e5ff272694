//! Pretty-printer backends

use sqlparser::parser::Parser;

use super::{FormatOptions, KeywordCase};
use crate::dialect::SqlDialect;
use crate::error::{Error, Result};
use crate::lexer::{tokenize, Token, TokenType, TokenizeOptions};
use crate::lines::EditorLines;

/// Formats a single statement. Input never contains templating syntax or a
/// trailing semicolon.
pub trait SqlPrettyPrinter {
    fn format_statement(
        &self,
        statement: &str,
        dialect: SqlDialect,
        options: &FormatOptions,
    ) -> Result<String>;
}

/// Prints through the `sqlparser` AST, then lays the canonical text out one
/// clause per line
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlParserPrinter;

impl SqlPrettyPrinter for SqlParserPrinter {
    fn format_statement(
        &self,
        statement: &str,
        dialect: SqlDialect,
        options: &FormatOptions,
    ) -> Result<String> {
        let parser_dialect = dialect.parser_dialect();
        let statements = Parser::parse_sql(parser_dialect.as_ref(), statement)?;
        let [parsed] = statements.as_slice() else {
            return Err(Error::StatementCount {
                count: statements.len(),
            });
        };
        Ok(layout(&parsed.to_string(), dialect, options))
    }
}

/// Keywords that start a new line at the top level
const CLAUSE_KEYWORDS: &[&str] = &[
    "select", "from", "where", "group", "having", "order", "limit", "offset", "fetch", "union",
    "intersect", "except", "join", "left", "right", "inner", "full", "cross", "natural", "window",
    "qualify", "values", "set",
];

/// Keywords that may precede `join` on the same line
const JOIN_PREFIXES: &[&str] = &[
    "left", "right", "inner", "full", "cross", "natural", "outer", "semi", "anti",
];

fn indent_unit(options: &FormatOptions) -> String {
    if options.use_tabs {
        "\t".to_string()
    } else {
        " ".repeat(options.tab_width)
    }
}

/// Apply keyword case to a keyword's source text
pub(super) fn recase(text: &str, case: KeywordCase) -> String {
    match case {
        KeywordCase::Upper => text.to_uppercase(),
        KeywordCase::Lower => text.to_lowercase(),
    }
}

/// Source text of a token, re-cased when it is a keyword
pub(super) fn token_text(lines: &EditorLines<'_>, token: &Token, case: KeywordCase) -> String {
    let text = lines.slice(token.start_position(), token.end_position());
    if token.token_type == TokenType::Keyword {
        recase(text, case)
    } else {
        text.to_string()
    }
}

fn breaks_line(tokens: &[Token], i: usize) -> bool {
    let token = &tokens[i];
    if i == 0 || !CLAUSE_KEYWORDS.iter().any(|k| token.is_keyword(k)) {
        return false;
    }
    if token.is_keyword("join") && JOIN_PREFIXES.iter().any(|k| tokens[i - 1].is_keyword(k)) {
        return false;
    }
    // `LEFT(x, 1)` and friends are function calls
    !tokens.get(i + 1).is_some_and(Token::is_open_bracket)
}

/// Lay out single-line SQL: top-level clauses on their own line, select items
/// one per indented line, keywords re-cased.
pub fn layout(sql: &str, dialect: SqlDialect, options: &FormatOptions) -> String {
    let lines = EditorLines::new(sql);
    let tokens = tokenize(
        sql,
        &TokenizeOptions {
            dialect,
            include_unknown: true,
        },
    );
    let indent = indent_unit(options);

    let mut out = String::with_capacity(sql.len() + sql.len() / 4);
    let mut depth = 0usize;
    let mut in_select = false;
    let mut item_break = false;

    for (i, token) in tokens.iter().enumerate() {
        let top_level = depth == 0;
        let separated = i > 0
            && !lines
                .slice(tokens[i - 1].end_position(), token.start_position())
                .is_empty();
        let clause_start = top_level && breaks_line(&tokens, i);
        let select_modifier = in_select
            && (token.is_keyword("distinct") || token.is_keyword("all"))
            && tokens[i - 1].is_keyword("select");

        if clause_start {
            out.push('\n');
        } else if item_break && !select_modifier {
            out.push('\n');
            out.push_str(&indent);
            item_break = false;
        } else if separated {
            out.push(' ');
        }
        out.push_str(&token_text(&lines, token, options.case));

        if token.is_open_bracket() {
            depth += 1;
        } else if token.is_close_bracket() {
            depth = depth.saturating_sub(1);
        }

        if clause_start || i == 0 {
            in_select = token.is_keyword("select");
            item_break = in_select;
        } else if top_level && in_select && token.token_type == TokenType::Comma {
            item_break = true;
        }
    }

    out
}

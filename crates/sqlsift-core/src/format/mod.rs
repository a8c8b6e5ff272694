//! Query formatting around a pluggable pretty-printer
//!
//! Templating syntax and URLs are swapped for placeholder identifiers before
//! a statement reaches the printer and restored afterwards. Statements the
//! printer cannot be trusted with are re-emitted from their tokens.

mod printer;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::dialect::SqlDialect;
use crate::error::{Position, Result};
use crate::lexer::{tokenize, Token, TokenType, TokenizeOptions};
use crate::lines::EditorLines;

pub use printer::{layout, SqlParserPrinter, SqlPrettyPrinter};

/// Printers may re-case identifiers, so placeholders are matched case-insensitively.
/// They start with a letter since some dialects reject a leading underscore.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)sqlsift_tpl_(\d+)_").unwrap());

/// Statement types sent to the pretty-printer
const FORMATTABLE_STATEMENTS: &[&str] = &[
    "select", "insert", "delete", "update", "alter", "create", "desc", "with", "describe", "show",
];

/// Keyword casing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCase {
    #[default]
    Upper,
    Lower,
}

/// Formatting options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub case: KeywordCase,
    pub tab_width: usize,
    pub use_tabs: bool,
    /// Return the query unchanged instead of failing
    pub silent: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            case: KeywordCase::Upper,
            tab_width: 2,
            use_tabs: false,
            silent: true,
        }
    }
}

/// Format a query with the default printer
pub fn format(query: &str, dialect: SqlDialect, options: &FormatOptions) -> Result<String> {
    format_with(&SqlParserPrinter, query, dialect, options)
}

/// Format a query with a caller-supplied printer
pub fn format_with<P: SqlPrettyPrinter + ?Sized>(
    printer: &P,
    query: &str,
    dialect: SqlDialect,
    options: &FormatOptions,
) -> Result<String> {
    match format_statements(printer, query, dialect, options) {
        Ok(formatted) => Ok(formatted),
        Err(err) if options.silent => {
            tracing::warn!(error = %err, "formatting failed, keeping the original query");
            Ok(query.to_string())
        }
        Err(err) => Err(err),
    }
}

/// Tokens of one statement plus its terminating semicolon, if any
struct StatementTokens<'t> {
    tokens: Vec<&'t Token>,
    semi: Option<&'t Token>,
}

impl StatementTokens<'_> {
    fn start(&self) -> Position {
        self.tokens
            .first()
            .or(self.semi.as_ref())
            .map(|t| t.start_position())
            .unwrap_or_default()
    }

    fn end(&self) -> Position {
        self.semi
            .or(self.tokens.last().copied())
            .map(|t| t.end_position())
            .unwrap_or_default()
    }
}

fn group_statements(tokens: &[Token]) -> Vec<StatementTokens<'_>> {
    let mut statements = Vec::new();
    let mut current = Vec::new();
    for token in tokens {
        if token.token_type == TokenType::Semi {
            statements.push(StatementTokens {
                tokens: std::mem::take(&mut current),
                semi: Some(token),
            });
        } else {
            current.push(token);
        }
    }
    if !current.is_empty() {
        statements.push(StatementTokens {
            tokens: current,
            semi: None,
        });
    }
    statements
}

fn format_statements<P: SqlPrettyPrinter + ?Sized>(
    printer: &P,
    query: &str,
    dialect: SqlDialect,
    options: &FormatOptions,
) -> Result<String> {
    let lines = EditorLines::new(query);
    let tokens = tokenize(
        query,
        &TokenizeOptions {
            dialect,
            include_unknown: true,
        },
    );
    let statements = group_statements(&tokens);

    let mut out = String::with_capacity(query.len());
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 {
            let newlines = lines.newlines_between(statements[i - 1].end(), statement.start());
            if newlines == 0 {
                out.push(' ');
            } else {
                out.push_str(&"\n".repeat(newlines));
            }
        }
        out.push_str(&format_statement(printer, &lines, statement, dialect, options)?);
        if statement.semi.is_some() {
            out.push(';');
        }
    }
    Ok(out)
}

fn format_statement<P: SqlPrettyPrinter + ?Sized>(
    printer: &P,
    lines: &EditorLines<'_>,
    statement: &StatementTokens<'_>,
    dialect: SqlDialect,
    options: &FormatOptions,
) -> Result<String> {
    let body_start = statement
        .tokens
        .iter()
        .position(|t| t.token_type != TokenType::Comment);
    let Some(body_start) = body_start else {
        return Ok(reconstruct(lines, &statement.tokens, options));
    };
    let (leading, body) = statement.tokens.split_at(body_start);

    let formattable = body[0].token_type == TokenType::Keyword
        && FORMATTABLE_STATEMENTS.contains(&body[0].text.as_str())
        && body.iter().all(|t| t.token_type != TokenType::Comment);
    if !formattable {
        return Ok(reconstruct(lines, &statement.tokens, options));
    }

    let mut out = String::new();
    if let Some(first) = leading.first() {
        out.push_str(lines.slice(first.start_position(), body[0].start_position()));
    }

    let (text, placeholders) = replace_placeholders(lines, body);
    let formatted = printer.format_statement(&text, dialect, options)?;
    out.push_str(&restore_placeholders(&formatted, &placeholders));
    Ok(out)
}

/// Re-emit tokens with their original spacing and re-cased keywords
fn reconstruct(lines: &EditorLines<'_>, tokens: &[&Token], options: &FormatOptions) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push_str(lines.slice(tokens[i - 1].end_position(), token.start_position()));
        }
        out.push_str(&printer::token_text(lines, token, options.case));
    }
    out
}

fn is_placeholder_token(token: &Token) -> bool {
    matches!(
        token.token_type,
        TokenType::TemplatedTag | TokenType::TemplatedBlock | TokenType::Url
    )
}

/// Statement text with templated tokens swapped for `sqlsift_tpl_N_`
/// identifiers, plus the original text of each, indexed by `N`
fn replace_placeholders(lines: &EditorLines<'_>, body: &[&Token]) -> (String, Vec<String>) {
    let mut text = String::new();
    let mut placeholders = Vec::new();
    for (i, token) in body.iter().enumerate() {
        if i > 0 {
            text.push_str(lines.slice(body[i - 1].end_position(), token.start_position()));
        }
        let original = lines.slice(token.start_position(), token.end_position());
        if is_placeholder_token(token) {
            text.push_str(&format!("sqlsift_tpl_{}_", placeholders.len()));
            placeholders.push(original.to_string());
        } else {
            text.push_str(original);
        }
    }
    (text, placeholders)
}

fn restore_placeholders(formatted: &str, placeholders: &[String]) -> String {
    PLACEHOLDER
        .replace_all(formatted, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|n| placeholders.get(n))
                .map_or_else(|| caps[0].to_string(), Clone::clone)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Upper;

    impl SqlPrettyPrinter for Upper {
        fn format_statement(
            &self,
            statement: &str,
            _: SqlDialect,
            _: &FormatOptions,
        ) -> Result<String> {
            Ok(statement.to_uppercase())
        }
    }

    struct Failing;

    impl SqlPrettyPrinter for Failing {
        fn format_statement(&self, _: &str, _: SqlDialect, _: &FormatOptions) -> Result<String> {
            Err(Error::StatementCount { count: 0 })
        }
    }

    #[test]
    fn test_placeholders_survive_the_printer() {
        let formatted = format_with(
            &Upper,
            "select * from t where ds = {{ ds }}",
            SqlDialect::Hive,
            &FormatOptions::default(),
        )
        .unwrap();
        assert_eq!(formatted, "SELECT * FROM T WHERE DS = {{ ds }}");
    }

    #[test]
    fn test_newlines_between_statements_are_kept() {
        let formatted = format_with(
            &Upper,
            "select 1;\n\n\nselect 2;",
            SqlDialect::Presto,
            &FormatOptions::default(),
        )
        .unwrap();
        assert_eq!(formatted, "SELECT 1;\n\n\nSELECT 2;");
    }

    #[test]
    fn test_non_allowlisted_statement_is_reconstructed() {
        let formatted = format_with(
            &Upper,
            "drop   table if exists Foo",
            SqlDialect::Hive,
            &FormatOptions::default(),
        )
        .unwrap();
        assert_eq!(formatted, "DROP   TABLE IF EXISTS Foo");
    }

    #[test]
    fn test_leading_comment_kept_inner_comment_skips_printer() {
        let options = FormatOptions::default();
        let leading = format_with(&Upper, "-- note\nselect a", SqlDialect::Hive, &options).unwrap();
        assert_eq!(leading, "-- note\nSELECT A");

        let inner =
            format_with(&Upper, "select a -- note\nfrom t", SqlDialect::Hive, &options).unwrap();
        assert_eq!(inner, "SELECT a -- note\nFROM t");
    }

    #[test]
    fn test_silent_failure_returns_original() {
        let query = "select 1";
        let options = FormatOptions::default();
        assert_eq!(
            format_with(&Failing, query, SqlDialect::Hive, &options).unwrap(),
            query
        );

        let loud = FormatOptions {
            silent: false,
            ..options
        };
        assert!(format_with(&Failing, query, SqlDialect::Hive, &loud).is_err());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: FormatOptions = serde_json::from_str(r#"{"case": "lower"}"#).unwrap();
        assert_eq!(options.case, KeywordCase::Lower);
        assert_eq!(options.tab_width, 2);
        assert!(options.silent);
    }
}

//! Error and lint warning types

use serde::{Deserialize, Serialize};

use crate::lexer::Token;

/// Errors surfaced by the library
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    #[error("Unknown dialect: '{0}'. Supported dialects: {supported}", supported = crate::dialect::SqlDialect::supported_names())]
    #[diagnostic(code(sqlsift::unknown_dialect))]
    UnknownDialect(String),

    #[error("Failed to format statement: {0}")]
    #[diagnostic(
        code(sqlsift::format),
        help("Pass `silent: true` to keep the original query instead")
    )]
    Format(#[from] sqlparser::parser::ParserError),

    #[error("Printer returned {count} statements for a single statement")]
    #[diagnostic(code(sqlsift::format))]
    StatementCount { count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Position in an editor buffer (0-indexed line, offset within the line)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// Lint warning severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Advisory lint message covering the half-open range `from..to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterWarning {
    pub rule: LintRule,
    pub message: String,
    pub severity: Severity,
    pub from: Position,
    pub to: Position,
}

impl LinterWarning {
    pub fn warning(rule: LintRule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
            severity: Severity::Warning,
            from: Position::default(),
            to: Position::default(),
        }
    }

    pub fn error(rule: LintRule, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(rule, message)
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_range(mut self, from: Position, to: Position) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Cover the source range from the start of `first` to the end of `last`
    pub fn spanning(self, first: &Token, last: &Token) -> Self {
        self.with_range(first.start_position(), last.end_position())
    }

    /// Get the rule code string (e.g., "L001")
    pub fn code(&self) -> &'static str {
        self.rule.code()
    }
}

/// Lint rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LintRule {
    /// L001: `count(distinct ...)` on Hive
    CountDistinct,
    /// L002: SELECT without LIMIT on Presto/Trino
    MissingLimit,
    /// L101: table is missing from the metastore
    TableNotFound,
    /// L102: table carries metastore warnings
    TableWarning,
}

impl LintRule {
    pub fn code(&self) -> &'static str {
        match self {
            LintRule::CountDistinct => "L001",
            LintRule::MissingLimit => "L002",
            LintRule::TableNotFound => "L101",
            LintRule::TableWarning => "L102",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LintRule::CountDistinct => "count-distinct",
            LintRule::MissingLimit => "missing-limit",
            LintRule::TableNotFound => "table-not-found",
            LintRule::TableWarning => "table-warning",
        }
    }

    /// Does `id` name this rule, by code or by name
    pub fn matches(&self, id: &str) -> bool {
        id.eq_ignore_ascii_case(self.code()) || id.eq_ignore_ascii_case(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_matches_code_or_name() {
        assert!(LintRule::MissingLimit.matches("L002"));
        assert!(LintRule::MissingLimit.matches("missing-limit"));
        assert!(LintRule::MissingLimit.matches("l002"));
        assert!(!LintRule::MissingLimit.matches("L001"));
    }

    #[test]
    fn test_error_builder_sets_severity() {
        let warning = LinterWarning::error(LintRule::TableWarning, "broken")
            .with_range(Position::new(1, 2), Position::new(1, 5));
        assert_eq!(warning.severity, Severity::Error);
        assert_eq!(warning.code(), "L102");
        assert_eq!(warning.from, Position::new(1, 2));
    }
}

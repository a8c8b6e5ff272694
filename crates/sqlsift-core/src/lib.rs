//! sqlsift-core: SQL-aware text processing for query editors
//!
//! This library tokenizes SQL cells, resolves the tables they reference,
//! lints them, injects row limits and formats them, without a database
//! connection. A small chart transformer pivots query results for display.

pub mod analyzer;
pub mod chart;
pub mod dialect;
pub mod error;
pub mod format;
pub mod lexer;
pub mod limit;
pub mod lines;
pub mod lint;
pub mod metastore;
pub mod parser;

pub use analyzer::{get_dropped_tables, CodeAnalysis, Lineage, TableToken};
pub use chart::{transform_data, AggType, SortIndex, TransformOptions};
pub use dialect::SqlDialect;
pub use error::{Error, LintRule, LinterWarning, Position, Result, Severity};
pub use format::{format, format_with, FormatOptions, KeywordCase, SqlPrettyPrinter};
pub use lexer::{tokenize, Token, TokenType, TokenizeOptions};
pub use limit::{get_limited_query, get_select_statement_limit, StatementLimit};
pub use lines::{get_editor_lines, EditorLines};
pub use lint::{get_context_free_linter_warnings, get_context_sensitive_warnings, MissingTableCache};
pub use metastore::{DataTable, InMemoryMetastore, MetastoreLookup, MetastoreSnapshot};
pub use parser::simple_parse;

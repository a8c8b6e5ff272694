//! Query lineage: which tables each statement touches and how they are aliased

mod dropped;
mod resolver;

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dialect::SqlDialect;
use crate::error::LinterWarning;
use crate::lexer::{tokenize, Token, TokenizeOptions};
use crate::lint::get_context_free_linter_warnings;
use crate::parser::simple_parse;

pub use dropped::get_dropped_tables;
pub use resolver::{find_table_reference_and_alias, find_with_statement_placeholder, sanitize_table};

/// Schema assumed for bare table names until a `USE` statement changes it
pub const DEFAULT_SCHEMA: &str = "default";

/// A resolved table reference, lowercase-normalized
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableToken {
    pub schema: String,
    pub name: String,
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl TableToken {
    /// `schema.name`
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// Table references and alias bindings, keyed by statement index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub references: BTreeMap<usize, Vec<TableToken>>,
    pub aliases: BTreeMap<usize, IndexMap<String, TableToken>>,
}

impl Lineage {
    /// All references in statement order
    pub fn tables(&self) -> impl Iterator<Item = &TableToken> {
        self.references.values().flatten()
    }

    /// Resolve an alias used in a statement
    pub fn resolve_alias(&self, statement: usize, alias: &str) -> Option<&TableToken> {
        self.aliases.get(&statement)?.get(alias)
    }
}

/// Tokens, statements and lineage of one query
#[derive(Debug, Clone)]
pub struct CodeAnalysis {
    pub dialect: SqlDialect,
    pub tokens: Vec<Token>,
    pub statements: Vec<Vec<Token>>,
    pub lineage: Lineage,
}

impl CodeAnalysis {
    pub fn new(query: &str, dialect: SqlDialect) -> Self {
        let tokens = tokenize(query, &TokenizeOptions::new(dialect));
        let statements = simple_parse(&tokens);
        let lineage = find_table_reference_and_alias(&statements);
        tracing::debug!(
            statements = statements.len(),
            references = lineage.tables().count(),
            "analyzed query"
        );

        Self {
            dialect,
            tokens,
            statements,
            lineage,
        }
    }

    /// Dialect-specific warnings that need no metastore
    pub fn context_free_warnings(&self) -> Vec<LinterWarning> {
        get_context_free_linter_warnings(&self.statements, self.dialect)
    }
}

//! Metastore-aware lint rules

use std::collections::HashMap;
use std::time::{Duration, Instant};

use futures::future::try_join_all;
use indexmap::IndexSet;

use crate::analyzer::{Lineage, TableToken};
use crate::error::{LintRule, LinterWarning, Position, Severity};
use crate::metastore::{DataTable, MetastoreLookup};

/// Tables a metastore confirmed missing, so repeated lint passes do not look
/// them up again. Without a TTL entries live until invalidated, which means a
/// table created after it was cached keeps warning.
#[derive(Debug, Clone, Default)]
pub struct MissingTableCache {
    missing: HashMap<String, Instant>,
    ttl: Option<Duration>,
}

impl MissingTableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            missing: HashMap::new(),
            ttl: Some(ttl),
        }
    }

    pub fn is_missing(&self, full_name: &str) -> bool {
        self.missing
            .get(full_name)
            .is_some_and(|cached_at| self.ttl.map_or(true, |ttl| cached_at.elapsed() < ttl))
    }

    pub fn mark_missing(&mut self, full_name: impl Into<String>) {
        self.missing.insert(full_name.into(), Instant::now());
    }

    /// Forget a table, e.g. after it was created
    pub fn invalidate(&mut self, full_name: &str) {
        self.missing.remove(full_name);
    }

    pub fn clear(&mut self) {
        self.missing.clear();
    }
}

/// Check every referenced table against the metastore.
///
/// Missing tables produce a warning and are remembered in `cache`. Tables
/// with metastore warnings produce one warning, escalated to an error when
/// any of the underlying warnings is an error. Lookup failures propagate.
pub async fn get_context_sensitive_warnings<M: MetastoreLookup>(
    metastore_id: i64,
    lineage: &Lineage,
    metastore: &M,
    cache: &mut MissingTableCache,
) -> Result<Vec<LinterWarning>, M::Error> {
    let lookups: IndexSet<(&str, &str)> = lineage
        .tables()
        .filter(|table| !cache.is_missing(&table.full_name()))
        .map(|table| (table.schema.as_str(), table.name.as_str()))
        .collect();

    let results = try_join_all(
        lookups
            .iter()
            .map(|(schema, name)| metastore.fetch_table_by_name(metastore_id, schema, name)),
    )
    .await?;

    let mut found: HashMap<String, DataTable> = HashMap::new();
    for ((schema, name), table) in lookups.iter().zip(results) {
        let full_name = format!("{}.{}", schema, name);
        match table {
            Some(table) => {
                found.insert(full_name, table);
            }
            None => {
                tracing::debug!(table = %full_name, "caching missing table");
                cache.mark_missing(full_name);
            }
        }
    }

    let warnings = lineage
        .tables()
        .filter_map(|table| match found.get(&table.full_name()) {
            None => Some(missing_table_warning(table)),
            Some(data_table) => table_warning(table, data_table),
        })
        .collect();

    Ok(warnings)
}

fn table_range(table: &TableToken) -> (Position, Position) {
    (
        Position::new(table.line, table.start),
        Position::new(table.line, table.end),
    )
}

fn missing_table_warning(table: &TableToken) -> LinterWarning {
    let (from, to) = table_range(table);
    LinterWarning::warning(
        LintRule::TableNotFound,
        format!(
            "Table {} is either newly created or does not exist",
            table.full_name()
        ),
    )
    .with_range(from, to)
}

fn table_warning(table: &TableToken, data_table: &DataTable) -> Option<LinterWarning> {
    if data_table.warnings.is_empty() {
        return None;
    }

    let severity = if data_table
        .warnings
        .iter()
        .any(|w| w.severity == Severity::Error)
    {
        Severity::Error
    } else {
        Severity::Warning
    };
    let messages: Vec<&str> = data_table
        .warnings
        .iter()
        .map(|w| w.message.as_str())
        .collect();

    let (from, to) = table_range(table);
    Some(
        LinterWarning::warning(
            LintRule::TableWarning,
            format!("Table {}: {}", table.full_name(), messages.join("; ")),
        )
        .with_severity(severity)
        .with_range(from, to),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_without_ttl_never_expires() {
        let mut cache = MissingTableCache::new();
        cache.mark_missing("default.t");
        assert!(cache.is_missing("default.t"));
        cache.invalidate("default.t");
        assert!(!cache.is_missing("default.t"));
    }

    #[test]
    fn test_cache_ttl_expires() {
        let mut cache = MissingTableCache::with_ttl(Duration::ZERO);
        cache.mark_missing("default.t");
        assert!(!cache.is_missing("default.t"));
    }
}

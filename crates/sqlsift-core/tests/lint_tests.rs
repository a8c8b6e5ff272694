// Integration tests for context-free and metastore-aware linting
use std::cell::Cell;
use std::future::Future;

use futures::executor::block_on;
use pretty_assertions::assert_eq;
use sqlsift_core::analyzer::CodeAnalysis;
use sqlsift_core::dialect::SqlDialect;
use sqlsift_core::error::{LintRule, Position, Severity};
use sqlsift_core::lint::{get_context_sensitive_warnings, MissingTableCache};
use sqlsift_core::metastore::{
    DataTable, InMemoryMetastore, MetastoreError, MetastoreLookup,
};

fn setup_metastore() -> InMemoryMetastore {
    let mut metastore = InMemoryMetastore::new(1);
    metastore.add_table(DataTable::new("default", "orders"));
    metastore.add_table(
        DataTable::new("default", "legacy").with_warning("deprecated, use orders", Severity::Warning),
    );
    metastore.add_table(
        DataTable::new("default", "broken")
            .with_warning("partition missing", Severity::Warning)
            .with_warning("do not query", Severity::Error),
    );
    metastore
}

/// Counts lookups that reach the wrapped metastore
struct CountingMetastore {
    inner: InMemoryMetastore,
    lookups: Cell<usize>,
}

impl MetastoreLookup for CountingMetastore {
    type Error = MetastoreError;

    fn fetch_table_by_name(
        &self,
        metastore_id: i64,
        schema: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<DataTable>, Self::Error>> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.fetch_table_by_name(metastore_id, schema, name)
    }
}

#[test]
fn test_context_free_rules_follow_dialect() {
    let hive = CodeAnalysis::new("select count(distinct id) from orders", SqlDialect::Hive);
    let rules: Vec<LintRule> = hive.context_free_warnings().iter().map(|w| w.rule).collect();
    assert_eq!(rules, vec![LintRule::CountDistinct]);

    let presto = CodeAnalysis::new("select count(distinct id) from orders", SqlDialect::Presto);
    let rules: Vec<LintRule> = presto.context_free_warnings().iter().map(|w| w.rule).collect();
    assert_eq!(rules, vec![LintRule::MissingLimit]);
}

#[test]
fn test_missing_table_is_reported_at_its_position() {
    let metastore = setup_metastore();
    let analysis = CodeAnalysis::new("select *\nfrom orders join nope", SqlDialect::Hive);
    let mut cache = MissingTableCache::new();

    let warnings =
        block_on(get_context_sensitive_warnings(1, &analysis.lineage, &metastore, &mut cache))
            .unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].rule, LintRule::TableNotFound);
    assert_eq!(
        warnings[0].message,
        "Table default.nope is either newly created or does not exist"
    );
    assert_eq!(warnings[0].from, Position::new(1, 17));
    assert_eq!(warnings[0].to, Position::new(1, 21));
    assert!(cache.is_missing("default.nope"));
}

#[test]
fn test_table_warnings_escalate_to_error() {
    let metastore = setup_metastore();
    let analysis = CodeAnalysis::new("select * from legacy; select * from broken", SqlDialect::Hive);
    let mut cache = MissingTableCache::new();

    let warnings =
        block_on(get_context_sensitive_warnings(1, &analysis.lineage, &metastore, &mut cache))
            .unwrap();

    let summary: Vec<(LintRule, Severity)> =
        warnings.iter().map(|w| (w.rule, w.severity)).collect();
    assert_eq!(
        summary,
        vec![
            (LintRule::TableWarning, Severity::Warning),
            (LintRule::TableWarning, Severity::Error),
        ]
    );
    assert!(warnings[0].message.contains("deprecated, use orders"));
}

#[test]
fn test_cached_missing_tables_skip_lookup() {
    let metastore = CountingMetastore {
        inner: setup_metastore(),
        lookups: Cell::new(0),
    };
    let analysis = CodeAnalysis::new("select * from nope join orders", SqlDialect::Hive);
    let mut cache = MissingTableCache::new();

    let first =
        block_on(get_context_sensitive_warnings(1, &analysis.lineage, &metastore, &mut cache))
            .unwrap();
    assert_eq!(metastore.lookups.get(), 2);

    let second =
        block_on(get_context_sensitive_warnings(1, &analysis.lineage, &metastore, &mut cache))
            .unwrap();
    assert_eq!(metastore.lookups.get(), 3);
    assert_eq!(first, second);

    cache.invalidate("default.nope");
    block_on(get_context_sensitive_warnings(1, &analysis.lineage, &metastore, &mut cache)).unwrap();
    assert_eq!(metastore.lookups.get(), 5);
}

#[test]
fn test_repeated_table_is_looked_up_once() {
    let metastore = CountingMetastore {
        inner: setup_metastore(),
        lookups: Cell::new(0),
    };
    let analysis = CodeAnalysis::new(
        "select * from nope; select * from nope a join nope b",
        SqlDialect::Hive,
    );
    let mut cache = MissingTableCache::new();

    let warnings =
        block_on(get_context_sensitive_warnings(1, &analysis.lineage, &metastore, &mut cache))
            .unwrap();
    assert_eq!(metastore.lookups.get(), 1);
    assert_eq!(warnings.len(), 3);
}

#[test]
fn test_lookup_failure_propagates() {
    let metastore = setup_metastore();
    let analysis = CodeAnalysis::new("select * from orders", SqlDialect::Hive);
    let mut cache = MissingTableCache::new();

    let result =
        block_on(get_context_sensitive_warnings(7, &analysis.lineage, &metastore, &mut cache));
    assert!(matches!(result, Err(MetastoreError::UnknownMetastore(7))));
}

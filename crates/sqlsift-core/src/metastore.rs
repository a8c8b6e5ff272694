//! Metastore collaborator used by the context-sensitive linter

use std::future::Future;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Severity;

/// A warning a data owner attached to a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTableWarning {
    pub message: String,
    #[serde(default = "default_warning_severity")]
    pub severity: Severity,
}

fn default_warning_severity() -> Severity {
    Severity::Warning
}

/// Table metadata as known to a metastore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    #[serde(default)]
    pub id: i64,
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub warnings: Vec<DataTableWarning>,
}

impl DataTable {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: 0,
            schema: schema.into(),
            name: name.into(),
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, message: impl Into<String>, severity: Severity) -> Self {
        self.warnings.push(DataTableWarning {
            message: message.into(),
            severity,
        });
        self
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// Looks tables up by name, typically through a network-backed cache.
/// `Ok(None)` means the metastore does not know the table.
pub trait MetastoreLookup {
    type Error;

    fn fetch_table_by_name(
        &self,
        metastore_id: i64,
        schema: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<DataTable>, Self::Error>>;
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum MetastoreError {
    #[error("Unknown metastore id {0}")]
    #[diagnostic(code(sqlsift::metastore))]
    UnknownMetastore(i64),
}

/// Serialized form of an in-memory metastore
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetastoreSnapshot {
    pub id: i64,
    #[serde(default)]
    pub tables: Vec<DataTable>,
}

/// Metastore held entirely in memory, keyed by lowercase `schema.name`
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetastore {
    pub id: i64,
    tables: IndexMap<String, DataTable>,
}

impl InMemoryMetastore {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            tables: IndexMap::new(),
        }
    }

    /// Add a table, assigning the next id when it has none
    pub fn add_table(&mut self, mut table: DataTable) {
        if table.id == 0 {
            table.id = self.tables.len() as i64 + 1;
        }
        self.tables.insert(table.full_name().to_lowercase(), table);
    }

    pub fn get_table(&self, schema: &str, name: &str) -> Option<&DataTable> {
        self.tables
            .get(&format!("{}.{}", schema, name).to_lowercase())
    }

    pub fn table_exists(&self, schema: &str, name: &str) -> bool {
        self.get_table(schema, name).is_some()
    }

    pub fn tables(&self) -> impl Iterator<Item = &DataTable> {
        self.tables.values()
    }
}

impl From<MetastoreSnapshot> for InMemoryMetastore {
    fn from(snapshot: MetastoreSnapshot) -> Self {
        let mut metastore = InMemoryMetastore::new(snapshot.id);
        for table in snapshot.tables {
            metastore.add_table(table);
        }
        metastore
    }
}

impl MetastoreLookup for InMemoryMetastore {
    type Error = MetastoreError;

    fn fetch_table_by_name(
        &self,
        metastore_id: i64,
        schema: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<DataTable>, Self::Error>> {
        let result = if metastore_id == self.id {
            Ok(self.get_table(schema, name).cloned())
        } else {
            Err(MetastoreError::UnknownMetastore(metastore_id))
        };
        std::future::ready(result)
    }
}

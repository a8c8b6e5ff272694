//! Configuration file handling

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use sqlsift_core::{FormatOptions, InMemoryMetastore, MetastoreSnapshot, SqlDialect};

use crate::args::OutputFormat;

const CONFIG_FILE_NAME: &str = "sqlsift.toml";

/// Configuration for sqlsift
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// SQL dialect (defaults to "hive")
    #[serde(default)]
    pub dialect: Option<String>,

    /// Row limit applied by `sqlsift limit`
    #[serde(default)]
    pub row_limit: Option<u64>,

    /// Metastore snapshot path, relative to the working directory
    #[serde(default)]
    pub metastore: Option<String>,

    /// Metastore id to query
    #[serde(default)]
    pub metastore_id: Option<i64>,

    /// Lint rules to disable (e.g., ["L001", "missing-limit"])
    #[serde(default)]
    pub disable: Vec<String>,

    /// Lint output format (human, json, sarif)
    #[serde(default)]
    pub output: Option<String>,

    /// Formatter options
    #[serde(default)]
    pub format: FormatOptions,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let config: Config = toml::from_str(&contents).into_diagnostic()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Try to find and load sqlsift.toml in current directory or parent directories
    pub fn find_and_load() -> Result<Option<Self>> {
        let mut current_dir = std::env::current_dir().into_diagnostic()?;

        loop {
            let config_path = current_dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(Some(Self::from_file(&config_path)?));
            }

            if !current_dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Load the given file, or the nearest sqlsift.toml, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::find_and_load()?.unwrap_or_default()),
        }
    }

    /// Merge lint arguments into configuration.
    /// CLI arguments take precedence over config file values.
    pub fn merge_lint_args(
        mut self,
        metastore: &Option<PathBuf>,
        metastore_id: Option<i64>,
        disable: &[String],
        format: Option<OutputFormat>,
    ) -> Self {
        if let Some(path) = metastore {
            self.metastore = Some(path.display().to_string());
        }

        if metastore_id.is_some() {
            self.metastore_id = metastore_id;
        }

        if !disable.is_empty() {
            self.disable = disable.to_vec();
        }

        if let Some(fmt) = format {
            self.output = Some(format!("{:?}", fmt).to_lowercase());
        }

        self
    }

    /// Dialect from the CLI flag, else the config file, else the default
    pub fn dialect(&self, cli: Option<&str>) -> Result<SqlDialect> {
        match cli.or(self.dialect.as_deref()) {
            Some(name) => Ok(name.parse::<SqlDialect>()?),
            None => Ok(SqlDialect::default()),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        match self.output.as_deref() {
            Some("json") => OutputFormat::Json,
            Some("sarif") => OutputFormat::Sarif,
            _ => OutputFormat::Human,
        }
    }

    /// Load the configured metastore snapshot, if any, with the id to query it by
    pub fn load_metastore(&self) -> Result<Option<(InMemoryMetastore, i64)>> {
        let Some(path) = &self.metastore else {
            return Ok(None);
        };
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let snapshot: MetastoreSnapshot = serde_json::from_str(&contents).into_diagnostic()?;
        let metastore_id = self.metastore_id.unwrap_or(snapshot.id);
        tracing::info!(
            path = %path,
            tables = snapshot.tables.len(),
            "loaded metastore snapshot"
        );
        Ok(Some((InMemoryMetastore::from(snapshot), metastore_id)))
    }
}
